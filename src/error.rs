use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("Initial balance must not be negative, got {0}")]
    InvalidInitialBalance(Decimal),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Depositing {amount} would overflow balance {balance}")]
    BalanceOverflow { amount: Decimal, balance: Decimal },
    #[error("Account {0} not found")]
    AccountNotFound(u16),
    #[error("Account {0} already exists")]
    DuplicateAccount(u16),
    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(u16),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Transfer task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
