use super::ledger::{EntryKind, LedgerEntry};
use super::money::{Amount, Balance};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The person owning an account. Immutable once created.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct AccountHolder {
    pub first_name: String,
    pub last_name: String,
    pub credit_rating: i32,
    pub registered_at: DateTime<Utc>,
}

impl AccountHolder {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        credit_rating: i32,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            credit_rating,
            registered_at,
        }
    }
}

/// Mutable part of an account, only reachable through the account lock.
#[derive(Debug)]
struct AccountState {
    balance: Balance,
    entries: Vec<LedgerEntry>,
    closed_at: Option<DateTime<Utc>>,
}

impl AccountState {
    fn ensure_covers(&self, amount: Amount) -> Result<()> {
        if self.balance.covers(amount) {
            Ok(())
        } else {
            Err(LedgerError::InsufficientFunds {
                requested: amount.value(),
                available: self.balance.value(),
            })
        }
    }

    fn credit(&mut self, amount: Amount) -> Result<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                amount: amount.value(),
                balance: self.balance.value(),
            })?;
        self.entries.push(LedgerEntry::completed(EntryKind::Credit, amount));
        Ok(())
    }

    fn debit(&mut self, amount: Amount) -> Result<()> {
        self.ensure_covers(amount)?;
        self.balance -= amount;
        self.entries.push(LedgerEntry::completed(EntryKind::Debit, amount));
        Ok(())
    }
}

/// A consistent copy of an account taken under its lock.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct AccountSnapshot {
    pub account: u16,
    pub holder: AccountHolder,
    pub balance: Balance,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub entries: Vec<LedgerEntry>,
}

/// An account shared between concurrent tasks.
///
/// Every balance mutation and every read goes through a per-account mutex, so
/// `withdraw` checks and debits in one critical section and readers never see a
/// half-applied change. The lock is never held across any other `.await`, except
/// that [`Account::transfer_to`] waits for the destination lock while holding the
/// source lock.
#[derive(Debug)]
pub struct Account {
    id: u16,
    owner: Arc<AccountHolder>,
    opened_at: DateTime<Utc>,
    state: Mutex<AccountState>,
}

impl Account {
    /// Opens an account with the given starting balance.
    ///
    /// The opening balance is not recorded as a ledger entry.
    pub fn open(id: u16, owner: Arc<AccountHolder>, initial_balance: Decimal) -> Result<Self> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::InvalidInitialBalance(initial_balance));
        }

        Ok(Self {
            id,
            owner,
            opened_at: Utc::now(),
            state: Mutex::new(AccountState {
                balance: Balance::new(initial_balance),
                entries: Vec::new(),
                closed_at: None,
            }),
        })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Credits the account and appends a completed credit entry.
    ///
    /// Fails without changing anything if the balance would overflow.
    pub async fn deposit(&self, amount: Amount) -> Result<()> {
        self.state.lock().await.credit(amount)
    }

    /// Debits the account if the balance covers `amount`.
    ///
    /// On insufficient funds nothing is changed and no entry is appended.
    pub async fn withdraw(&self, amount: Amount) -> Result<()> {
        self.state.lock().await.debit(amount)
    }

    /// Debits this account and credits `destination` as one step.
    ///
    /// Both account locks are held, source first, while the two sides are applied,
    /// so either both balances and ledgers change or neither does. Callers must
    /// serialize transfers among themselves (the transfer lock does this); plain
    /// deposits and withdrawals only ever hold one account lock.
    pub async fn transfer_to(&self, destination: &Account, amount: Amount) -> Result<()> {
        if std::ptr::eq(self, destination) {
            return Err(LedgerError::SameAccount(self.id));
        }
        let mut source = self.state.lock().await;
        source.ensure_covers(amount)?;
        let mut target = destination.state.lock().await;
        target.credit(amount)?;
        source.debit(amount)
    }

    /// Stamps the close timestamp. Closing twice keeps the first stamp.
    ///
    /// A closed account still accepts deposits and withdrawals.
    pub async fn close(&self) -> DateTime<Utc> {
        let mut state = self.state.lock().await;
        *state.closed_at.get_or_insert_with(Utc::now)
    }

    pub async fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.closed_at
    }

    pub async fn balance(&self) -> Balance {
        self.state.lock().await.balance
    }

    pub async fn entries(&self) -> Vec<LedgerEntry> {
        self.state.lock().await.entries.clone()
    }

    pub async fn snapshot(&self) -> AccountSnapshot {
        let state = self.state.lock().await;
        AccountSnapshot {
            account: self.id,
            holder: self.owner.as_ref().clone(),
            balance: state.balance,
            opened_at: self.opened_at,
            closed_at: state.closed_at,
            entries: state.entries.clone(),
        }
    }
}
