use super::engine::TransferEngine;
use crate::domain::account::AccountHolder;
use crate::domain::transfer::TransferRequest;
use crate::error::Result;
use chrono::Utc;
use rust_decimal_macros::dec;

/// Opens the two accounts of the built-in demo.
pub async fn open_demo_accounts(engine: &TransferEngine) -> Result<()> {
    let now = Utc::now();
    engine
        .open_account(1, AccountHolder::new("Ivan", "Petrov", 800, now), dec!(5000))
        .await?;
    engine
        .open_account(2, AccountHolder::new("Anna", "Sidorova", 900, now), dec!(2000))
        .await?;
    Ok(())
}

/// Two opposing transfers; whichever takes the transfer lock second sees the
/// balance left by the first.
pub fn demo_transfers() -> Vec<TransferRequest> {
    vec![
        TransferRequest {
            from: 1,
            to: 2,
            amount: dec!(3000),
        },
        TransferRequest {
            from: 2,
            to: 1,
            amount: dec!(4000),
        },
    ]
}
