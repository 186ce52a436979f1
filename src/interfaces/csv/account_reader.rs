use crate::domain::account::AccountHolder;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One row of the accounts file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct AccountRecord {
    pub account: u16,
    pub first_name: String,
    pub last_name: String,
    pub credit_rating: i32,
    pub balance: Decimal,
}

impl AccountRecord {
    pub fn holder(&self, registered_at: DateTime<Utc>) -> AccountHolder {
        AccountHolder::new(
            self.first_name.clone(),
            self.last_name.clone(),
            self.credit_rating,
            registered_at,
        )
    }
}

/// Reads account definitions
/// (`account, first_name, last_name, credit_rating, balance`) from a CSV source.
pub struct AccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn accounts(self) -> impl Iterator<Item = Result<AccountRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LedgerError::from))
    }
}
