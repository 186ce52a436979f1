use crate::domain::account::AccountSnapshot;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct AccountRow<'a> {
    account: u16,
    first_name: &'a str,
    last_name: &'a str,
    balance: Decimal,
    entries: usize,
    closed: bool,
}

impl<'a> From<&'a AccountSnapshot> for AccountRow<'a> {
    fn from(snapshot: &'a AccountSnapshot) -> Self {
        Self {
            account: snapshot.account,
            first_name: &snapshot.holder.first_name,
            last_name: &snapshot.holder.last_name,
            balance: snapshot.balance.value(),
            entries: snapshot.entries.len(),
            closed: snapshot.closed_at.is_some(),
        }
    }
}

/// Writes final account state as CSV, one row per account.
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, snapshots: &[AccountSnapshot]) -> Result<()> {
        for snapshot in snapshots {
            self.writer.serialize(AccountRow::from(snapshot))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
