use super::money::Amount;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Credit,
    Debit,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Pending,
    Completed,
    Cancelled,
}

/// One balance change recorded on an account's ledger.
///
/// Entries are never mutated once appended.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
    pub status: EntryStatus,
}

impl LedgerEntry {
    /// Records a change that has already been applied to the balance.
    pub fn completed(kind: EntryKind, amount: Amount) -> Self {
        Self {
            kind,
            amount,
            timestamp: Utc::now(),
            status: EntryStatus::Completed,
        }
    }
}
