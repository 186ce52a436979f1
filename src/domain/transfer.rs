use super::money::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a single transfer.
///
/// `Started -> (Completed | AwaitingRetry) -> (RetrySucceeded | Cancelled)`
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Started,
    AwaitingRetry,
    /// Funds moved on the first attempt.
    Completed,
    /// Funds moved on the retry after the wait window.
    RetrySucceeded,
    /// Both attempts hit insufficient funds; nothing moved.
    Cancelled,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransferState::Completed | TransferState::RetrySucceeded | TransferState::Cancelled
        )
    }

    /// Returns true if funds were moved.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TransferState::Completed | TransferState::RetrySucceeded
        )
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransferState::Started => "started",
            TransferState::AwaitingRetry => "awaiting_retry",
            TransferState::Completed => "completed",
            TransferState::RetrySucceeded => "retry_succeeded",
            TransferState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A request to move `amount` from account `from` to account `to`.
///
/// The amount is validated when the request is submitted, not when it is parsed.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct TransferRequest {
    pub from: u16,
    pub to: u16,
    pub amount: Decimal,
}

/// The resolved outcome of a submitted transfer.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct TransferReport {
    pub from: u16,
    pub to: u16,
    pub amount: Amount,
    pub state: TransferState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!TransferState::Started.is_terminal());
        assert!(!TransferState::AwaitingRetry.is_terminal());
        assert!(TransferState::Completed.is_terminal());
        assert!(TransferState::RetrySucceeded.is_terminal());
        assert!(TransferState::Cancelled.is_terminal());

        assert!(TransferState::RetrySucceeded.is_success());
        assert!(!TransferState::Cancelled.is_success());
    }

    #[test]
    fn test_transfer_request_deserialization() {
        let csv = "from, to, amount\n1, 2, 3000.50";
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv.as_bytes());

        let request: TransferRequest = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(request.from, 1);
        assert_eq!(request.to, 2);
        assert_eq!(request.amount, rust_decimal_macros::dec!(3000.50));
    }
}
