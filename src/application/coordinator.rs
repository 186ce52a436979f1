use crate::config::EngineConfig;
use crate::domain::account::Account;
use crate::domain::money::Amount;
use crate::domain::transfer::TransferState;
use crate::error::LedgerError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Moves funds between two accounts, one transfer at a time.
///
/// A single transfer lock is held for the whole protocol, including the retry
/// wait, so no two transfers ever interleave their withdraw/deposit steps, even
/// on disjoint accounts. Inside the lock the source account lock is taken before
/// the destination account lock; since only one transfer holds two account locks
/// at a time, that order cannot deadlock.
///
/// Share one coordinator (behind an `Arc`) between all transfers of a process.
#[derive(Debug)]
pub struct TransferCoordinator {
    transfer_lock: Mutex<()>,
    retry_wait: Duration,
}

impl TransferCoordinator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            transfer_lock: Mutex::new(()),
            retry_wait: config.retry_wait,
        }
    }

    /// Runs a transfer to a terminal state.
    ///
    /// Insufficient funds is not an error here: the transfer waits once for
    /// `retry_wait`, retries once, and ends `Cancelled` if funds are still short.
    /// Any other failure, such as a destination balance overflow, cancels at once.
    pub async fn transfer(
        &self,
        source: &Account,
        destination: &Account,
        amount: Amount,
    ) -> TransferState {
        let _guard = self.transfer_lock.lock().await;
        let mut state = TransferState::Started;
        debug!(
            source = source.id(),
            destination = destination.id(),
            %amount,
            %state,
            "Transfer acquired lock"
        );

        state = match source.transfer_to(destination, amount).await {
            Ok(()) => TransferState::Completed,
            Err(e @ LedgerError::InsufficientFunds { .. }) => {
                warn!(
                    source = source.id(),
                    destination = destination.id(),
                    %amount,
                    wait_ms = self.retry_wait.as_millis() as u64,
                    "Insufficient funds, waiting before retry: {}",
                    e
                );
                TransferState::AwaitingRetry
            }
            Err(e) => {
                warn!(
                    source = source.id(),
                    destination = destination.id(),
                    %amount,
                    "Transfer cannot proceed: {}",
                    e
                );
                TransferState::Cancelled
            }
        };

        if state == TransferState::AwaitingRetry {
            tokio::time::sleep(self.retry_wait).await;
            state = match source.transfer_to(destination, amount).await {
                Ok(()) => TransferState::RetrySucceeded,
                Err(_) => TransferState::Cancelled,
            };
        }

        if state.is_success() {
            info!(
                source = source.id(),
                destination = destination.id(),
                %amount,
                %state,
                "Transfer completed"
            );
        } else {
            warn!(
                source = source.id(),
                destination = destination.id(),
                %amount,
                %state,
                "Transfer cancelled"
            );
        }
        state
    }

    /// Runs [`transfer`](Self::transfer) on its own task.
    pub fn spawn(
        self: &Arc<Self>,
        source: Arc<Account>,
        destination: Arc<Account>,
        amount: Amount,
    ) -> JoinHandle<TransferState> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            coordinator
                .transfer(&source, &destination, amount)
                .await
        })
    }
}
