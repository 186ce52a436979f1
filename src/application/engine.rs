use super::coordinator::TransferCoordinator;
use crate::config::EngineConfig;
use crate::domain::account::{Account, AccountHolder, AccountSnapshot};
use crate::domain::money::Amount;
use crate::domain::ports::AccountStoreBox;
use crate::domain::transfer::{TransferReport, TransferRequest, TransferState};
use crate::error::{LedgerError, Result};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// A transfer running on its own task.
#[derive(Debug)]
pub struct PendingTransfer {
    from: u16,
    to: u16,
    amount: Amount,
    handle: JoinHandle<TransferState>,
}

impl PendingTransfer {
    /// Waits for the transfer to reach a terminal state.
    pub async fn wait(self) -> Result<TransferReport> {
        let state = self.handle.await?;
        Ok(TransferReport {
            from: self.from,
            to: self.to,
            amount: self.amount,
            state,
        })
    }
}

/// The main entry point for running transfers between registered accounts.
///
/// `TransferEngine` owns the account store and one shared [`TransferCoordinator`].
/// Every submitted transfer runs on its own task; the returned [`PendingTransfer`]
/// resolves to a [`TransferReport`] once the transfer reaches a terminal state.
pub struct TransferEngine {
    account_store: AccountStoreBox,
    coordinator: Arc<TransferCoordinator>,
}

impl TransferEngine {
    /// Creates a new `TransferEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `account_store` - The store holding every account transfers may touch.
    /// * `config` - Retry settings for the coordinator.
    pub fn new(account_store: AccountStoreBox, config: EngineConfig) -> Self {
        Self {
            account_store,
            coordinator: Arc::new(TransferCoordinator::new(config)),
        }
    }

    /// Opens an account and registers it with the store.
    pub async fn open_account(
        &self,
        id: u16,
        holder: AccountHolder,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>> {
        let account = Arc::new(Account::open(id, Arc::new(holder), initial_balance)?);
        self.account_store.insert(Arc::clone(&account)).await?;
        info!(account = id, balance = %initial_balance, "Account opened");
        Ok(account)
    }

    pub async fn account(&self, id: u16) -> Result<Arc<Account>> {
        self.account_store
            .get(id)
            .await?
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Validates a request and spawns its transfer.
    ///
    /// Invalid amounts, self-transfers and unknown accounts are rejected here,
    /// before any task is spawned.
    pub async fn submit(&self, request: TransferRequest) -> Result<PendingTransfer> {
        let amount = Amount::new(request.amount)?;
        if request.from == request.to {
            return Err(LedgerError::SameAccount(request.from));
        }
        let source = self.account(request.from).await?;
        let destination = self.account(request.to).await?;

        Ok(PendingTransfer {
            from: request.from,
            to: request.to,
            amount,
            handle: self.coordinator.spawn(source, destination, amount),
        })
    }

    /// Submits every request concurrently and waits for all of them.
    ///
    /// Rejected requests are logged and left out of the result; reports come back
    /// in submission order. Every spawned transfer is awaited even if one of them
    /// fails; the first failure is returned after all have finished.
    pub async fn run_all(
        &self,
        requests: impl IntoIterator<Item = TransferRequest>,
    ) -> Result<Vec<TransferReport>> {
        let mut pending = Vec::new();
        for request in requests {
            let (from, to) = (request.from, request.to);
            match self.submit(request).await {
                Ok(transfer) => pending.push(transfer),
                Err(e) => error!(from, to, "Transfer rejected: {}", e),
            }
        }

        wait_all(pending).await
    }

    /// Locked snapshots of every account, ordered by id.
    pub async fn snapshots(&self) -> Result<Vec<AccountSnapshot>> {
        let mut snapshots = Vec::new();
        for account in self.account_store.all().await? {
            snapshots.push(account.snapshot().await);
        }
        Ok(snapshots)
    }
}

async fn wait_all(pending: Vec<PendingTransfer>) -> Result<Vec<TransferReport>> {
    let mut reports = Vec::with_capacity(pending.len());
    let mut first_error = None;
    for transfer in pending {
        let (from, to) = (transfer.from, transfer.to);
        match transfer.wait().await {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!(from, to, "Transfer task failed: {}", e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(reports),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Balance;
    use crate::infrastructure::in_memory::InMemoryAccountStore;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn holder(first: &str, last: &str) -> AccountHolder {
        AccountHolder::new(first, last, 750, Utc::now())
    }

    fn request(from: u16, to: u16, amount: Decimal) -> TransferRequest {
        TransferRequest { from, to, amount }
    }

    async fn engine_with(balances: &[(u16, Decimal)]) -> TransferEngine {
        let engine = TransferEngine::new(
            Box::new(InMemoryAccountStore::new()),
            EngineConfig::with_retry_wait(Duration::from_millis(20)),
        );
        for (id, balance) in balances {
            engine
                .open_account(*id, holder("Test", "Holder"), *balance)
                .await
                .unwrap();
        }
        engine
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_requests() {
        let engine = engine_with(&[(1, dec!(10)), (2, dec!(10))]).await;

        assert!(matches!(
            engine.submit(request(1, 2, dec!(0))).await,
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            engine.submit(request(1, 2, dec!(-5))).await,
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            engine.submit(request(1, 1, dec!(5))).await,
            Err(LedgerError::SameAccount(1))
        ));
        assert!(matches!(
            engine.submit(request(1, 9, dec!(5))).await,
            Err(LedgerError::AccountNotFound(9))
        ));
        assert!(matches!(
            engine.submit(request(9, 1, dec!(5))).await,
            Err(LedgerError::AccountNotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_open_account_rejects_duplicates_and_negative_balance() {
        let engine = engine_with(&[(1, dec!(10))]).await;

        assert!(matches!(
            engine.open_account(1, holder("A", "B"), dec!(5)).await,
            Err(LedgerError::DuplicateAccount(1))
        ));
        assert!(matches!(
            engine.open_account(2, holder("A", "B"), dec!(-5)).await,
            Err(LedgerError::InvalidInitialBalance(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_and_wait() {
        let engine = engine_with(&[(1, dec!(100)), (2, dec!(0))]).await;

        let report = engine
            .submit(request(1, 2, dec!(40)))
            .await
            .unwrap()
            .wait()
            .await
            .unwrap();

        assert_eq!(report.state, TransferState::Completed);
        assert_eq!(report.amount.value(), dec!(40));
        assert_eq!(
            engine.account(1).await.unwrap().balance().await,
            Balance::new(dec!(60))
        );
        assert_eq!(
            engine.account(2).await.unwrap().balance().await,
            Balance::new(dec!(40))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_all_skips_rejected_requests() {
        let engine = engine_with(&[(1, dec!(100)), (2, dec!(50)), (3, dec!(0))]).await;

        let reports = engine
            .run_all(vec![
                request(1, 2, dec!(30)),
                request(2, 2, dec!(10)),
                request(2, 3, dec!(20)),
                request(1, 3, dec!(0)),
                request(1, 3, dec!(10)),
            ])
            .await
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports.iter().map(|r| (r.from, r.to)).collect::<Vec<_>>(),
            vec![(1, 2), (2, 3), (1, 3)]
        );
        assert!(reports.iter().all(|r| r.state == TransferState::Completed));

        let balances: Vec<Decimal> = engine
            .snapshots()
            .await
            .unwrap()
            .iter()
            .map(|s| s.balance.value())
            .collect();
        assert_eq!(balances, vec![dec!(60), dec!(60), dec!(30)]);
    }

    async fn crash() -> TransferState {
        panic!("transfer task crashed")
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_all_drains_every_transfer_before_failing() {
        let engine = engine_with(&[(1, dec!(100)), (2, dec!(0))]).await;

        let crashed = PendingTransfer {
            from: 3,
            to: 4,
            amount: Amount::new(dec!(1)).unwrap(),
            handle: tokio::spawn(crash()),
        };
        let waiting = engine.submit(request(1, 2, dec!(150))).await.unwrap();
        let handle = waiting.handle.abort_handle();

        let start = tokio::time::Instant::now();
        let result = wait_all(vec![crashed, waiting]).await;

        assert!(matches!(result, Err(LedgerError::TaskFailed(_))));
        assert!(handle.is_finished());
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(
            engine.account(1).await.unwrap().balance().await,
            Balance::new(dec!(100))
        );
    }

    #[tokio::test]
    async fn test_run_all_cancels_unfunded_transfer() {
        let engine = engine_with(&[(1, dec!(10)), (2, dec!(0))]).await;

        let reports = engine
            .run_all(vec![request(1, 2, dec!(11))])
            .await
            .unwrap();

        assert_eq!(reports[0].state, TransferState::Cancelled);
        let snapshots = engine.snapshots().await.unwrap();
        assert_eq!(snapshots[0].balance, Balance::new(dec!(10)));
        assert!(snapshots[0].entries.is_empty());
        assert!(snapshots[1].entries.is_empty());
    }
}
