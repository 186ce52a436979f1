use crate::domain::account::Account;
use crate::domain::ports::AccountStore;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory registry of accounts.
///
/// Only the map is guarded here; balances are guarded by each account's own lock,
/// so looking up one account never waits on a transfer touching another.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<u16, Arc<Account>>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(&self, account: Arc<Account>) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let id = account.id();
        if accounts.contains_key(&id) {
            return Err(LedgerError::DuplicateAccount(id));
        }
        accounts.insert(id, account);
        Ok(())
    }

    async fn get(&self, id: u16) -> Result<Option<Arc<Account>>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Arc<Account>>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Arc<Account>> = accounts.values().cloned().collect();
        all.sort_by_key(|account| account.id());
        Ok(all)
    }
}
