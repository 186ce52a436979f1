use super::account::Account;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Registers a new account. Fails if the id is already taken.
    async fn insert(&self, account: Arc<Account>) -> Result<()>;
    async fn get(&self, id: u16) -> Result<Option<Arc<Account>>>;
    /// All accounts ordered by id.
    async fn all(&self) -> Result<Vec<Arc<Account>>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
