use super::{Account, AccountStore, async_trait};
use crate::error::StoreError;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process account store, used for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.accounts.read().await.contains_key(username))
    }

    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.username) {
            return Err(StoreError::Conflict(format!("account {}", account.username)));
        }
        accounts.insert(account.username.clone(), account.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(username).cloned())
    }
}
