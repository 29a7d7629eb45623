//! Credential Store
//!
//! User records keyed by canonical email. The service only needs two
//! operations, so any backend (database, key-value service) can stand in
//! for [`InMemoryCredentialStore`] by implementing [`CredentialStore`].

use crate::models::UserRecord;

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Errors reported by a credential store backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Storage contract for user records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert `record` under its email.
    ///
    /// The existence check and the insert must be one atomic step: two
    /// concurrent puts for the same email never both succeed.
    async fn put(&self, record: UserRecord) -> Result<(), StoreError>;

    /// Fetch the record stored under `email`
    async fn get(&self, email: &str) -> Result<UserRecord, StoreError>;
}

/// Process-local store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        match records.entry(record.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, email: &str) -> Result<UserRecord, StoreError> {
        self.records
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
