//! Document store abstraction.
//!
//! A single logical collection of `{key, state, updatedAt}` documents keyed
//! by `key`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use datagrid_model::PersistedState;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Longest key the document store accepts.
pub const MAX_KEY_LEN: usize = 100;

/// One stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    pub key: String,
    pub state: PersistedState,
    /// Epoch milliseconds of the write.
    pub updated_at: u64,
}

impl StateDocument {
    pub fn new(key: impl Into<String>, state: PersistedState) -> Self {
        Self {
            key: key.into(),
            state,
            updated_at: now_millis(),
        }
    }
}

pub(crate) fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

pub(crate) fn check_key(key: &str) -> Result<()> {
    let len = key.chars().count();
    if len > MAX_KEY_LEN {
        return Err(StorageError::KeyTooLong {
            len,
            max: MAX_KEY_LEN,
        });
    }
    Ok(())
}

/// Collection operations.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Insert or replace the document with the same key.
    async fn upsert(&self, document: StateDocument) -> Result<()>;

    async fn find_one(&self, key: &str) -> Result<Option<StateDocument>>;

    /// Remove a document. Returns whether one existed.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Opens the collection. Called at most once per successful initialization.
#[async_trait]
pub trait DocumentStoreProvider: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn DocumentCollection>>;
}

/// In-memory document store. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<Mutex<HashMap<String, StateDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentCollection for MemoryDocumentStore {
    async fn upsert(&self, document: StateDocument) -> Result<()> {
        check_key(&document.key)?;
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document.key.clone(), document);
        Ok(())
    }

    async fn find_one(&self, key: &str) -> Result<Option<StateDocument>> {
        check_key(key)?;
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some())
    }
}

#[async_trait]
impl DocumentStoreProvider for MemoryDocumentStore {
    async fn open(&self) -> Result<Arc<dyn DocumentCollection>> {
        Ok(Arc::new(self.clone()))
    }
}

/// Provider for hosts without a document store. Every open fails, so all
/// operations are served by the flat key/value fallback.
#[derive(Debug, Clone)]
pub struct UnavailableDocumentStore {
    reason: String,
}

impl UnavailableDocumentStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl DocumentStoreProvider for UnavailableDocumentStore {
    async fn open(&self) -> Result<Arc<dyn DocumentCollection>> {
        Err(StorageError::Unavailable {
            reason: self.reason.clone(),
        })
    }
}
