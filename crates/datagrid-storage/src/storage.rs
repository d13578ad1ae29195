//! Tiered state storage.
//!
//! The selected backend is tried first. When the document store fails (its
//! initialization included), the same call is served by the flat key/value
//! store. Each call starts from the selected backend again: a failure never
//! sticks. Nothing here returns an error; failures are logged.

use std::fmt;
use std::sync::Arc;

use datagrid_model::{PersistedState, StorageBackend};
use tokio::sync::OnceCell;

use crate::document::{DocumentCollection, DocumentStoreProvider, StateDocument};
use crate::error::{Result, StorageError};
use crate::kv::{DEFAULT_NAMESPACE, KeyValueStore, namespaced_key};

/// Where a save landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the selected backend.
    Primary,
    /// The document store failed; written to the flat store instead.
    Fallback,
    /// Every tier failed; nothing was written.
    Skipped,
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

/// Storage shared by every grid in a process, disambiguated by key.
pub struct StateStorage {
    provider: Arc<dyn DocumentStoreProvider>,
    collection: OnceCell<Arc<dyn DocumentCollection>>,
    flat: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl fmt::Debug for StateStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStorage")
            .field("namespace", &self.namespace)
            .field("initialized", &self.collection.initialized())
            .finish_non_exhaustive()
    }
}

impl StateStorage {
    pub fn new(
        provider: Arc<dyn DocumentStoreProvider>,
        flat: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            provider,
            collection: OnceCell::new(),
            flat,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether the document store has been opened.
    pub fn is_initialized(&self) -> bool {
        self.collection.initialized()
    }

    /// The document collection, opened on first use. Concurrent first
    /// callers share one open; a failed open is retried by the next caller.
    async fn collection(&self) -> Result<Arc<dyn DocumentCollection>> {
        self.collection
            .get_or_try_init(|| async {
                tracing::debug!("opening document store");
                self.provider.open().await
            })
            .await
            .cloned()
    }

    // =========================================================================
    // PUBLIC OPERATIONS
    // =========================================================================

    pub async fn save(
        &self,
        key: &str,
        state: &PersistedState,
        backend: StorageBackend,
    ) -> SaveOutcome {
        match backend {
            StorageBackend::DocumentStore => match self.save_document(key, state).await {
                Ok(()) => {
                    tracing::debug!(key, "saved grid state to document store");
                    SaveOutcome::Primary
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "document store save failed, falling back to flat storage");
                    match self.save_flat(key, state) {
                        Ok(()) => SaveOutcome::Fallback,
                        Err(e) => {
                            tracing::error!(key, error = %e, "flat storage save failed");
                            SaveOutcome::Skipped
                        }
                    }
                }
            },
            StorageBackend::FlatKv => match self.save_flat(key, state) {
                Ok(()) => {
                    tracing::debug!(key, "saved grid state to flat storage");
                    SaveOutcome::Primary
                }
                Err(e) => {
                    tracing::error!(key, error = %e, "flat storage save failed");
                    SaveOutcome::Skipped
                }
            },
        }
    }

    /// Load the record for `key`, or `None` when missing or unreadable.
    ///
    /// With the document store selected, a key it does not hold is also
    /// looked up in the flat store, where an earlier fallback save may have
    /// put it.
    pub async fn load(&self, key: &str, backend: StorageBackend) -> Option<PersistedState> {
        if backend == StorageBackend::DocumentStore {
            match self.load_document(key).await {
                Ok(Some(document)) => {
                    tracing::debug!(key, "loaded grid state from document store");
                    return Some(document.state);
                }
                Ok(None) => {
                    tracing::debug!(key, "no document stored, checking flat storage");
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "document store load failed, falling back to flat storage");
                }
            }
        }
        self.load_flat(key)
    }

    /// Remove the record for `key` from every tier.
    pub async fn clear(&self, key: &str, backend: StorageBackend) {
        if backend == StorageBackend::DocumentStore {
            match self.clear_document(key).await {
                Ok(removed) => tracing::debug!(key, removed, "cleared document store entry"),
                Err(e) => tracing::warn!(key, error = %e, "document store clear failed"),
            }
        }
        let flat_key = namespaced_key(&self.namespace, key);
        if let Err(e) = self.flat.remove_item(&flat_key) {
            tracing::warn!(key, error = %e, "flat storage clear failed");
        }
    }

    // =========================================================================
    // TIERS
    // =========================================================================

    async fn save_document(&self, key: &str, state: &PersistedState) -> Result<()> {
        let collection = self.collection().await?;
        collection
            .upsert(StateDocument::new(key, state.clone()))
            .await
    }

    async fn load_document(&self, key: &str) -> Result<Option<StateDocument>> {
        self.collection().await?.find_one(key).await
    }

    async fn clear_document(&self, key: &str) -> Result<bool> {
        self.collection().await?.remove(key).await
    }

    fn save_flat(&self, key: &str, state: &PersistedState) -> Result<()> {
        let text = state
            .to_json()
            .map_err(|source| StorageError::Serialization { source })?;
        self.flat
            .set_item(&namespaced_key(&self.namespace, key), &text)
    }

    fn load_flat(&self, key: &str) -> Option<PersistedState> {
        let flat_key = namespaced_key(&self.namespace, key);
        let text = match self.flat.get_item(&flat_key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "flat storage load failed");
                return None;
            }
        };
        match PersistedState::from_json(&text) {
            Ok(state) => {
                tracing::debug!(key, "loaded grid state from flat storage");
                Some(state)
            }
            Err(source) => {
                let e = StorageError::Deserialization {
                    key: key.to_string(),
                    source,
                };
                tracing::warn!(key, error = %e, "ignoring malformed stored state");
                None
            }
        }
    }
}
