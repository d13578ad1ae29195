//! Host-supplied grid options and the persistence policy.

use serde::{Deserialize, Serialize};

/// Which storage backend a grid persists to.
///
/// The serialized names follow the host option schema (`indexeddb`,
/// `localstorage`); the descriptive names are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageBackend {
    /// Document collection with flat key/value fallback.
    #[default]
    #[serde(rename = "indexeddb", alias = "document-store")]
    DocumentStore,
    /// Flat key/value store only.
    #[serde(rename = "localstorage", alias = "flat-kv")]
    FlatKv,
}

impl StorageBackend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DocumentStore => "document-store",
            Self::FlatKv => "flat-kv",
        }
    }
}

/// Per-field inclusion switches for persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateInclusion {
    pub view: bool,
    pub pagination: bool,
    pub sorting: bool,
    pub filters: bool,
    pub search: bool,
    pub column_order: bool,
    pub column_visibility: bool,
    pub column_sizing: bool,
}

impl Default for StateInclusion {
    fn default() -> Self {
        Self {
            view: true,
            pagination: true,
            sorting: true,
            filters: true,
            search: true,
            column_order: true,
            column_visibility: false,
            column_sizing: true,
        }
    }
}

impl StateInclusion {
    /// Include nothing.
    pub fn none() -> Self {
        Self {
            view: false,
            pagination: false,
            sorting: false,
            filters: false,
            search: false,
            column_order: false,
            column_visibility: false,
            column_sizing: false,
        }
    }
}

/// Persistence configuration of one grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistPolicy {
    /// Persistence is opt-out: enabled unless explicitly disabled.
    pub enabled: bool,

    /// Explicit storage key. Falls back to the grid id.
    pub key: Option<String>,

    /// Backend selector.
    pub storage: StorageBackend,

    /// Which state fields are written and applied.
    pub state: StateInclusion,

    /// Time-to-live in milliseconds. Reserved: parsed and kept, never enforced.
    #[serde(rename = "ttl")]
    pub ttl_ms: Option<u64>,
}

impl Default for PersistPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            key: None,
            storage: StorageBackend::default(),
            state: StateInclusion::default(),
            ttl_ms: None,
        }
    }
}

impl PersistPolicy {
    /// A policy with persistence switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Options supplied by the host alongside rows and columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    /// Unique grid identifier, used as the storage key when no explicit key is set.
    pub id: Option<String>,

    // Field mappings for the gallery and calendar adapters.
    pub image_field: Option<String>,
    pub title_field: Option<String>,
    pub description_field: Option<String>,
    pub start_date_field: Option<String>,
    pub end_date_field: Option<String>,
    pub badge_field: Option<String>,

    pub persist: PersistPolicy,
}

impl GridOptions {
    /// Options for a grid with the given id and default persistence.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Resolve the storage key: explicit key first, then the grid id.
    ///
    /// Empty strings count as absent.
    pub fn storage_key(&self) -> Option<&str> {
        self.persist
            .key
            .as_deref()
            .filter(|key| !key.is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let policy = PersistPolicy::default();
        assert!(policy.enabled);
        assert_eq!(policy.storage, StorageBackend::DocumentStore);
        assert!(policy.state.sorting);
        assert!(!policy.state.column_visibility);
        assert!(policy.ttl_ms.is_none());
    }

    #[test]
    fn test_partial_policy_json_keeps_defaults() {
        let policy: PersistPolicy =
            serde_json::from_str(r#"{"storage":"localstorage","state":{"sorting":false},"ttl":60000}"#)
                .unwrap();
        assert!(policy.enabled);
        assert_eq!(policy.storage, StorageBackend::FlatKv);
        assert!(!policy.state.sorting);
        assert!(policy.state.filters);
        assert_eq!(policy.ttl_ms, Some(60_000));
    }

    #[test]
    fn test_backend_aliases() {
        let backend: StorageBackend = serde_json::from_str("\"flat-kv\"").unwrap();
        assert_eq!(backend, StorageBackend::FlatKv);
        let backend: StorageBackend = serde_json::from_str("\"document-store\"").unwrap();
        assert_eq!(backend, StorageBackend::DocumentStore);
    }

    #[test]
    fn test_storage_key_resolution() {
        let mut options = GridOptions::default();
        assert_eq!(options.storage_key(), None);

        options.id = Some("orders".into());
        assert_eq!(options.storage_key(), Some("orders"));

        options.persist.key = Some("orders-v2".into());
        assert_eq!(options.storage_key(), Some("orders-v2"));

        options.persist.key = Some(String::new());
        assert_eq!(options.storage_key(), Some("orders"));
    }
}
