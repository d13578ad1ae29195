//! Storage for persisted grid state.
//!
//! Two tiers sit behind [`StateStorage`]:
//!
//! - a document store ([`DocumentCollection`]), opened lazily through a
//!   [`DocumentStoreProvider`]; the production provider is SQLite
//! - a flat key/value store ([`KeyValueStore`]) that serves every call the
//!   document store cannot
//!
//! # Architecture
//!
//! - `storage.rs` - Tier selection and fallback
//! - `document.rs` - Document store traits and the in-memory store
//! - `sqlite.rs` - SQLite document store
//! - `kv.rs` - Flat key/value stores (memory and one-file-per-key)
//! - `error.rs` - Error types

mod document;
mod error;
mod kv;
mod sqlite;
mod storage;

pub use document::{
    DocumentCollection, DocumentStoreProvider, MAX_KEY_LEN, MemoryDocumentStore, StateDocument,
    UnavailableDocumentStore,
};
pub use error::{Result, StorageError};
pub use kv::{
    DEFAULT_NAMESPACE, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, namespaced_key,
};
pub use sqlite::{DATABASE_FILE, SqliteDocumentStore, SqliteProvider};
pub use storage::{SaveOutcome, StateStorage};
