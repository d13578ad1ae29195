//! SQLite-backed document store.
//!
//! One table, `datagrid_states`, keyed by the storage key. Statements run on
//! the blocking thread pool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use datagrid_model::PersistedState;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::document::{DocumentCollection, DocumentStoreProvider, StateDocument, check_key};
use crate::error::{Result, StorageError};

/// File name of the database inside a data directory.
pub const DATABASE_FILE: &str = "datagrid.sqlite3";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS datagrid_states (
    key TEXT PRIMARY KEY NOT NULL CHECK (length(key) <= 100),
    state TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);";

/// Open connection to the state database.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDocumentStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteDocumentStore {
    /// Open (creating if needed) the database at `path`. Blocking.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let init_err = |source| StorageError::Init {
            path: path.to_path_buf(),
            source,
        };
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_with_flags(path, flags).map_err(init_err)?;
        connection.busy_timeout(BUSY_TIMEOUT).map_err(init_err)?;
        connection.execute_batch(SCHEMA).map_err(init_err)?;

        tracing::debug!(path = %path.display(), "opened grid state database");
        Ok(Self {
            path: path.to_path_buf(),
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let guard = connection.lock().unwrap_or_else(PoisonError::into_inner);
            f(&guard)
        })
        .await
        .map_err(|source| StorageError::Task { source })?
    }
}

#[async_trait]
impl DocumentCollection for SqliteDocumentStore {
    async fn upsert(&self, document: StateDocument) -> Result<()> {
        check_key(&document.key)?;
        let state = document
            .state
            .to_json()
            .map_err(|source| StorageError::Serialization { source })?;
        let updated_at = i64::try_from(document.updated_at).unwrap_or(i64::MAX);
        let key = document.key;

        self.run(move |conn| {
            conn.execute(
                "INSERT INTO datagrid_states (key, state, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
                params![key, state, updated_at],
            )
            .map_err(|source| StorageError::Database {
                operation: "upsert",
                source,
            })?;
            Ok(())
        })
        .await
    }

    async fn find_one(&self, key: &str) -> Result<Option<StateDocument>> {
        check_key(key)?;
        let key = key.to_string();

        self.run(move |conn| {
            let row: Option<(String, i64)> = conn
                .query_row(
                    "SELECT state, updated_at FROM datagrid_states WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|source| StorageError::Database {
                    operation: "query",
                    source,
                })?;

            let Some((state, updated_at)) = row else {
                return Ok(None);
            };
            let state = PersistedState::from_json(&state).map_err(|source| {
                StorageError::Deserialization {
                    key: key.clone(),
                    source,
                }
            })?;
            Ok(Some(StateDocument {
                key,
                state,
                updated_at: u64::try_from(updated_at).unwrap_or(0),
            }))
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        check_key(key)?;
        let key = key.to_string();

        self.run(move |conn| {
            let removed = conn
                .execute("DELETE FROM datagrid_states WHERE key = ?1", params![key])
                .map_err(|source| StorageError::Database {
                    operation: "delete",
                    source,
                })?;
            Ok(removed > 0)
        })
        .await
    }
}

/// Opens a [`SqliteDocumentStore`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    path: PathBuf,
}

impl SqliteProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provider for [`DATABASE_FILE`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DATABASE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStoreProvider for SqliteProvider {
    async fn open(&self) -> Result<Arc<dyn DocumentCollection>> {
        let path = self.path.clone();
        let store = tokio::task::spawn_blocking(move || SqliteDocumentStore::open(&path))
            .await
            .map_err(|source| StorageError::Task { source })??;
        Ok(Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_model::{SortEntry, ViewMode};

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteDocumentStore::open(&dir.path().join(DATABASE_FILE)).unwrap();

        let mut state = PersistedState::stamped(42);
        state.view = Some(ViewMode::Gallery);
        state.sorting = Some(vec![SortEntry::desc("name")]);
        let doc = StateDocument {
            key: "orders".into(),
            state,
            updated_at: 42,
        };

        store.upsert(doc.clone()).await.unwrap();
        assert_eq!(store.find_one("orders").await.unwrap(), Some(doc.clone()));

        let mut newer = doc.clone();
        newer.updated_at = 43;
        store.upsert(newer.clone()).await.unwrap();
        assert_eq!(store.find_one("orders").await.unwrap(), Some(newer));

        assert!(store.remove("orders").await.unwrap());
        assert_eq!(store.find_one("orders").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_row_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DATABASE_FILE);
        let store = SqliteDocumentStore::open(&path).unwrap();
        {
            let conn = store.connection.lock().unwrap();
            conn.execute(
                "INSERT INTO datagrid_states (key, state, updated_at) VALUES ('bad', 'not json', 0)",
                [],
            )
            .unwrap();
        }
        assert!(matches!(
            store.find_one("bad").await,
            Err(StorageError::Deserialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_provider_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SqliteProvider::in_dir(&dir.path().join("nested").join("data"));
        let collection = provider.open().await.unwrap();
        assert!(collection.find_one("none").await.unwrap().is_none());
        assert!(provider.path().exists());
    }
}
