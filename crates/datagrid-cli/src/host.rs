//! Host sessions: one grid, its persistence manager and the shared storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use datagrid_columns::ColumnDef;
use datagrid_model::{GridOptions, PersistedState, Row};
use datagrid_persistence::{LoadOutcome, PersistenceManager};
use datagrid_state::{GridHandle, GridStore};
use datagrid_storage::{FileKeyValueStore, SqliteProvider, StateStorage};

use crate::input::HostConfig;
use crate::interact::Interactions;
use crate::render::{page_summary, page_table, status_line};

/// Subdirectory of the data dir holding flat fallback records.
pub const FLAT_STORE_DIR: &str = "kv";

/// Platform data directory, e.g. `~/.local/share/datagrid` on Linux.
pub fn default_data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "datagrid")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("no home directory; pass --data-dir"))
}

/// SQLite document store in `dir`, backed by flat files in `dir/kv`.
///
/// Nothing is opened until the first save or load.
pub fn open_storage(dir: &Path) -> Arc<StateStorage> {
    tracing::debug!(dir = %dir.display(), "using data directory");
    Arc::new(StateStorage::new(
        Arc::new(SqliteProvider::in_dir(dir)),
        Arc::new(FileKeyValueStore::new(dir.join(FLAT_STORE_DIR))),
    ))
}

/// Options from the config file with the command-line grid id applied.
pub fn grid_options(config: &HostConfig, grid_id: Option<&str>) -> GridOptions {
    let mut options = config.grid.clone();
    if let Some(id) = grid_id {
        options.id = Some(id.to_string());
    }
    options
}

/// Everything `show` printed, for the caller to place on stdout/stderr.
#[derive(Debug)]
pub struct ShowReport {
    pub load: LoadOutcome,
    pub table: String,
    pub summary: String,
    pub status: String,
    pub notes: Vec<String>,
}

/// Build a grid, restore its saved state, replay `interactions` and flush.
pub async fn show(
    storage: Arc<StateStorage>,
    config: &HostConfig,
    options: GridOptions,
    columns: Vec<ColumnDef>,
    rows: Vec<Row>,
    interactions: &Interactions,
) -> ShowReport {
    let handle = GridHandle::new(GridStore::with_data(options, columns, rows));
    let manager = PersistenceManager::new(handle.clone(), storage, config.autosave);

    let load = manager.load().await;
    tracing::info!(outcome = ?load, "grid state loaded");

    let notes = if interactions.is_empty() {
        Vec::new()
    } else {
        handle.update(|store| interactions.apply(store))
    };
    manager.flush().await;

    let (table, summary) =
        handle.read(|store| (page_table(store).to_string(), page_summary(store)));
    let status = status_line(manager.storage_key().as_deref(), &manager.status());
    ShowReport {
        load,
        table,
        summary,
        status,
        notes,
    }
}

/// The record stored for `options`, if any.
pub async fn stored_state(
    storage: &StateStorage,
    options: &GridOptions,
) -> Result<Option<PersistedState>> {
    let key = options
        .storage_key()
        .context("no grid id or persist key; pass --grid-id")?;
    Ok(storage.load(key, options.persist.storage).await)
}

/// Delete the stored record for `options`. Returns false when the grid has
/// no storage key or persistence is switched off.
pub async fn reset(storage: Arc<StateStorage>, config: &HostConfig, options: GridOptions) -> bool {
    let handle = GridHandle::new(GridStore::new(options));
    let manager = PersistenceManager::new(handle, storage, config.autosave);
    manager.reset().await
}
