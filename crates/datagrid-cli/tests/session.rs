//! Host sessions against on-disk storage, as the binary runs them.

use std::fs;
use std::path::Path;

use datagrid_cli::host::{self, FLAT_STORE_DIR};
use datagrid_cli::input::{HostConfig, load_columns, load_rows};
use datagrid_cli::interact::{FilterArg, Interactions, SortArg};
use datagrid_model::{SortEntry, StorageBackend};
use datagrid_persistence::LoadOutcome;
use datagrid_storage::DATABASE_FILE;

const COLUMNS: &str = r##"[
    {"type": "rowNumber", "header": "#"},
    {"field": "name", "header": "Name"},
    {"type": "number", "field": "score", "header": "Score"}
]"##;

fn write_inputs(dir: &Path) {
    let rows: Vec<String> = (0..12)
        .map(|i| format!("user{i:02},{i}"))
        .collect();
    fs::write(dir.join("columns.json"), COLUMNS).unwrap();
    fs::write(dir.join("rows.csv"), format!("name,score\n{}\n", rows.join("\n"))).unwrap();
}

async fn show(dir: &Path, config: &HostConfig, interactions: Interactions) -> host::ShowReport {
    let options = host::grid_options(config, Some("scores"));
    host::show(
        host::open_storage(&dir.join("data")),
        config,
        options,
        load_columns(&dir.join("columns.json")).unwrap(),
        load_rows(&dir.join("rows.csv")).unwrap(),
        &interactions,
    )
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn view_state_is_restored_on_next_run() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let config = HostConfig::default();

    let first = show(
        dir.path(),
        &config,
        Interactions {
            sorting: vec![SortArg(SortEntry::desc("score"))],
            page_size: Some(5),
            page: Some(2),
            ..Interactions::default()
        },
    )
    .await;
    assert_eq!(first.load, LoadOutcome::NotFound);
    assert_eq!(first.summary, "Page 2 of 3 · 12 rows");
    assert!(first.table.contains("user06"));
    assert!(first.status.contains("1 save(s)"));
    assert!(dir.path().join("data").join(DATABASE_FILE).exists());

    let second = show(dir.path(), &config, Interactions::default()).await;
    assert_eq!(second.load, LoadOutcome::Applied);
    assert_eq!(second.summary, "Page 2 of 3 · 12 rows");
    assert!(second.table.contains("Score ▼"));
    assert!(second.table.contains("user06"));
    assert!(!second.table.contains("user11"));
    assert!(second.status.contains("nothing saved"));
}

#[tokio::test(flavor = "multi_thread")]
async fn filters_and_unknown_columns() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let report = show(
        dir.path(),
        &HostConfig::default(),
        Interactions {
            filters: vec![
                "name=user1".parse::<FilterArg>().unwrap(),
                "missing=1".parse::<FilterArg>().unwrap(),
            ],
            ..Interactions::default()
        },
    )
    .await;
    assert_eq!(report.summary, "Page 1 of 1 · 2 rows (of 12)");
    assert_eq!(report.notes, vec!["unknown filter column 'missing'".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn reset_clears_both_tiers() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let config = HostConfig::from_toml("[persist]\nstorage = \"localstorage\"\n").unwrap();
    assert_eq!(config.grid.persist.storage, StorageBackend::FlatKv);

    show(
        dir.path(),
        &config,
        Interactions {
            search: Some("user0".to_string()),
            ..Interactions::default()
        },
    )
    .await;
    let storage = host::open_storage(&dir.path().join("data"));
    let options = host::grid_options(&config, Some("scores"));
    let stored = host::stored_state(&storage, &options).await.unwrap();
    assert_eq!(stored.and_then(|state| state.search).as_deref(), Some("user0"));
    assert!(dir.path().join("data").join(FLAT_STORE_DIR).exists());

    assert!(host::reset(storage.clone(), &config, options.clone()).await);
    assert_eq!(host::stored_state(&storage, &options).await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn grid_without_id_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = HostConfig::default();
    let storage = host::open_storage(dir.path());
    assert!(!host::reset(storage, &config, host::grid_options(&config, None)).await);
}
