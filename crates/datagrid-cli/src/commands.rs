use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use datagrid_cli::host::{self, ShowReport};
use datagrid_cli::input::{HostConfig, load_columns, load_rows};
use datagrid_cli::render::columns_table;
use datagrid_columns::{EditCallback, parse_columns};
use datagrid_storage::StateStorage;
use tracing::{Instrument, info_span};

use crate::cli::{ColumnsArgs, GridArgs, ShowArgs};

fn storage(data_dir: Option<&PathBuf>) -> Result<Arc<StateStorage>> {
    let dir = match data_dir {
        Some(dir) => dir.clone(),
        None => host::default_data_dir()?,
    };
    Ok(host::open_storage(&dir))
}

pub async fn run_show(args: &ShowArgs, data_dir: Option<&PathBuf>) -> Result<ShowReport> {
    let config = HostConfig::load(args.grid.options.as_deref())?;
    let options = host::grid_options(&config, args.grid.grid_id.as_deref());
    let span = info_span!("show", grid = options.storage_key().unwrap_or("-"));

    let columns = load_columns(&args.columns)?;
    let rows = load_rows(&args.rows)?;
    let storage = storage(data_dir)?;
    Ok(host::show(
        storage,
        &config,
        options,
        columns,
        rows,
        &args.interactions(),
    )
    .instrument(span)
    .await)
}

pub async fn run_state(args: &GridArgs, data_dir: Option<&PathBuf>) -> Result<()> {
    let config = HostConfig::load(args.options.as_deref())?;
    let options = host::grid_options(&config, args.grid_id.as_deref());
    let storage = storage(data_dir)?;
    match host::stored_state(&storage, &options).await? {
        Some(state) => {
            let text = serde_json::to_string_pretty(&state).context("serialize state")?;
            println!("{text}");
        }
        None => eprintln!("no stored state"),
    }
    Ok(())
}

pub async fn run_reset(args: &GridArgs, data_dir: Option<&PathBuf>) -> Result<bool> {
    let config = HostConfig::load(args.options.as_deref())?;
    let options = host::grid_options(&config, args.grid_id.as_deref());
    let storage = storage(data_dir)?;
    Ok(host::reset(storage, &config, options).await)
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let columns = load_columns(&args.columns)?;
    let on_edit: EditCallback = Arc::new(|_row| {});
    let descriptors = parse_columns(&columns, &on_edit);
    println!("{}", columns_table(&descriptors));
    Ok(())
}
