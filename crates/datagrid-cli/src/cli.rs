//! CLI argument definitions for the data grid host.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use datagrid_cli::interact::{FilterArg, Interactions, SortArg};
use datagrid_cli::logging::LogFormat;
use datagrid_model::ViewMode;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "datagrid",
    version,
    about = "Data grid host - view tabular data with persisted view state",
    long_about = "Render rows through a column schema with search, filters, sorting and\n\
                  pagination. View state is saved per grid id and restored on the next run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the state database and fallback files
    /// (default: the platform data directory).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current page of a grid, applying and saving view changes.
    Show(ShowArgs),

    /// Print the stored view state of a grid as JSON.
    State(GridArgs),

    /// Delete the stored view state of a grid.
    Reset(GridArgs),

    /// Print the parsed column descriptors of a schema.
    Columns(ColumnsArgs),
}

/// Which grid, and how it persists.
#[derive(Args)]
pub struct GridArgs {
    /// Grid id; the storage key unless the options set `persist.key`.
    #[arg(long = "grid-id", value_name = "ID")]
    pub grid_id: Option<String>,

    /// Options file (TOML): grid id, field mappings, persistence policy.
    #[arg(long = "options", value_name = "PATH")]
    pub options: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Column schema (JSON array of column definitions).
    #[arg(long = "columns", value_name = "PATH")]
    pub columns: PathBuf,

    /// Rows (JSON array of objects, or CSV with a header row).
    #[arg(long = "rows", value_name = "PATH")]
    pub rows: PathBuf,

    /// Switch the view mode.
    #[arg(long = "view", value_enum)]
    pub view: Option<ViewArg>,

    /// Set the search query (empty to clear).
    #[arg(long = "search", value_name = "QUERY")]
    pub search: Option<String>,

    /// Sort by a column; repeat for secondary sorts.
    #[arg(long = "sort", value_name = "COL[:desc]")]
    pub sort: Vec<SortArg>,

    /// Set a column filter; repeat for more columns.
    #[arg(long = "filter", value_name = "COL=VALUE")]
    pub filter: Vec<FilterArg>,

    /// Go to a page (1-based).
    #[arg(long = "page", value_name = "N")]
    pub page: Option<usize>,

    /// Rows per page.
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,
}

impl ShowArgs {
    pub fn interactions(&self) -> Interactions {
        Interactions {
            view: self.view.map(ViewArg::mode),
            search: self.search.clone(),
            sorting: self.sort.clone(),
            filters: self.filter.clone(),
            page_size: self.page_size,
            page: self.page,
        }
    }
}

#[derive(Args)]
pub struct ColumnsArgs {
    /// Column schema (JSON array of column definitions).
    #[arg(long = "columns", value_name = "PATH")]
    pub columns: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Table,
    Gallery,
    Calendar,
}

impl ViewArg {
    fn mode(self) -> ViewMode {
        match self {
            Self::Table => ViewMode::Table,
            Self::Gallery => ViewMode::Gallery,
            Self::Calendar => ViewMode::Calendar,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
