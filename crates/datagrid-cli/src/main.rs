//! Data grid host CLI.

use clap::{ColorChoice, Parser};
use datagrid_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use crate::commands::{run_columns, run_reset, run_show, run_state};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start runtime: {error}");
            std::process::exit(1);
        }
    };

    let data_dir = cli.data_dir.as_ref();
    let exit_code = match &cli.command {
        Command::Show(args) => match runtime.block_on(run_show(args, data_dir)) {
            Ok(report) => {
                println!("{}", report.table);
                println!("{}", report.summary);
                eprintln!("{}", report.status);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::State(args) => match runtime.block_on(run_state(args, data_dir)) {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        },
        Command::Reset(args) => match runtime.block_on(run_reset(args, data_dir)) {
            Ok(true) => {
                eprintln!("stored state cleared");
                0
            }
            Ok(false) => {
                eprintln!("error: grid is not persisted (no grid id, key, or persistence disabled)");
                1
            }
            Err(error) => report_error(&error),
        },
        Command::Columns(args) => match run_columns(args) {
            Ok(()) => 0,
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = LevelFilter::from(level);
    }
    config.format = LogFormat::from(cli.log_format);
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
