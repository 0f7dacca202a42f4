//! Sift command-line application shell
//!
//! This is the thin binary shell that parses arguments, installs logging and
//! dispatches to subcommands. Scanning logic lives in the `crates/` directory.

mod cli;
pub mod commands;
pub mod report;

pub use cli::{Cli, Command, PatternsCommand, ScanArgs};

use anyhow::Context;
use sift_core::AppConfig;
use std::process::ExitCode;
use tracing::info;

/// Initialize tracing subscriber for logging.
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
pub fn init_tracing(quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if quiet { "warn" } else { "info,sift=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    info!("Starting sift v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Scan(args) => {
            let config = AppConfig::load_with_env().context("failed to load configuration")?;
            commands::scan::run(args, config).await
        }
        Command::Patterns(PatternsCommand::List { patterns }) => {
            let config = AppConfig::load_with_env().context("failed to load configuration")?;
            commands::patterns::list(patterns.as_deref(), &config)
        }
        Command::Patterns(PatternsCommand::Init { path, force }) => {
            let config = AppConfig::load_with_env().context("failed to load configuration")?;
            let target = commands::patterns::init_target(path.as_deref(), &config)?;
            commands::patterns::init(&target, force)
        }
    }
}
