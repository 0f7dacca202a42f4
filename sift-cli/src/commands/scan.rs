//! `sift scan`

use crate::cli::ScanArgs;
use crate::commands::patterns;
use crate::report;
use anyhow::Context;
use sift_core::AppConfig;
use sift_patterns::CompiledPatternSet;
use sift_scanner::{CancellationToken, ScanController, ScanSession, ScanState};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// Fold command-line flags over the loaded configuration.
#[must_use]
pub fn apply_args(args: &ScanArgs, mut config: AppConfig) -> AppConfig {
    if let Some(workers) = args.workers {
        config.scanning.pool_size = workers;
    }
    if let Some(scope) = args.scope {
        config.scanning.match_scope = scope;
    }
    config
}

/// Run a scan to completion. Ctrl-C requests cooperative cancellation.
///
/// Returns the final session together with the rules it was scanned with.
pub async fn execute(
    args: &ScanArgs,
    config: &AppConfig,
) -> anyhow::Result<(ScanSession, Arc<CompiledPatternSet>)> {
    let definitions = patterns::resolve_definitions(args.patterns.as_deref(), config)?;
    let patterns = Arc::new(CompiledPatternSet::load(definitions));

    let token = CancellationToken::new();
    let controller = ScanController::from_config(Arc::clone(&patterns), config);
    let handle = controller
        .start_scan_with(&args.dir, token.clone())
        .with_context(|| format!("failed to start scan of {}", args.dir.display()))?;

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling scan");
            token.cancel();
        }
    });

    let session = handle.wait().await;
    interrupt.abort();
    Ok((session?, patterns))
}

/// Entry point for the `scan` subcommand.
pub async fn run(args: ScanArgs, config: AppConfig) -> anyhow::Result<ExitCode> {
    let config = apply_args(&args, config);
    let (session, patterns) = execute(&args, &config).await?;

    if args.json {
        println!("{}", report::render_json(&session)?);
    } else {
        print!("{}", report::render_summary(&session, &patterns));
    }

    Ok(match session.state() {
        ScanState::Completed => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
