//! Bounded worker pool for per-file units of work.
//!
//! Each file runs on Tokio's blocking thread pool. At most `pool_size` units
//! are in flight; the dispatcher waits for one to finish before submitting
//! the next and hands every outcome to the aggregator as it arrives.

use crate::aggregator::ResultAggregator;
use crate::outcome::FileOutcome;
use futures::stream::{FuturesUnordered, StreamExt};
use sift_core::config::{DEFAULT_MAX_FILE_SIZE, DEFAULT_POOL_SIZE};
use sift_core::{MatchScope, ScanningConfig};
use sift_discovery::{is_text, read_text, CancellationToken, FileScanner};
use sift_patterns::CompiledPatternSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

/// Runs the file scanner over a list of paths with bounded concurrency.
#[derive(Debug, Clone)]
pub struct ScanWorkerPool {
    unit: FileUnit,
    pool_size: usize,
}

impl ScanWorkerPool {
    /// Create a pool with default size, size limit and line-scoped matching.
    #[must_use]
    pub fn new(patterns: Arc<CompiledPatternSet>) -> Self {
        Self {
            unit: FileUnit {
                patterns,
                scanner: FileScanner::default(),
                max_file_size: DEFAULT_MAX_FILE_SIZE,
            },
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Create a pool from the `[scanning]` config section.
    #[must_use]
    pub fn from_config(patterns: Arc<CompiledPatternSet>, config: &ScanningConfig) -> Self {
        Self::new(patterns)
            .with_pool_size(config.pool_size)
            .with_max_file_size(config.max_file_size)
            .with_scope(config.match_scope)
    }

    /// Set the number of concurrent units. Zero is treated as one.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    /// Skip files larger than `bytes`.
    #[must_use]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.unit.max_file_size = bytes;
        self
    }

    /// Set the match scope.
    #[must_use]
    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.unit.scanner = FileScanner::new(scope);
        self
    }

    /// Concurrent unit limit.
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Process `paths`, feeding every outcome to `aggregator`.
    ///
    /// Returns `true` if cancellation was observed. Once the token is set no
    /// new units are submitted; units already running finish normally and
    /// their outcomes are still recorded.
    pub async fn run(
        &self,
        paths: Vec<PathBuf>,
        token: &CancellationToken,
        aggregator: &mut ResultAggregator,
    ) -> bool {
        let mut in_flight = FuturesUnordered::new();
        let mut cancelled = false;

        for path in paths {
            if token.is_cancelled() {
                debug!("cancellation requested, no further files submitted");
                cancelled = true;
                break;
            }

            in_flight.push(self.submit(path, token.clone()));

            while in_flight.len() >= self.pool_size {
                if let Some((path, outcome)) = in_flight.next().await {
                    cancelled |= record(aggregator, path, outcome);
                }
            }
        }

        while let Some((path, outcome)) = in_flight.next().await {
            cancelled |= record(aggregator, path, outcome);
        }

        cancelled || token.is_cancelled()
    }

    fn submit(
        &self,
        path: PathBuf,
        token: CancellationToken,
    ) -> impl Future<Output = (PathBuf, Option<FileOutcome>)> {
        let unit = self.unit.clone();
        let task_path = path.clone();
        let handle = tokio::task::spawn_blocking(move || unit.run(&task_path, &token));
        settle(path, handle)
    }
}

/// Returns `true` when the unit declined to start because of cancellation.
fn record(aggregator: &mut ResultAggregator, path: PathBuf, outcome: Option<FileOutcome>) -> bool {
    match outcome {
        Some(outcome) => {
            aggregator.record(path, outcome);
            false
        }
        None => true,
    }
}

/// Await a unit, turning a panic into an `Errored` outcome for that file.
async fn settle(
    path: PathBuf,
    handle: JoinHandle<Option<FileOutcome>>,
) -> (PathBuf, Option<FileOutcome>) {
    match handle.await {
        Ok(outcome) => (path, outcome),
        Err(e) => {
            let message = format!("unexpected failure while scanning: {}", join_error_message(e));
            (path, Some(FileOutcome::Errored(message)))
        }
    }
}

fn join_error_message(error: JoinError) -> String {
    match error.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string()),
        Err(error) => error.to_string(),
    }
}

/// The blocking work for one file.
#[derive(Debug, Clone)]
struct FileUnit {
    patterns: Arc<CompiledPatternSet>,
    scanner: FileScanner,
    max_file_size: u64,
}

impl FileUnit {
    /// `None` means the unit saw the cancellation flag and did nothing.
    fn run(&self, path: &Path, token: &CancellationToken) -> Option<FileOutcome> {
        if token.is_cancelled() {
            return None;
        }

        if !is_text(path) {
            debug!(path = %path.display(), "skipping non-text file");
            return Some(FileOutcome::Skipped);
        }

        if let Ok(metadata) = std::fs::metadata(path) {
            if metadata.len() > self.max_file_size {
                debug!(
                    path = %path.display(),
                    size = metadata.len(),
                    limit = self.max_file_size,
                    "skipping oversized file"
                );
                return Some(FileOutcome::Skipped);
            }
        }

        let text = match read_text(path) {
            Ok(text) => text,
            Err(e) => return Some(FileOutcome::Errored(e.to_string())),
        };

        Some(FileOutcome::Scanned(self.scanner.scan(
            path,
            &text,
            &self.patterns,
            token,
        )))
    }
}
