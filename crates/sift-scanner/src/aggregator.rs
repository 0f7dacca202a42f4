//! Single-writer result aggregation.
//!
//! The aggregator is owned by the scan's dispatching task, so outcomes are
//! merged one at a time in completion order. The session itself sits behind
//! an `RwLock` only so handles can take snapshots while the scan runs.

use crate::observer::ScanObserver;
use crate::outcome::FileOutcome;
use crate::session::{ScanSession, ScanState};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Merges file outcomes into a [`ScanSession`] and reports progress.
pub struct ResultAggregator {
    session: Arc<RwLock<ScanSession>>,
    observer: Arc<dyn ScanObserver>,
    completed: usize,
}

impl ResultAggregator {
    /// Create an aggregator writing into `session`.
    pub fn new(session: Arc<RwLock<ScanSession>>, observer: Arc<dyn ScanObserver>) -> Self {
        Self {
            session,
            observer,
            completed: 0,
        }
    }

    /// Shared session this aggregator writes to.
    #[must_use]
    pub fn session(&self) -> &Arc<RwLock<ScanSession>> {
        &self.session
    }

    /// Outcomes recorded so far.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Mark the session as scanning and stamp the start time.
    pub fn begin(&self) {
        self.session
            .write()
            .expect("acquire write lock on scan session")
            .begin();
    }

    /// Record how many files the walker found.
    pub fn set_total(&self, total: usize) {
        self.session
            .write()
            .expect("acquire write lock on scan session")
            .set_total(total);
        self.status(&format!("Found {total} files, starting scan..."));
    }

    /// Forward a status line to the observer.
    pub fn status(&self, message: &str) {
        self.observer.on_status(message);
    }

    /// Merge one file's outcome and notify the observer.
    #[allow(clippy::cast_precision_loss)]
    pub fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        if let FileOutcome::Errored(message) = &outcome {
            warn!(path = %path.display(), error = %message, "file scan failed");
        }

        let name = display_name(&path);
        let total = {
            let mut session = self
                .session
                .write()
                .expect("acquire write lock on scan session");
            session.apply(path, outcome);
            session.stats().total_files
        };
        self.completed += 1;

        let percent = if total == 0 {
            100.0
        } else {
            self.completed as f64 / total as f64 * 100.0
        };
        self.observer.on_progress(percent, &name);
        self.status(&format!("Progress: {}/{total} - {name}", self.completed));
    }

    /// Move the session to its terminal state and report the result.
    pub fn finish(&self, cancelled: bool) -> ScanState {
        let (state, items) = {
            let mut session = self
                .session
                .write()
                .expect("acquire write lock on scan session");
            session.finish(cancelled);
            let stats = session.stats();
            info!(
                session = %session.id(),
                state = %session.state(),
                total = stats.total_files,
                scanned = stats.scanned_files,
                skipped = stats.skipped_files,
                errors = stats.error_files,
                items = stats.sensitive_items,
                "scan finished"
            );
            (session.state(), stats.sensitive_items)
        };

        if cancelled {
            self.status("Scan cancelled");
        } else {
            self.status(&format!("Scan complete: {items} sensitive items found"));
        }
        state
    }
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
