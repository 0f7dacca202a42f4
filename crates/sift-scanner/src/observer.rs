//! Progress and status callbacks.

use tracing::debug;

/// Receives progress and status notifications from a running scan.
///
/// Callbacks are invoked from the scan's aggregating task, one at a time,
/// and must not block for long.
pub trait ScanObserver: Send + Sync {
    /// Called after each file completes with the overall percentage (0-100)
    /// and the file's name.
    fn on_progress(&self, _percent: f64, _current_file: &str) {}

    /// Called with a human-readable status line.
    fn on_status(&self, _message: &str) {}
}

/// Ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_progress(&self, percent: f64, current_file: &str) {
        debug!(percent, file = current_file, "scan progress");
    }

    fn on_status(&self, message: &str) {
        debug!(status = message, "scan status");
    }
}
