//! Scan controller for starting, observing and cancelling scans.
//!
//! This module provides the `ScanController`, which validates the scan root,
//! creates a fresh [`ScanSession`] and runs the walk and the worker pool in a
//! background task. The caller gets a [`ScanHandle`] back immediately.

use crate::aggregator::ResultAggregator;
use crate::error::{Result, ScanError};
use crate::observer::{ScanObserver, TracingObserver};
use crate::pool::ScanWorkerPool;
use crate::session::{ScanSession, ScanState};
use sift_core::{AppConfig, SessionId};
use sift_discovery::{CancellationToken, FileWalker};
use sift_patterns::CompiledPatternSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Starts scans and enforces that only one runs at a time.
pub struct ScanController {
    /// File enumeration settings
    walker: FileWalker,
    /// Per-file worker pool
    pool: ScanWorkerPool,
    /// Receives progress and status callbacks
    observer: Arc<dyn ScanObserver>,
    /// Session of the most recent scan
    active: Mutex<Option<Arc<RwLock<ScanSession>>>>,
}

impl ScanController {
    /// Create a controller with default settings.
    #[must_use]
    pub fn new(patterns: Arc<CompiledPatternSet>) -> Self {
        Self {
            walker: FileWalker::new(),
            pool: ScanWorkerPool::new(patterns),
            observer: Arc::new(TracingObserver),
            active: Mutex::new(None),
        }
    }

    /// Create a controller from the `[scanning]` and `[walk]` config sections.
    #[must_use]
    pub fn from_config(patterns: Arc<CompiledPatternSet>, config: &AppConfig) -> Self {
        Self {
            walker: FileWalker::from_config(&config.walk),
            pool: ScanWorkerPool::from_config(patterns, &config.scanning),
            observer: Arc::new(TracingObserver),
            active: Mutex::new(None),
        }
    }

    /// Set the number of files scanned concurrently.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool = self.pool.with_pool_size(pool_size);
        self
    }

    /// Replace the file walker.
    #[must_use]
    pub fn with_walker(mut self, walker: FileWalker) -> Self {
        self.walker = walker;
        self
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Worker pool settings.
    #[must_use]
    pub fn pool(&self) -> &ScanWorkerPool {
        &self.pool
    }

    /// `Scanning` while a scan started by this controller is running,
    /// `Idle` otherwise.
    #[must_use]
    pub fn state(&self) -> ScanState {
        let active = self.active.lock().expect("acquire active scan lock");
        match active.as_ref() {
            Some(session) if !read_state(session).is_terminal() => ScanState::Scanning,
            _ => ScanState::Idle,
        }
    }

    /// Start scanning `root` in the background.
    ///
    /// The root is validated before anything else happens; on error no
    /// session is created. Must be called from within a Tokio runtime.
    pub fn start_scan(&self, root: impl AsRef<Path>) -> Result<ScanHandle> {
        self.start_scan_with(root, CancellationToken::new())
    }

    /// Like [`start_scan`](Self::start_scan), but cancelled through a token
    /// the caller already holds.
    pub fn start_scan_with(
        &self,
        root: impl AsRef<Path>,
        token: CancellationToken,
    ) -> Result<ScanHandle> {
        let root = root.as_ref().to_path_buf();
        validate_root(&root)?;

        let mut active = self.active.lock().expect("acquire active scan lock");
        if let Some(session) = active.as_ref() {
            if !read_state(session).is_terminal() {
                return Err(ScanError::AlreadyScanning);
            }
        }

        let session = Arc::new(RwLock::new(ScanSession::new(root.clone())));
        let aggregator = ResultAggregator::new(Arc::clone(&session), Arc::clone(&self.observer));
        aggregator.begin();
        *active = Some(Arc::clone(&session));
        drop(active);

        let id = session
            .read()
            .expect("acquire read lock on scan session")
            .id()
            .clone();
        info!(
            session = %id,
            root = %root.display(),
            pool_size = self.pool.pool_size(),
            "starting scan"
        );

        let task = tokio::spawn(run_session(
            root,
            self.walker.clone(),
            self.pool.clone(),
            aggregator,
            token.clone(),
        ));

        Ok(ScanHandle {
            id,
            session,
            token,
            task,
        })
    }

    /// Run a scan to completion and return the final session.
    pub async fn scan(&self, root: impl AsRef<Path>) -> Result<ScanSession> {
        self.start_scan(root)?.wait().await
    }
}

fn validate_root(root: &Path) -> Result<()> {
    let metadata = std::fs::metadata(root).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ScanError::NotFound {
                path: root.to_path_buf(),
            }
        } else {
            ScanError::Walk(e)
        }
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

fn read_state(session: &RwLock<ScanSession>) -> ScanState {
    session
        .read()
        .expect("acquire read lock on scan session")
        .state()
}

async fn run_session(
    root: PathBuf,
    walker: FileWalker,
    pool: ScanWorkerPool,
    mut aggregator: ResultAggregator,
    token: CancellationToken,
) -> ScanState {
    aggregator.status("Collecting files...");

    let files = match tokio::task::spawn_blocking(move || walker.walk(&root)).await {
        Ok(files) => files,
        Err(e) => {
            error!(error = %e, "file enumeration failed");
            Vec::new()
        }
    };
    aggregator.set_total(files.len());

    let cancelled = pool.run(files, &token, &mut aggregator).await;
    aggregator.finish(cancelled)
}

/// Handle to a running scan.
pub struct ScanHandle {
    id: SessionId,
    session: Arc<RwLock<ScanSession>>,
    token: CancellationToken,
    task: JoinHandle<ScanState>,
}

impl ScanHandle {
    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Request cooperative cancellation.
    ///
    /// Idempotent. Returns `false` without effect when the scan has already
    /// finished or cancellation was already requested.
    pub fn cancel(&self) -> bool {
        if read_state(&self.session).is_terminal() {
            return false;
        }
        let requested = self.token.cancel();
        if requested {
            info!(session = %self.id, "scan cancellation requested");
        }
        requested
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        read_state(&self.session)
    }

    /// Copy of the session as it is right now.
    #[must_use]
    pub fn snapshot(&self) -> ScanSession {
        self.session
            .read()
            .expect("acquire read lock on scan session")
            .clone()
    }

    /// Whether the background task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the scan to reach a terminal state and return the final
    /// session.
    pub async fn wait(self) -> Result<ScanSession> {
        let Self { session, task, .. } = self;
        task.await
            .map_err(|e| ScanError::TaskFailed(e.to_string()))?;

        let session = session
            .read()
            .expect("acquire read lock on scan session")
            .clone();
        Ok(session)
    }
}
