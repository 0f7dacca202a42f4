use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a scan from starting or finishing.
///
/// Per-file failures never surface here; they are recorded on the session
/// as `Errored` outcomes.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("scan root is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("a scan is already in progress")]
    AlreadyScanning,

    #[error("failed to access scan root: {0}")]
    Walk(#[from] std::io::Error),

    #[error("scan task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
