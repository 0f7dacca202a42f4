//! Sift Scanner - Concurrent scan orchestration.
//!
//! This crate runs the per-file pipeline from `sift-discovery` over a whole
//! directory tree. It owns the scan lifecycle and the aggregate results.
//!
//! # Features
//!
//! - Bounded concurrency on Tokio's blocking pool (`pool_size` files in flight)
//! - Cooperative cancellation checked before each file and between rules
//! - Single-writer aggregation into a fresh [`ScanSession`] per scan
//! - Progress and status callbacks through [`ScanObserver`]
//! - A panic while scanning one file is recorded as an error for that file only
//!
//! # Example
//!
//! ```rust,no_run
//! use sift_patterns::{builtin_rules, CompiledPatternSet};
//! use sift_scanner::ScanController;
//! use std::sync::Arc;
//!
//! # async fn run() -> sift_scanner::Result<()> {
//! let patterns = Arc::new(CompiledPatternSet::load(builtin_rules()));
//! let controller = ScanController::new(patterns).with_pool_size(4);
//!
//! let handle = controller.start_scan("./project")?;
//! let session = handle.wait().await?;
//! println!("{} sensitive items", session.stats().sensitive_items);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod aggregator;
pub mod controller;
#[allow(missing_docs)]
pub mod error;
pub mod observer;
pub mod outcome;
pub mod pool;
pub mod session;

// Re-export commonly used types
pub use aggregator::ResultAggregator;
pub use controller::{ScanController, ScanHandle};
pub use error::{Result, ScanError};
pub use observer::{NoopObserver, ScanObserver, TracingObserver};
pub use outcome::FileOutcome;
pub use pool::ScanWorkerPool;
pub use session::{FileError, MatchRecord, ScanSession, ScanState, ScanStats};
pub use sift_discovery::CancellationToken;
