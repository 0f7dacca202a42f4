//! Sift Core - Foundation crate for the sift sensitive-data scanner.
//!
//! This crate provides the shared types, error handling and configuration
//! management that the other sift crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`SessionId`, `RiskLevel`, `MatchScope`, `Timestamp`)
//!
//! # Example
//!
//! ```rust
//! use sift_core::{AppConfig, MatchScope};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.scanning.pool_size, 8);
//! assert_eq!(config.scanning.match_scope, MatchScope::Line);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, PatternsConfig, ScanningConfig, WalkConfig};
pub use error::{ConfigError, ConfigResult, SiftError};
pub use types::{MatchScope, RiskLevel, SessionId, Timestamp};
