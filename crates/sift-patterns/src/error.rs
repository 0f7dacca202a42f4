//! Error types for the pattern subsystem.

use thiserror::Error;

/// Errors that can occur while loading or compiling pattern rules.
#[derive(Error, Debug)]
pub enum PatternError {
    /// A rule's regex failed to compile
    #[error("failed to compile regex for rule '{name}': {source}")]
    RuleCompile {
        /// Rule name
        name: String,
        /// Regex compilation error
        #[source]
        source: regex::Error,
    },

    /// A rule definition failed validation
    #[error("invalid rule '{name}': {reason}")]
    InvalidRule {
        /// Rule name
        name: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Failed to read a rule-definition file
    #[error("failed to load rule definitions from {path}: {source}")]
    LoadError {
        /// Path to the rule file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a rule-definition file
    #[error("failed to parse rule definitions in {path}: {source}")]
    ParseError {
        /// Path to the rule file
        path: String,
        /// JSON parse error
        #[source]
        source: serde_json::Error,
    },

    /// I/O error while writing rule definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PatternError {
    /// Name of the rule this error belongs to, if it is a per-rule error.
    #[must_use]
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Self::RuleCompile { name, .. } | Self::InvalidRule { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Result type for pattern operations.
pub type Result<T> = std::result::Result<T, PatternError>;
