//! Sift Patterns - Rule definitions and compiled pattern sets.
//!
//! This crate turns loosely-typed rule definitions (name → regex,
//! description, risk level, enabled flag) into a validated, compiled set of
//! matchers that scan workers can share without synchronisation.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): raw `RuleDefinition` records and validated `PatternRule`s
//! - **Built-in Rules** ([`builtin`]): the default rule set used when no rule file is configured
//! - **Compiled Set** ([`set`]): `CompiledPatternSet`, built once per scan
//! - **Rule File** ([`loader`]): JSON persistence for rule definitions
//! - **Errors** ([`error`]): pattern-specific error types
//!
//! # Example
//!
//! ```rust
//! use sift_patterns::{builtin_rules, CompiledPatternSet};
//!
//! let set = CompiledPatternSet::load(builtin_rules());
//! assert!(set.rejected().is_empty());
//!
//! let email = set.get("email").expect("email rule is built in");
//! assert!(email.is_match("contact: test@example.com"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builtin;
pub mod definition;
pub mod error;
pub mod loader;
pub mod set;

// Re-export commonly used types
pub use builtin::builtin_rules;
pub use definition::{PatternRule, RuleDefinition, RuleDefinitions};
pub use error::{PatternError, Result};
pub use loader::PatternFile;
pub use set::{CompiledPatternSet, CompiledRule};
