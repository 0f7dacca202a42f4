//! Subcommand handlers.

pub mod patterns;
pub mod scan;
