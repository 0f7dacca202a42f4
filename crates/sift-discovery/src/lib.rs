//! Sift Discovery - Local file discovery and per-file matching.
//!
//! Everything needed to turn a directory tree into per-file match results:
//! walking, text/binary classification, multi-encoding decoding and the
//! line-oriented pattern scanner. All functions here are synchronous; the
//! scanner crate runs them on blocking worker threads.

pub mod cancel;
pub mod classifier;
pub mod reader;
pub mod scanner;
pub mod walker;

// Re-export main types
pub use cancel::CancellationToken;
pub use classifier::is_text;
pub use reader::{decode, read_text, ReadError};
pub use scanner::{FileMatches, FileScanner, PatternMatch};
pub use walker::FileWalker;
