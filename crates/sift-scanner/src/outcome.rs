//! Per-file scan outcome.

use serde::{Deserialize, Serialize};
use sift_discovery::FileMatches;

/// Result of one file's unit of work. Every discovered file that was
/// processed gets exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "lowercase")]
pub enum FileOutcome {
    /// Read and matched; the map may be empty
    Scanned(FileMatches),
    /// Not text, or over the size limit
    Skipped,
    /// Could not be read or decoded, or the match phase failed
    Errored(String),
}

impl FileOutcome {
    /// Number of individual matches carried by this outcome.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self {
            Self::Scanned(matches) => matches.values().map(Vec::len).sum(),
            Self::Skipped | Self::Errored(_) => 0,
        }
    }
}
