//! Candidate file discovery.
//!
//! Walks a directory tree and returns every file that should be offered to
//! the scanner, skipping build output, VCS metadata, dependency caches and
//! hidden entries.

use sift_core::WalkConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never descended into.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".git",
    ".svn",
    "target",
    "build",
    "dist",
    "bin",
    "obj",
    "out",
    ".idea",
    ".vscode",
];

/// Hidden files that are still scanned.
pub const ALLOWED_HIDDEN_FILES: &[&str] = &[".env", ".gitignore", ".gitattributes"];

/// Recursive file enumerator.
#[derive(Debug, Clone, Default)]
pub struct FileWalker {
    max_depth: Option<usize>,
    extra_excluded_dirs: Vec<String>,
}

impl FileWalker {
    /// Create a walker with the built-in exclusions and no depth limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker from the `[walk]` config section.
    #[must_use]
    pub fn from_config(config: &WalkConfig) -> Self {
        Self::new()
            .with_max_depth(config.max_depth)
            .with_excluded_dirs(config.extra_excluded_dirs.iter().cloned())
    }

    /// Limit how many directory levels below the root are visited.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Exclude additional directory names.
    #[must_use]
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Enumerate candidate files under `root`, sorted by path.
    ///
    /// Symlinked directories are not descended into. A symlink whose target
    /// is a regular file is returned under its own path. Entries that can't
    /// be read are logged and skipped.
    pub fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(root).follow_links(false);
        if let Some(depth) = self.max_depth {
            // walkdir counts the root as depth 0 and its files as depth 1
            walker = walker.max_depth(depth.saturating_add(1));
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "failed to read directory entry");
                    None
                }
            })
            .filter(is_file_or_file_link)
            .filter(|entry| {
                let keep = !is_excluded_hidden_file(&entry.file_name().to_string_lossy());
                if !keep {
                    debug!(path = %entry.path().display(), "skipping hidden file");
                }
                keep
            })
            .map(DirEntry::into_path)
            .collect();

        files.sort();
        debug!(root = %root.display(), count = files.len(), "walked directory");
        files
    }

    /// Whether a directory entry (never the root itself) is excluded.
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        let pruned = self.is_excluded_dir(&name);
        if pruned {
            debug!(path = %entry.path().display(), "skipping excluded directory");
        }
        pruned
    }

    /// Check a directory name against the deny-lists and the hidden marker.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        name.starts_with('.')
            || EXCLUDED_DIRS.contains(&name)
            || self.extra_excluded_dirs.iter().any(|d| d == name)
    }
}

fn is_file_or_file_link(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// Hidden files are skipped unless they are on the allow-list.
#[must_use]
pub fn is_excluded_hidden_file(name: &str) -> bool {
    name.starts_with('.') && !ALLOWED_HIDDEN_FILES.contains(&name)
}
