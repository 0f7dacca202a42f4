//! Scan session state.
//!
//! A [`ScanSession`] is created fresh for every scan and only ever mutated
//! by the scan's aggregator. Callers see it through read-only accessors or
//! cloned snapshots.

use crate::outcome::FileOutcome;
use serde::{Deserialize, Serialize, Serializer};
use sift_core::{SessionId, Timestamp};
use sift_discovery::FileMatches;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Lifecycle state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    /// Created, not started
    #[default]
    Idle,
    /// Files are being enumerated or scanned
    Scanning,
    /// Every discovered file was processed
    Completed,
    /// Stopped early by a cancellation request
    Cancelled,
}

impl ScanState {
    /// Whether the scan has finished, either way.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Counters for one scan. Only ever incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Files found by the walker
    pub total_files: usize,
    /// Files read and matched
    pub scanned_files: usize,
    /// Files classified as binary or over the size limit
    pub skipped_files: usize,
    /// Files that failed to read or scan
    pub error_files: usize,
    /// Sum of all matches across all files and rules
    pub sensitive_items: usize,
    /// When the scan started
    pub start_time: Option<Timestamp>,
    /// When the scan reached a terminal state
    pub end_time: Option<Timestamp>,
}

impl ScanStats {
    /// Wall-clock duration, once the scan has finished.
    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(*end.as_datetime() - *start.as_datetime()),
            _ => None,
        }
    }

    /// Files that were discovered but never processed because the scan was
    /// cancelled first. Always zero for a completed scan.
    #[must_use]
    pub fn unprocessed_files(&self) -> usize {
        self.total_files
            .saturating_sub(self.scanned_files + self.skipped_files + self.error_files)
    }
}

/// A file that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileError {
    /// File path
    #[serde(serialize_with = "lossy_path")]
    pub path: PathBuf,
    /// Human-readable reason
    pub message: String,
}

/// One occurrence of a rule in a file, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Rule that matched
    pub pattern_name: String,
    /// Matched text
    pub matched_text: String,
    /// 1-based line number
    pub line_number: usize,
    /// File the match was found in
    #[serde(serialize_with = "lossy_path")]
    pub file_path: PathBuf,
}

/// Aggregate state of one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    id: SessionId,
    #[serde(serialize_with = "lossy_path")]
    root: PathBuf,
    state: ScanState,
    #[serde(serialize_with = "lossy_keys")]
    results: BTreeMap<PathBuf, FileMatches>,
    #[serde(serialize_with = "lossy_paths")]
    scanned: Vec<PathBuf>,
    #[serde(serialize_with = "lossy_paths")]
    skipped: Vec<PathBuf>,
    errors: Vec<FileError>,
    stats: ScanStats,
}

impl ScanSession {
    /// Create an idle session for `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            id: SessionId::generate(),
            root: root.into(),
            state: ScanState::Idle,
            results: BTreeMap::new(),
            scanned: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Directory being scanned.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Matches per file. Only files with at least one match are present.
    #[must_use]
    pub fn results(&self) -> &BTreeMap<PathBuf, FileMatches> {
        &self.results
    }

    /// Files that were read and matched, with or without results.
    #[must_use]
    pub fn scanned(&self) -> &[PathBuf] {
        &self.scanned
    }

    /// Files that were skipped.
    #[must_use]
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    /// Files that failed, with reasons.
    #[must_use]
    pub fn errors(&self) -> &[FileError] {
        &self.errors
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Every match as a flat list, ordered by file, then rule, then line.
    #[must_use]
    pub fn records(&self) -> Vec<MatchRecord> {
        self.results
            .iter()
            .flat_map(|(path, matches)| {
                matches.iter().flat_map(move |(rule, found)| {
                    found.iter().map(move |m| MatchRecord {
                        pattern_name: rule.clone(),
                        matched_text: m.text.clone(),
                        line_number: m.line,
                        file_path: path.clone(),
                    })
                })
            })
            .collect()
    }

    /// Matches grouped by rule name.
    #[must_use]
    pub fn pattern_summary(&self) -> BTreeMap<String, Vec<MatchRecord>> {
        let mut summary: BTreeMap<String, Vec<MatchRecord>> = BTreeMap::new();
        for record in self.records() {
            summary
                .entry(record.pattern_name.clone())
                .or_default()
                .push(record);
        }
        summary
    }

    pub(crate) fn begin(&mut self) {
        self.state = ScanState::Scanning;
        self.stats.start_time = Some(Timestamp::now());
    }

    pub(crate) fn set_total(&mut self, total: usize) {
        self.stats.total_files = total;
    }

    pub(crate) fn apply(&mut self, path: PathBuf, outcome: FileOutcome) {
        self.stats.sensitive_items += outcome.item_count();
        match outcome {
            FileOutcome::Scanned(matches) => {
                self.stats.scanned_files += 1;
                if !matches.is_empty() {
                    self.results.insert(path.clone(), matches);
                }
                self.scanned.push(path);
            }
            FileOutcome::Skipped => {
                self.stats.skipped_files += 1;
                self.skipped.push(path);
            }
            FileOutcome::Errored(message) => {
                self.stats.error_files += 1;
                self.errors.push(FileError { path, message });
            }
        }
    }

    /// Enter the terminal state. Outcome lists arrive in completion order;
    /// they are sorted here so finished sessions compare equal regardless of
    /// scheduling.
    pub(crate) fn finish(&mut self, cancelled: bool) {
        self.state = if cancelled {
            ScanState::Cancelled
        } else {
            ScanState::Completed
        };
        self.stats.end_time = Some(Timestamp::now());
        self.scanned.sort();
        self.skipped.sort();
        self.errors.sort();
    }
}

// Non-UTF-8 paths serialize lossily instead of failing.

fn lossy_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn lossy_paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

fn lossy_keys<S: Serializer>(
    results: &BTreeMap<PathBuf, FileMatches>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(results.iter().map(|(p, m)| (p.to_string_lossy(), m)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_discovery::PatternMatch;

    fn matches(rule: &str, found: &[(&str, usize)]) -> FileMatches {
        let mut map = FileMatches::new();
        map.insert(
            rule.to_string(),
            found
                .iter()
                .map(|(text, line)| PatternMatch::new(*text, *line))
                .collect(),
        );
        map
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ScanSession::new("/tmp/x");
        assert_eq!(session.state(), ScanState::Idle);
        assert_eq!(session.root(), Path::new("/tmp/x"));
        assert!(session.stats().start_time.is_none());
        assert!(session.stats().duration().is_none());
    }

    #[test]
    fn test_apply_outcomes() {
        let mut session = ScanSession::new("/r");
        session.begin();
        session.set_total(4);

        session.apply(
            PathBuf::from("/r/a.txt"),
            FileOutcome::Scanned(matches("email", &[("a@b.com", 2), ("c@d.com", 5)])),
        );
        session.apply(PathBuf::from("/r/empty.txt"), FileOutcome::Scanned(FileMatches::new()));
        session.apply(PathBuf::from("/r/b.png"), FileOutcome::Skipped);
        session.apply(PathBuf::from("/r/bad.txt"), FileOutcome::Errored("denied".into()));

        let stats = session.stats();
        assert_eq!(stats.scanned_files, 2);
        assert_eq!(stats.skipped_files, 1);
        assert_eq!(stats.error_files, 1);
        assert_eq!(stats.sensitive_items, 2);
        assert_eq!(stats.unprocessed_files(), 0);

        assert_eq!(session.results().len(), 1);
        assert!(session.results().contains_key(Path::new("/r/a.txt")));
        assert_eq!(session.scanned().len(), 2);
        assert_eq!(session.skipped(), [PathBuf::from("/r/b.png")]);
        assert_eq!(session.errors()[0].message, "denied");
    }

    #[test]
    fn test_finish_sorts_and_sets_state() {
        let mut session = ScanSession::new("/r");
        session.begin();
        session.set_total(3);
        session.apply(PathBuf::from("/r/z"), FileOutcome::Skipped);
        session.apply(PathBuf::from("/r/a"), FileOutcome::Skipped);

        session.finish(true);
        assert_eq!(session.state(), ScanState::Cancelled);
        assert_eq!(
            session.skipped(),
            [PathBuf::from("/r/a"), PathBuf::from("/r/z")]
        );
        assert_eq!(session.stats().unprocessed_files(), 1);
        assert!(session.stats().duration().is_some());
    }

    #[test]
    fn test_records_and_summary() {
        let mut session = ScanSession::new("/r");
        let mut first = matches("email", &[("a@b.com", 1)]);
        first.extend(matches("url", &[("http://x", 3)]));
        session.apply(PathBuf::from("/r/1.txt"), FileOutcome::Scanned(first));
        session.apply(
            PathBuf::from("/r/2.txt"),
            FileOutcome::Scanned(matches("email", &[("e@f.com", 7)])),
        );

        let records = session.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].pattern_name, "email");
        assert_eq!(records[0].file_path, PathBuf::from("/r/1.txt"));

        let summary = session.pattern_summary();
        assert_eq!(summary["email"].len(), 2);
        assert_eq!(summary["email"][1].line_number, 7);
        assert_eq!(summary["url"][0].matched_text, "http://x");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_serialize_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = Path::new("/r").join(OsStr::from_bytes(b"bad\xff.txt"));
        let mut session = ScanSession::new("/r");
        session.begin();
        session.set_total(2);
        session.apply(bad.clone(), FileOutcome::Scanned(matches("email", &[("a@b.com", 1)])));
        session.apply(bad, FileOutcome::Errored("denied".into()));
        session.finish(false);

        let json = serde_json::to_string(&session).expect("serialize session with non-UTF-8 path");
        assert!(json.contains("bad\u{fffd}.txt"));

        let records = serde_json::to_string(&session.records()).expect("serialize records");
        assert!(records.contains("bad\u{fffd}.txt"));
    }

    #[test]
    fn test_state_terminal() {
        assert!(!ScanState::Idle.is_terminal());
        assert!(!ScanState::Scanning.is_terminal());
        assert!(ScanState::Completed.is_terminal());
        assert!(ScanState::Cancelled.is_terminal());
        assert_eq!(ScanState::Cancelled.to_string(), "cancelled");
    }
}
