//! Per-file pattern matching.

use crate::cancel::CancellationToken;
use serde::{Deserialize, Serialize};
use sift_core::MatchScope;
use sift_patterns::{CompiledPatternSet, CompiledRule};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

/// One occurrence of a rule in a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Matched text
    pub text: String,
    /// 1-based line number
    pub line: usize,
}

impl PatternMatch {
    /// Create a match record.
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// Matches of one file, keyed by rule name. Rules without matches are absent.
pub type FileMatches = BTreeMap<String, Vec<PatternMatch>>;

/// Applies the enabled rules of a pattern set to a file's text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileScanner {
    scope: MatchScope,
}

impl FileScanner {
    /// Create a scanner with the given match scope.
    #[must_use]
    pub fn new(scope: MatchScope) -> Self {
        Self { scope }
    }

    /// Match scope in use.
    #[must_use]
    pub fn scope(&self) -> MatchScope {
        self.scope
    }

    /// Scan `text` with every enabled rule.
    ///
    /// Within a rule, matches are in ascending line order. The token is
    /// checked before each rule; when it is set the remaining rules are
    /// skipped and whatever was found so far is returned.
    #[must_use]
    pub fn scan(
        &self,
        path: &Path,
        text: &str,
        patterns: &CompiledPatternSet,
        cancel: &CancellationToken,
    ) -> FileMatches {
        let mut results = FileMatches::new();
        let lines = match self.scope {
            MatchScope::Line => LineIndex::Lines(split_lines(text)),
            MatchScope::File => LineIndex::Starts(line_starts(text)),
        };

        for rule in patterns.enabled() {
            if cancel.is_cancelled() {
                debug!(path = %path.display(), "cancelled between rules");
                break;
            }

            let matches = match &lines {
                LineIndex::Lines(lines) => match_lines(rule, lines),
                LineIndex::Starts(starts) => match_whole(rule, text, starts),
            };

            if !matches.is_empty() {
                trace!(path = %path.display(), rule = %rule.name(), count = matches.len(), "rule matched");
                results.insert(rule.name().to_string(), matches);
            }
        }

        results
    }
}

enum LineIndex<'t> {
    Lines(Vec<&'t str>),
    Starts(Vec<usize>),
}

fn match_lines(rule: &CompiledRule, lines: &[&str]) -> Vec<PatternMatch> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(idx, line)| {
            rule.find_iter(line)
                .map(move |found| PatternMatch::new(found, idx + 1))
        })
        .collect()
}

fn match_whole(rule: &CompiledRule, text: &str, starts: &[usize]) -> Vec<PatternMatch> {
    rule.matcher()
        .find_iter(text)
        .map(|m| PatternMatch::new(m.as_str(), line_of(starts, m.start())))
        .collect()
}

/// Next line break at or after `from`, as (break start, next line start).
/// `\r\n`, a lone `\r` and `\n` all end a line.
fn next_break(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let at = from + bytes[from..].iter().position(|&b| b == b'\n' || b == b'\r')?;
    let next = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
        at + 2
    } else {
        at + 1
    };
    Some((at, next))
}

/// Lines without their terminators. A trailing terminator does not start
/// an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    while let Some((end, next)) = next_break(bytes, start) {
        lines.push(&text[start..end]);
        start = next;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Byte offsets at which each line begins.
fn line_starts(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut starts = vec![0];
    let mut from = 0;
    while let Some((_, next)) = next_break(bytes, from) {
        starts.push(next);
        from = next;
    }
    starts
}

/// 1-based line containing byte `offset`.
fn line_of(starts: &[usize], offset: usize) -> usize {
    starts.partition_point(|&start| start <= offset)
}
