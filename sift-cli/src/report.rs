//! Output rendering for finished scans.

use sift_patterns::CompiledPatternSet;
use sift_scanner::{ScanSession, ScanState};
use std::fmt;
use std::path::Path;

/// Pretty-printed JSON of the whole session.
pub fn render_json(session: &ScanSession) -> serde_json::Result<String> {
    serde_json::to_string_pretty(session)
}

/// Human-readable summary grouped by rule.
#[must_use]
pub fn render_summary(session: &ScanSession, patterns: &CompiledPatternSet) -> String {
    Summary { session, patterns }.to_string()
}

struct Summary<'a> {
    session: &'a ScanSession,
    patterns: &'a CompiledPatternSet,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.session;
        let stats = session.stats();
        let root = session.root();

        let outcome = match session.state() {
            ScanState::Cancelled => "cancelled",
            _ => "completed",
        };
        write!(f, "Scan of {} {outcome}", root.display())?;
        if let Some(duration) = stats.duration() {
            write!(f, " in {:.2}s", duration_secs(duration))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "  files: {} total, {} scanned, {} skipped, {} errors",
            stats.total_files, stats.scanned_files, stats.skipped_files, stats.error_files
        )?;
        if stats.unprocessed_files() > 0 {
            writeln!(f, "  not reached: {}", stats.unprocessed_files())?;
        }
        writeln!(f, "  sensitive items: {}", stats.sensitive_items)?;

        for (rule, records) in session.pattern_summary() {
            writeln!(f)?;
            match self.patterns.get(&rule) {
                Some(compiled) => writeln!(
                    f,
                    "[{}] {rule} - {} ({} matches)",
                    compiled.rule().risk_level(),
                    compiled.rule().description(),
                    records.len()
                )?,
                None => writeln!(f, "{rule} ({} matches)", records.len())?,
            }
            for record in records {
                writeln!(
                    f,
                    "  {}:{}  {}",
                    relative(root, &record.file_path),
                    record.line_number,
                    record.matched_text.replace('\n', "\\n")
                )?;
            }
        }

        if !session.errors().is_empty() {
            writeln!(f, "\nErrors:")?;
            for error in session.errors() {
                writeln!(f, "  {}: {}", relative(root, &error.path), error.message)?;
            }
        }

        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn duration_secs(duration: chrono::Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
