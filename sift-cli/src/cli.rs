use clap::{Args, Parser, Subcommand};
use sift_core::MatchScope;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sift",
    version,
    about = "Find secrets and personal data in source trees",
    long_about = "sift walks a directory, skips binaries and build output, and matches every text file against a set of regex rules for keys, tokens, credentials and personal data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory for sensitive data
    Scan(ScanArgs),

    /// Inspect or create rule-definition files
    #[command(subcommand)]
    Patterns(PatternsCommand),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan
    pub dir: PathBuf,

    /// Number of files scanned concurrently
    #[arg(short, long, value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// JSON rule-definition file (defaults to the configured file or the built-in rules)
    #[arg(short, long)]
    pub patterns: Option<PathBuf>,

    /// Match each rule per line or across the whole file
    #[arg(long, value_name = "line|file")]
    pub scope: Option<MatchScope>,

    /// Print the final session as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum PatternsCommand {
    /// List the rules a scan would use
    List {
        /// JSON rule-definition file
        #[arg(short, long)]
        patterns: Option<PathBuf>,
    },

    /// Write the built-in rules to a JSON file
    Init {
        /// Destination file; defaults to the configured rule file, or
        /// `patterns.json` next to `config.toml`
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_workers(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
