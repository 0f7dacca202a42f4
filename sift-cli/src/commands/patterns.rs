//! Rule-set resolution and the `patterns` subcommands.

use anyhow::{bail, Context};
use sift_core::AppConfig;
use sift_patterns::{builtin_rules, CompiledPatternSet, PatternFile, RuleDefinitions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// Pick the rule definitions for a run.
///
/// An explicit file must load. A file named in the config is created from
/// the built-in rules on first use. Without either, the built-in rules are
/// used directly.
pub fn resolve_definitions(
    explicit: Option<&Path>,
    config: &AppConfig,
) -> anyhow::Result<RuleDefinitions> {
    if let Some(path) = explicit {
        return PatternFile::new(path)
            .load()
            .with_context(|| format!("failed to load rule file {}", path.display()));
    }

    if let Some(path) = &config.patterns.file {
        return Ok(PatternFile::new(path).load_or_init());
    }

    Ok(builtin_rules())
}

/// `sift patterns list`
pub fn list(explicit: Option<&Path>, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let set = CompiledPatternSet::load(resolve_definitions(explicit, config)?);

    let width = set.iter().map(|r| r.name().len()).max().unwrap_or(0);
    for rule in set.iter() {
        let rule = rule.rule();
        println!(
            "{:<width$}  {:<6}  {:<8}  {}",
            rule.name(),
            rule.risk_level().to_string(),
            if rule.is_enabled() { "enabled" } else { "disabled" },
            rule.description(),
        );
    }
    for rejected in set.rejected() {
        println!("rejected: {rejected}");
    }
    println!(
        "\n{} rules, {} enabled, {} rejected",
        set.len(),
        set.enabled_count(),
        set.rejected().len()
    );

    Ok(ExitCode::SUCCESS)
}

/// Where `sift patterns init` writes when no path is given: the configured
/// rule file if there is one, otherwise `patterns.json` in the config dir.
pub fn init_target(explicit: Option<&Path>, config: &AppConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit.or(config.patterns.file.as_deref()) {
        return Ok(path.to_path_buf());
    }
    AppConfig::default_patterns_path().context("failed to locate the config directory")
}

/// `sift patterns init`
pub fn init(path: &Path, force: bool) -> anyhow::Result<ExitCode> {
    if path.exists() && !force {
        bail!("{} already exists, pass --force to overwrite", path.display());
    }

    let definitions = builtin_rules();
    PatternFile::new(path)
        .save(&definitions)
        .with_context(|| format!("failed to write rule file {}", path.display()))?;

    info!(path = %path.display(), count = definitions.len(), "wrote built-in rules");
    println!("Wrote {} rules to {}", definitions.len(), path.display());
    Ok(ExitCode::SUCCESS)
}
