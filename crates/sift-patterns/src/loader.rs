//! Rule-definition file loading.
//!
//! The file is a JSON object mapping rule name to
//! `{regex, description, risk_level, enabled}`. Entries are validated one
//! at a time, so a single malformed rule never discards the rest of the file.

use crate::{
    builtin::builtin_rules,
    definition::{RuleDefinition, RuleDefinitions},
    error::{PatternError, Result},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A rule-definition file on disk.
#[derive(Debug, Clone)]
pub struct PatternFile {
    path: PathBuf,
}

impl PatternFile {
    /// Create a handle for the given file path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the rule file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load rule definitions from the file.
    ///
    /// Entries that are not valid rule objects are logged and skipped.
    ///
    /// # Errors
    /// Returns error if the file can't be read or is not a JSON object.
    pub fn load(&self) -> Result<RuleDefinitions> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| PatternError::LoadError {
            path: self.path.display().to_string(),
            source: e,
        })?;

        let definitions = self.parse(&contents)?;

        info!(
            count = definitions.len(),
            path = %self.path.display(),
            "loaded rule definitions"
        );

        Ok(definitions)
    }

    /// Load rule definitions, creating the file from the built-in rules on first use.
    ///
    /// If the file exists but can't be loaded, the built-in rules are
    /// returned and the file is left untouched.
    #[must_use]
    pub fn load_or_init(&self) -> RuleDefinitions {
        if !self.path.exists() {
            info!(path = %self.path.display(), "rule file not found, writing defaults");
            let defaults = builtin_rules();
            if let Err(e) = self.save(&defaults) {
                warn!(path = %self.path.display(), error = %e, "failed to write default rule file");
            }
            return defaults;
        }

        match self.load() {
            Ok(definitions) => definitions,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to load rule file, using built-in rules"
                );
                builtin_rules()
            }
        }
    }

    /// Write rule definitions as pretty-printed JSON.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, definitions: &RuleDefinitions) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents =
            serde_json::to_string_pretty(definitions).map_err(|e| PatternError::ParseError {
                path: self.path.display().to_string(),
                source: e,
            })?;
        std::fs::write(&self.path, contents)?;

        debug!(path = %self.path.display(), count = definitions.len(), "saved rule definitions");
        Ok(())
    }

    fn parse(&self, contents: &str) -> Result<RuleDefinitions> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(contents).map_err(|e| PatternError::ParseError {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let mut definitions = RuleDefinitions::new();
        for (name, value) in raw {
            match serde_json::from_value::<RuleDefinition>(value) {
                Ok(definition) => {
                    definitions.insert(name, definition);
                }
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        rule = %name,
                        error = %e,
                        "skipping malformed rule definition"
                    );
                }
            }
        }

        Ok(definitions)
    }
}
