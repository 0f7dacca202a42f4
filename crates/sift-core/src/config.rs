//! Configuration management for sift.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::MatchScope;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default number of scan workers.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Default maximum file size to scan (100MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Main application configuration.
///
/// This is loaded from `~/.config/sift/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
    /// Directory traversal settings
    pub walk: WalkConfig,
    /// Rule-definition file settings
    pub patterns: PatternsConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SIFT_POOL_SIZE`: Override the number of scan workers
    /// - `SIFT_PATTERNS_FILE`: Override the rule-definition file path
    /// - `SIFT_MATCH_SCOPE`: Override the match scope (`line` or `file`)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SIFT_POOL_SIZE") {
            if let Ok(pool_size) = val.parse() {
                self.scanning.pool_size = pool_size;
                tracing::debug!("Override scanning.pool_size from env: {}", pool_size);
            }
        }

        if let Some(val) = lookup("SIFT_PATTERNS_FILE") {
            if !val.is_empty() {
                tracing::debug!("Override patterns.file from env: {}", val);
                self.patterns.file = Some(PathBuf::from(val));
            }
        }

        if let Some(val) = lookup("SIFT_MATCH_SCOPE") {
            if let Ok(scope) = val.parse() {
                self.scanning.match_scope = scope;
                tracing::debug!("Override scanning.match_scope from env: {}", scope);
            }
        }
    }

    /// Check that configured values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.pool_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.scanning.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.max_file_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/sift/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sift", "sift").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Default location of the rule-definition file, next to `config.toml`.
    pub fn default_patterns_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sift", "sift").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("patterns.json"))
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of files scanned concurrently
    pub pool_size: usize,
    /// Files larger than this many bytes are skipped without being read
    pub max_file_size: u64,
    /// Whether rules are matched per line or over the whole file
    pub match_scope: MatchScope,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            match_scope: MatchScope::Line,
        }
    }
}

/// Directory traversal settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Maximum directory depth below the scan root (unlimited when unset)
    pub max_depth: Option<usize>,
    /// Directory names excluded in addition to the built-in deny-list
    pub extra_excluded_dirs: Vec<String>,
}

/// Rule-definition file settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Path to a JSON rule-definition file; built-in rules are used when unset
    pub file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scanning.pool_size, 8);
        assert_eq!(config.scanning.max_file_size, 100 * 1024 * 1024);
        assert_eq!(config.scanning.match_scope, MatchScope::Line);
        assert!(config.walk.max_depth.is_none());
        assert!(config.patterns.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scanning]"));
        assert!(toml_str.contains("[walk]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.scanning.pool_size = 2;
        config.walk.extra_excluded_dirs = vec!["vendor".to_string()];

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: AppConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert_eq!(loaded.scanning.pool_size, 2);
        assert_eq!(loaded.walk.extra_excluded_dirs, vec!["vendor".to_string()]);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SIFT_POOL_SIZE", "16"),
            ("SIFT_PATTERNS_FILE", "/tmp/rules.json"),
            ("SIFT_MATCH_SCOPE", "file"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.scanning.pool_size, 16);
        assert_eq!(config.patterns.file, Some(PathBuf::from("/tmp/rules.json")));
        assert_eq!(config.scanning.match_scope, MatchScope::File);
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| match key {
            "SIFT_POOL_SIZE" => Some("many".to_string()),
            "SIFT_MATCH_SCOPE" => Some("paragraph".to_string()),
            _ => None,
        });

        assert_eq!(config.scanning.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.scanning.match_scope, MatchScope::Line);
    }

    #[test]
    fn test_zero_pool_size_is_invalid() {
        let toml_str = r"
[scanning]
pool_size = 0
";
        let config: AppConfig = toml::from_str(toml_str).expect("parse config");
        let err = config.validate().expect_err("zero workers must be rejected");
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "scanning.pool_size"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scanning]
match_scope = "file"

[walk]
max_depth = 4
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scanning.match_scope, MatchScope::File);
        assert_eq!(config.walk.max_depth, Some(4));
        // These should be defaults
        assert_eq!(config.scanning.pool_size, 8);
        assert!(config.walk.extra_excluded_dirs.is_empty());
    }
}
