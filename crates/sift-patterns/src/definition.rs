//! Rule definition types.
//!
//! A [`RuleDefinition`] is the shape a rule has in a rule-definition file.
//! A [`PatternRule`] is the validated, immutable form the rest of sift uses.

use crate::error::{PatternError, Result};
use serde::{Deserialize, Serialize};
use sift_core::RiskLevel;
use std::collections::BTreeMap;

/// Rule definitions keyed by unique rule name.
pub type RuleDefinitions = BTreeMap<String, RuleDefinition>;

/// A single rule as stored in a rule-definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Regex source
    pub regex: String,

    /// Human-readable description of what the rule detects
    #[serde(default)]
    pub description: String,

    /// Severity label
    pub risk_level: RiskLevel,

    /// Disabled rules take no part in a scan
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RuleDefinition {
    /// Create an enabled rule definition.
    pub fn new(regex: impl Into<String>, description: impl Into<String>, risk_level: RiskLevel) -> Self {
        Self {
            regex: regex.into(),
            description: description.into(),
            risk_level,
            enabled: true,
        }
    }

    /// Set the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Validated pattern rule. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    name: String,
    regex: String,
    description: String,
    risk_level: RiskLevel,
    enabled: bool,
}

impl PatternRule {
    /// Validate a named definition into a rule.
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidRule`] if the name or regex is blank.
    pub fn from_definition(name: impl Into<String>, definition: RuleDefinition) -> Result<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(PatternError::InvalidRule {
                name,
                reason: "rule name cannot be empty".to_string(),
            });
        }

        if definition.regex.trim().is_empty() {
            return Err(PatternError::InvalidRule {
                name,
                reason: "regex cannot be empty".to_string(),
            });
        }

        Ok(Self {
            name,
            regex: definition.regex,
            description: definition.description,
            risk_level: definition.risk_level,
            enabled: definition.enabled,
        })
    }

    /// Unique rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regex source.
    #[must_use]
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Risk level.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    /// Whether the rule takes part in scans.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Convert back into the file representation.
    #[must_use]
    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition {
            regex: self.regex.clone(),
            description: self.description.clone(),
            risk_level: self.risk_level,
            enabled: self.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_defaults_enabled() {
        let json = r#"{"regex": "\\d+", "risk_level": "low"}"#;
        let def: RuleDefinition = serde_json::from_str(json).expect("parse definition");
        assert!(def.enabled);
        assert!(def.description.is_empty());
        assert_eq!(def.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_definition_accepts_chinese_labels() {
        let json = r#"{"regex": "x", "description": "d", "risk_level": "高", "enabled": false}"#;
        let def: RuleDefinition = serde_json::from_str(json).expect("parse definition");
        assert_eq!(def.risk_level, RiskLevel::High);
        assert!(!def.enabled);
    }

    #[test]
    fn test_definition_rejects_unknown_risk_level() {
        let json = r#"{"regex": "x", "risk_level": "critical"}"#;
        assert!(serde_json::from_str::<RuleDefinition>(json).is_err());
    }

    #[test]
    fn test_rule_from_definition() {
        let def = RuleDefinition::new(r"\bfoo\b", "foo finder", RiskLevel::Medium);
        let rule = PatternRule::from_definition("foo", def.clone()).expect("valid rule");

        assert_eq!(rule.name(), "foo");
        assert_eq!(rule.regex(), r"\bfoo\b");
        assert_eq!(rule.description(), "foo finder");
        assert_eq!(rule.risk_level(), RiskLevel::Medium);
        assert!(rule.is_enabled());
        assert_eq!(rule.to_definition(), def);
    }

    #[test]
    fn test_rule_rejects_blank_fields() {
        let def = RuleDefinition::new("  ", "", RiskLevel::Low);
        let err = PatternRule::from_definition("blank", def).expect_err("blank regex");
        assert!(matches!(err, PatternError::InvalidRule { .. }));
        assert_eq!(err.rule_name(), Some("blank"));

        let def = RuleDefinition::new("x", "", RiskLevel::Low);
        assert!(PatternRule::from_definition("", def).is_err());
    }
}
