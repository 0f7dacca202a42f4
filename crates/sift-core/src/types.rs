//! Shared types used across sift.
//!
//! This module defines common newtypes and enums that provide type safety
//! and clear domain modeling.

use crate::error::SiftError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Newtype for scan session identifiers.
///
/// A fresh UUID v4 is generated for every scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new random `SessionId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity attached to a pattern rule.
///
/// Informational only; it never changes how a rule is matched. Rule files
/// may use either the English labels or the Chinese single-character
/// labels (`高`, `中`, `低`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Credentials, keys, personal identifiers
    #[serde(alias = "高", alias = "High", alias = "HIGH")]
    High,
    /// Information that helps an attacker but is not a secret on its own
    #[serde(alias = "中", alias = "Medium", alias = "MEDIUM")]
    Medium,
    /// Mostly informational
    #[serde(alias = "低", alias = "Low", alias = "LOW")]
    Low,
}

impl RiskLevel {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RiskLevel {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "高" => Ok(Self::High),
            "medium" | "中" => Ok(Self::Medium),
            "low" | "低" => Ok(Self::Low),
            other => Err(SiftError::Validation(format!(
                "invalid risk level: expected high, medium or low, got '{other}'"
            ))),
        }
    }
}

/// How far a single rule match may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    /// Every line is searched on its own; matches never span a line break.
    #[default]
    Line,
    /// Each rule runs once over the whole file text, so block patterns
    /// (PEM keys) can match across lines. Matches report the line they start on.
    File,
}

impl fmt::Display for MatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => write!(f, "line"),
            Self::File => write!(f, "file"),
        }
    }
}

impl FromStr for MatchScope {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "file" => Ok(Self::File),
            other => Err(SiftError::Validation(format!(
                "invalid match scope: expected 'line' or 'file', got '{other}'"
            ))),
        }
    }
}

/// Timestamp wrapper for consistent time handling.
///
/// Always uses UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_generate() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_risk_level_labels() {
        assert_eq!("high".parse::<RiskLevel>().expect("parse high"), RiskLevel::High);
        assert_eq!("Medium".parse::<RiskLevel>().expect("parse medium"), RiskLevel::Medium);
        assert_eq!("低".parse::<RiskLevel>().expect("parse 低"), RiskLevel::Low);
        assert!("critical".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_risk_level_serde_aliases() {
        let level: RiskLevel = serde_json::from_str("\"高\"").expect("deserialize 高");
        assert_eq!(level, RiskLevel::High);

        let level: RiskLevel = serde_json::from_str("\"medium\"").expect("deserialize medium");
        assert_eq!(level, RiskLevel::Medium);

        let json = serde_json::to_string(&RiskLevel::Low).expect("serialize low");
        assert_eq!(json, "\"low\"");
    }

    #[test]
    fn test_match_scope_parse() {
        assert_eq!("line".parse::<MatchScope>().expect("parse line"), MatchScope::Line);
        assert_eq!(" FILE ".parse::<MatchScope>().expect("parse file"), MatchScope::File);
        assert!("block".parse::<MatchScope>().is_err());
        assert_eq!(MatchScope::default(), MatchScope::Line);
    }

    #[test]
    fn test_timestamp_ordering() {
        let earlier = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let later = Timestamp::now();
        assert!(earlier < later);
    }
}
