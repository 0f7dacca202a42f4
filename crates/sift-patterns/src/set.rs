//! Compiled pattern sets.
//!
//! A [`CompiledPatternSet`] is built once per scan and then shared read-only
//! between all scan workers.

use crate::definition::{PatternRule, RuleDefinition};
use crate::error::PatternError;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A validated rule together with its compiled matcher.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule: PatternRule,
    matcher: Regex,
}

impl CompiledRule {
    /// Compile a validated rule.
    ///
    /// `.` matches line breaks so that block patterns such as PEM keys can
    /// match when given multi-line text.
    ///
    /// # Errors
    /// Returns [`PatternError::RuleCompile`] if the regex is invalid.
    pub fn compile(rule: PatternRule) -> Result<Self, PatternError> {
        let matcher = RegexBuilder::new(rule.regex())
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| PatternError::RuleCompile {
                name: rule.name().to_string(),
                source,
            })?;

        Ok(Self { rule, matcher })
    }

    /// The rule this matcher was compiled from.
    #[must_use]
    pub fn rule(&self) -> &PatternRule {
        &self.rule
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.rule.name()
    }

    /// Compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Check whether the text contains at least one match.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// All non-overlapping matches in `text`, left to right.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.matcher.find_iter(text).map(|m| m.as_str())
    }
}

/// Rules compiled for one scan, in load order.
///
/// Rules that fail validation or compilation are dropped one by one and
/// kept in [`CompiledPatternSet::rejected`] so callers can surface them.
#[derive(Debug, Default)]
pub struct CompiledPatternSet {
    rules: Vec<CompiledRule>,
    rejected: Vec<PatternError>,
}

impl CompiledPatternSet {
    /// Build a compiled set from already-parsed rule definitions.
    ///
    /// Never fails as a whole: a bad rule is logged, recorded as rejected
    /// and left out. A repeated name keeps the first definition.
    pub fn load<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (String, RuleDefinition)>,
    {
        let mut set = Self::default();
        let mut seen = HashSet::new();

        for (name, definition) in definitions {
            if !seen.insert(name.clone()) {
                set.reject(PatternError::InvalidRule {
                    name,
                    reason: "duplicate rule name".to_string(),
                });
                continue;
            }

            match PatternRule::from_definition(name, definition).and_then(CompiledRule::compile) {
                Ok(compiled) => {
                    debug!(rule = %compiled.name(), enabled = compiled.rule().is_enabled(), "compiled rule");
                    set.rules.push(compiled);
                }
                Err(e) => set.reject(e),
            }
        }

        info!(
            compiled = set.rules.len(),
            enabled = set.enabled_count(),
            rejected = set.rejected.len(),
            "loaded pattern rules"
        );

        set
    }

    fn reject(&mut self, error: PatternError) {
        warn!(error = %error, "skipping pattern rule");
        self.rejected.push(error);
    }

    /// Number of compiled rules, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a compiled rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// All compiled rules, including disabled ones.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    /// Rules that take part in a scan.
    pub fn enabled(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter().filter(|r| r.rule().is_enabled())
    }

    /// Number of enabled rules.
    #[must_use]
    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }

    /// Rules dropped during load, with the reason.
    #[must_use]
    pub fn rejected(&self) -> &[PatternError] {
        &self.rejected
    }
}
