#![forbid(unsafe_code)]

//! A single forbidden-construct rule matched either literally or by regex

use crate::error::RuleError;
use crate::types::{RuleId, Severity};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a rule's needle is compared against a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Whole-candidate, case-insensitive equality
    #[default]
    Exact,
    /// Case-insensitive regex search; the matched substring is reported
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Regex => "regex",
        }
    }
}

/// A rule that forbids a call or a text fragment
///
/// Rules are immutable once built and shared read-only across files.
#[derive(Clone)]
pub struct PatternRule {
    id: RuleId,
    mode: MatchMode,
    needle: String,
    folded: String,
    severity: Severity,
    message: Option<String>,
    regex: Option<Regex>,
}

impl std::fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRule")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("needle", &self.needle)
            .field("severity", &self.severity)
            .field("message", &self.message)
            .finish()
    }
}

impl PatternRule {
    /// Build a rule, compiling the needle when `mode` is `Regex`
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` for an empty needle and
    /// `RuleError::InvalidRegex` if a regex needle does not compile.
    pub fn new(
        id: RuleId,
        mode: MatchMode,
        needle: impl Into<String>,
        severity: Severity,
        message: Option<String>,
    ) -> Result<Self, RuleError> {
        let needle = needle.into();
        if needle.is_empty() {
            return Err(RuleError::InvalidDefinition(format!(
                "Rule '{}' has an empty needle",
                id
            )));
        }

        let regex = match mode {
            MatchMode::Exact => None,
            MatchMode::Regex => Some(
                RegexBuilder::new(&needle)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        RuleError::InvalidRegex(format!(
                            "Failed to compile pattern '{}': {}",
                            needle, e
                        ))
                    })?,
            ),
        };

        Ok(Self {
            id,
            mode,
            folded: needle.to_lowercase(),
            needle,
            severity,
            message,
            regex,
        })
    }

    /// Exact rule whose id is the needle itself
    pub fn exact(needle: &str) -> Result<Self, RuleError> {
        let id = RuleId::from_needle(needle)
            .ok_or_else(|| RuleError::InvalidDefinition(format!("Invalid rule ID: {}", needle)))?;
        Self::new(id, MatchMode::Exact, needle, Severity::Error, None)
    }

    /// Regex rule whose id is the needle itself
    pub fn regex(needle: &str) -> Result<Self, RuleError> {
        let id = RuleId::from_needle(needle)
            .ok_or_else(|| RuleError::InvalidDefinition(format!("Invalid rule ID: {}", needle)))?;
        Self::new(id, MatchMode::Regex, needle, Severity::Error, None)
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Lowercased needle, the key for exact lookups
    pub fn folded_needle(&self) -> &str {
        &self.folded
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Match a lowercased candidate, returning the matched text
    ///
    /// Exact rules return the whole candidate on equality. Regex rules return
    /// the first matched substring.
    pub fn find<'c>(&self, candidate: &'c str) -> Option<&'c str> {
        match (&self.mode, &self.regex) {
            (MatchMode::Regex, Some(regex)) => regex.find(candidate).map(|m| m.as_str()),
            _ => (candidate == self.folded).then_some(candidate),
        }
    }

    /// Render this rule's message for a finding
    ///
    /// Placeholders: `{matched}`, `{rule}`, `{file}`. Falls back to
    /// `default_template` when the rule has no template of its own.
    pub fn render_message(&self, default_template: &str, matched: &str, file: &Path) -> String {
        self.message
            .as_deref()
            .unwrap_or(default_template)
            .replace("{matched}", matched)
            .replace("{rule}", self.id.as_str())
            .replace("{file}", &file.display().to_string())
    }
}
