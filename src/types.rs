#![forbid(unsafe_code)]

//! Core domain types for commitgate

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity levels
///
/// Only `Error` findings fail a check; warnings are reported and otherwise
/// ignored by the verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain no whitespace. Needles such as
/// `console.log` or `<<<<<<<` double as identifiers, so punctuation is
/// allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty or contains whitespace
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() || id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return None;
        }
        Some(RuleId(id))
    }

    /// Identifier derived from a needle that carries no explicit id
    ///
    /// Whitespace runs become a single `-`, so `<<<<<<< HEAD` yields
    /// `<<<<<<<-HEAD`.
    pub fn from_needle(needle: &str) -> Option<Self> {
        let id = needle.split_whitespace().collect::<Vec<_>>().join("-");
        Self::new(id)
    }

    /// Identifier for records the gate itself produces (`syntax`, `fix`, ...)
    pub(crate) fn builtin(id: &'static str) -> Self {
        RuleId(id.to_string())
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value).ok_or_else(|| "Invalid rule ID".to_string())
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}

/// Normalizes a repository-relative path for prefix comparisons:
/// backslashes become forward slashes and a leading `./` is dropped.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    normalized
}
