#![forbid(unsafe_code)]

//! Literal text fragment detection on raw file contents
//!
//! Works on any text file, source or not. Each text rule set is compiled once
//! into a single alternation of escaped fragments.

use crate::error::ConfigError;
use crate::rules::{PatternRule, RuleRegistry, RuleSet, RuleSetKind};
use crate::scan::{Finding, LineIndex};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// Message used when a rule carries no template of its own
pub const DEFAULT_TEXT_MESSAGE: &str = "{matched} found in file: {file}";

/// One compiled text rule set
#[derive(Debug, Clone)]
struct TextMatcher {
    set: RuleSet,
    pattern: Regex,
    /// Trimmed fragment to index into `set.rules()`
    by_fragment: HashMap<String, usize>,
}

/// Scanner for blacklisted literal fragments such as merge-conflict markers
#[derive(Debug, Clone, Default)]
pub struct BlacklistedTextScanner {
    matchers: Vec<TextMatcher>,
}

impl BlacklistedTextScanner {
    /// Compile the given text rule sets; call sets are ignored
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the combined pattern for a set
    /// cannot be compiled.
    pub fn new(sets: impl IntoIterator<Item = RuleSet>) -> Result<Self, ConfigError> {
        let mut matchers = Vec::new();

        for set in sets {
            if set.kind() != RuleSetKind::Text || set.is_empty() {
                continue;
            }

            let alternation = set
                .rules()
                .iter()
                .map(|rule| format!("(?:{})", fragment_pattern(rule.needle())))
                .collect::<Vec<_>>()
                .join("|");

            let pattern = Regex::new(&alternation).map_err(|e| ConfigError::InvalidPattern {
                rule_set: set.name().to_string(),
                needle: alternation.clone(),
                message: e.to_string(),
            })?;

            let mut by_fragment = HashMap::new();
            for (index, rule) in set.rules().iter().enumerate() {
                by_fragment
                    .entry(rule.needle().trim().to_string())
                    .or_insert(index);
            }

            matchers.push(TextMatcher {
                set,
                pattern,
                by_fragment,
            });
        }

        Ok(Self { matchers })
    }

    /// Compile every text rule set in the registry
    pub fn from_registry(registry: &RuleRegistry) -> Result<Self, ConfigError> {
        Self::new(registry.iter().cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Whether any text rule set applies to `path`
    pub fn applies_to(&self, path: &Path) -> bool {
        self.matchers.iter().any(|m| m.set.applies_to(path))
    }

    /// Scan raw contents
    ///
    /// Each distinct fragment produces one finding, located at its first
    /// occurrence; findings are ordered by first occurrence.
    pub fn scan(&self, path: &Path, content: &str) -> Vec<Finding> {
        let lines = LineIndex::new(content);
        let mut findings = Vec::new();

        for matcher in self.matchers.iter().filter(|m| m.set.applies_to(path)) {
            let mut seen: Vec<&str> = Vec::new();

            for found in matcher.pattern.find_iter(content) {
                let fragment = found.as_str().trim();
                if fragment.is_empty() || seen.contains(&fragment) {
                    continue;
                }
                seen.push(fragment);

                let Some(rule) = matcher.rule_for(fragment) else {
                    continue;
                };
                let display = display_fragment(fragment);
                findings.push(Finding {
                    rule_id: rule.id().clone(),
                    severity: rule.severity(),
                    file: path.to_path_buf(),
                    location: Some(lines.locate(found.start())),
                    matched_text: fragment.to_string(),
                    message: rule.render_message(DEFAULT_TEXT_MESSAGE, &display, path),
                });
            }
        }

        findings
    }
}

impl TextMatcher {
    fn rule_for(&self, fragment: &str) -> Option<&PatternRule> {
        self.by_fragment
            .get(fragment)
            .and_then(|&index| self.set.rules().get(index))
    }
}

/// Escape a fragment and add `\b` on each edge that is a word character.
///
/// A fragment made of punctuation, such as `<<<<<<<`, gets no boundary on
/// that edge, so it still matches at the start or end of a line.
fn fragment_pattern(fragment: &str) -> String {
    let mut pattern = String::new();
    if fragment.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(fragment));
    if fragment.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Presentation only: `var_dump(` is shown as `var_dump()`.
fn display_fragment(fragment: &str) -> String {
    if fragment.ends_with('(') {
        format!("{})", fragment)
    } else {
        fragment.to_string()
    }
}
