#![forbid(unsafe_code)]

//! Named, ordered collections of rules sharing a purpose

use crate::error::ConfigError;
use crate::rules::{MatchMode, PatternRule};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// What a rule set's needles are compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSetKind {
    /// Bare function calls: `print_r(`
    PlainCalls,
    /// Receiver/method calls: `console.log(`, `$x->dpm(`
    MethodCalls,
    /// Literal fragments anywhere in the raw file text
    Text,
}

impl RuleSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::PlainCalls => "plain-calls",
            RuleSetKind::MethodCalls => "method-calls",
            RuleSetKind::Text => "text",
        }
    }

    /// Kind implied by one of the conventional rule-set names
    pub fn from_set_name(name: &str) -> Option<Self> {
        match name {
            "forbidden-plain-calls" => Some(RuleSetKind::PlainCalls),
            "forbidden-method-calls" => Some(RuleSetKind::MethodCalls),
            "blacklisted-text" => Some(RuleSetKind::Text),
            _ => None,
        }
    }
}

/// The rule and the text it matched within a call candidate
#[derive(Debug, Clone, Copy)]
pub struct CallMatch<'r, 'c> {
    pub rule: &'r PatternRule,
    pub matched: &'c str,
}

/// A named, ordered rule collection
///
/// Rule ids are unique within a set. Exact rules are indexed by their
/// lowercased needle and always evaluated before regex rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    kind: RuleSetKind,
    extensions: Vec<String>,
    rules: Vec<PatternRule>,
    exact_index: HashMap<String, usize>,
}

impl RuleSet {
    /// Build a rule set
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateRuleId` when two rules share an id and
    /// `ConfigError::Validation` when a text set contains a regex rule.
    pub fn new(
        name: impl Into<String>,
        kind: RuleSetKind,
        extensions: Vec<String>,
        rules: Vec<PatternRule>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut exact_index = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            if !seen.insert(rule.id().clone()) {
                return Err(ConfigError::DuplicateRuleId {
                    rule_set: name,
                    rule_id: rule.id().to_string(),
                });
            }

            match rule.mode() {
                MatchMode::Exact => {
                    exact_index
                        .entry(rule.folded_needle().to_string())
                        .or_insert(index);
                }
                MatchMode::Regex if kind == RuleSetKind::Text => {
                    return Err(ConfigError::Validation(format!(
                        "Rule set '{}' holds literal text fragments; rule '{}' cannot use regex mode",
                        name,
                        rule.id()
                    )));
                }
                MatchMode::Regex => {}
            }
        }

        let extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        Ok(Self {
            name,
            kind,
            extensions,
            rules,
            exact_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleSetKind {
        self.kind
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether this set is active for a file, judged by extension
    ///
    /// An empty extension list applies to every file.
    pub fn applies_to(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Exact rule whose needle equals the lowercased candidate
    pub fn match_exact<'c>(&self, candidate: &'c str) -> Option<CallMatch<'_, 'c>> {
        let &index = self.exact_index.get(candidate)?;
        Some(CallMatch {
            rule: &self.rules[index],
            matched: candidate,
        })
    }

    /// First regex rule, in declaration order, that finds the candidate
    pub fn match_regex<'c>(&self, candidate: &'c str) -> Option<CallMatch<'_, 'c>> {
        self.rules
            .iter()
            .filter(|rule| rule.mode() == MatchMode::Regex)
            .find_map(|rule| rule.find(candidate).map(|matched| CallMatch { rule, matched }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleId, Severity};

    fn rule(id: &str, mode: MatchMode, needle: &str) -> PatternRule {
        PatternRule::new(RuleId::new(id).unwrap(), mode, needle, Severity::Error, None).unwrap()
    }

    #[test]
    fn test_duplicate_rule_id_is_config_error() {
        let result = RuleSet::new(
            "forbidden-plain-calls",
            RuleSetKind::PlainCalls,
            vec![],
            vec![
                rule("dpm", MatchMode::Exact, "dpm"),
                rule("dpm", MatchMode::Exact, "dsm"),
            ],
        );
        assert!(matches!(result, Err(ConfigError::DuplicateRuleId { .. })));
    }

    #[test]
    fn test_text_set_rejects_regex() {
        let result = RuleSet::new(
            "blacklisted-text",
            RuleSetKind::Text,
            vec![],
            vec![rule("markers", MatchMode::Regex, "<{7}")],
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_exact_and_regex_lookups() {
        let set = RuleSet::new(
            "calls",
            RuleSetKind::MethodCalls,
            vec![],
            vec![
                rule("any-console", MatchMode::Regex, r"console\.\w+"),
                rule("console-log", MatchMode::Exact, "console.log"),
            ],
        )
        .unwrap();

        let m = set.match_exact("console.log").unwrap();
        assert_eq!(m.rule.id().as_str(), "console-log");
        assert!(set.match_exact("console.warn").is_none());

        let m = set.match_regex("console.warn").unwrap();
        assert_eq!(m.rule.id().as_str(), "any-console");
        assert_eq!(m.matched, "console.warn");
    }

    #[test]
    fn test_first_regex_wins() {
        let set = RuleSet::new(
            "calls",
            RuleSetKind::MethodCalls,
            vec![],
            vec![
                rule("first", MatchMode::Regex, r"\.log"),
                rule("second", MatchMode::Regex, r"console"),
            ],
        )
        .unwrap();
        let m = set.match_regex("console.log").unwrap();
        assert_eq!(m.rule.id().as_str(), "first");
        assert_eq!(m.matched, ".log");
    }

    #[test]
    fn test_applies_to_extensions() {
        let set = RuleSet::new("js", RuleSetKind::PlainCalls, vec![".js".into()], vec![]).unwrap();
        assert!(set.applies_to(Path::new("web/themes/custom/app.js")));
        assert!(!set.applies_to(Path::new("web/modules/custom/foo.module")));
        assert!(!set.applies_to(Path::new("Makefile")));

        let all = RuleSet::new("all", RuleSetKind::Text, vec![], vec![]).unwrap();
        assert!(all.applies_to(Path::new("Makefile")));
    }

    #[test]
    fn test_kind_from_set_name() {
        assert_eq!(
            RuleSetKind::from_set_name("forbidden-method-calls"),
            Some(RuleSetKind::MethodCalls)
        );
        assert_eq!(RuleSetKind::from_set_name("blacklisted-text"), Some(RuleSetKind::Text));
        assert_eq!(RuleSetKind::from_set_name("js-debug"), None);
    }
}
