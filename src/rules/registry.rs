#![forbid(unsafe_code)]

//! Rule registry for managing rule sets
//!
//! The RuleRegistry is responsible for:
//! - Building rule sets from the `[rules]` section of commitgate.toml
//! - Rejecting duplicate ids and malformed patterns before any file is read

use crate::config::{RuleEntry, RuleSetConfig};
use crate::error::{ConfigError, RuleError};
use crate::rules::{PatternRule, RuleSet, RuleSetKind};
use crate::types::RuleId;
use indexmap::IndexMap;
use tracing::debug;

/// Read-only mapping from rule-set name to rule set
///
/// Insertion order is preserved so findings are reported in the order the
/// sets appear in the configuration file.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    sets: IndexMap<String, RuleSet>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from `[rules.<name>]` tables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - A set has no resolvable kind
    /// - A rule id is invalid or duplicated within its set
    /// - A regex needle does not compile
    pub fn build_from_config(
        rules: &IndexMap<String, RuleSetConfig>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new();

        for (name, set_config) in rules {
            let kind = set_config.resolve_kind(name)?;
            let patterns = set_config
                .rules
                .iter()
                .map(|entry| build_rule(name, set_config, entry))
                .collect::<Result<Vec<_>, _>>()?;

            let set = RuleSet::new(name.clone(), kind, set_config.extensions.clone(), patterns)?;
            debug!(
                rule_set = name.as_str(),
                kind = kind.as_str(),
                rules = set.len(),
                "loaded rule set"
            );
            registry.insert(set)?;
        }

        Ok(registry)
    }

    /// Add a rule set
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a set with the same name exists.
    pub fn insert(&mut self, set: RuleSet) -> Result<(), ConfigError> {
        if self.sets.contains_key(set.name()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate rule set '{}'",
                set.name()
            )));
        }
        self.sets.insert(set.name().to_string(), set);
        Ok(())
    }

    /// Get a rule set by name
    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.sets.get(name)
    }

    /// Iterate over all rule sets in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &RuleSet> {
        self.sets.values()
    }

    /// Number of rule sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total number of rules across all sets
    pub fn rule_count(&self) -> usize {
        self.sets.values().map(RuleSet::len).sum()
    }
}

/// Turn one config entry into a rule, applying the set's defaults
fn build_rule(
    set_name: &str,
    set_config: &RuleSetConfig,
    entry: &RuleEntry,
) -> Result<PatternRule, ConfigError> {
    let (needle, id, mode, severity, message) = match entry {
        RuleEntry::Needle(needle) => (
            needle.as_str(),
            None,
            set_config.mode,
            set_config.severity,
            set_config.message.clone(),
        ),
        RuleEntry::Detailed(def) => (
            def.needle.as_str(),
            def.id.as_deref(),
            def.mode.unwrap_or(set_config.mode),
            def.severity.unwrap_or(set_config.severity),
            def.message.clone().or_else(|| set_config.message.clone()),
        ),
    };

    let rule_id = match id {
        Some(id) => RuleId::new(id),
        None => RuleId::from_needle(needle),
    }
    .ok_or_else(|| {
        ConfigError::Validation(format!(
            "Invalid rule ID '{}' in rule set '{}'",
            id.unwrap_or(needle),
            set_name
        ))
    })?;

    PatternRule::new(rule_id, mode, needle, severity, message).map_err(|e| {
        let message = match e {
            RuleError::InvalidRegex(msg) | RuleError::InvalidDefinition(msg) => msg,
        };
        ConfigError::InvalidPattern {
            rule_set: set_name.to_string(),
            needle: needle.to_string(),
            message,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rules::MatchMode;
    use crate::types::Severity;

    fn registry_from(toml: &str) -> Result<RuleRegistry, ConfigError> {
        let config = Config::parse(toml)?;
        RuleRegistry::build_from_config(&config.rules)
    }

    #[test]
    fn test_new_registry() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.rule_count(), 0);
    }

    #[test]
    fn test_build_from_config() {
        let registry = registry_from(
            r#"
[gate]
version = "1"

[rules.forbidden-plain-calls]
extensions = ["php"]
rules = ["die", "print_r"]

[rules.forbidden-method-calls]
mode = "regex"
rules = ["console\\.log", { needle = "window.alert", mode = "exact", id = "no-alert" }]

[rules.blacklisted-text]
rules = ["<<<<<<<"]
"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.rule_count(), 5);

        let methods = registry.get("forbidden-method-calls").unwrap();
        assert_eq!(methods.kind(), RuleSetKind::MethodCalls);
        assert_eq!(methods.rules()[0].mode(), MatchMode::Regex);
        assert_eq!(methods.rules()[1].mode(), MatchMode::Exact);
        assert_eq!(methods.rules()[1].id().as_str(), "no-alert");
        assert_eq!(methods.rules()[1].severity(), Severity::Error);
    }

    #[test]
    fn test_preserves_configuration_order() {
        let registry = registry_from(
            r#"
[gate]
version = "1"

[rules.zeta]
kind = "text"
rules = ["a"]

[rules.alpha]
kind = "text"
rules = ["b"]
"#,
        )
        .unwrap();
        let names: Vec<&str> = registry.iter().map(RuleSet::name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_duplicate_rule_id() {
        let result = registry_from(
            r#"
[gate]
version = "1"

[rules.forbidden-plain-calls]
rules = ["dpm", { needle = "dsm", id = "dpm" }]
"#,
        );
        assert!(result.unwrap_err().to_string().contains("Duplicate rule ID"));
    }

    #[test]
    fn test_same_id_in_different_sets_is_allowed() {
        let result = registry_from(
            r#"
[gate]
version = "1"

[rules.forbidden-plain-calls]
rules = ["alert"]

[rules.js-plain-calls]
kind = "plain-calls"
rules = ["alert"]
"#,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_regex() {
        let result = registry_from(
            r#"
[gate]
version = "1"

[rules.forbidden-method-calls]
mode = "regex"
rules = ["console.(log"]
"#,
        );
        match result {
            Err(ConfigError::InvalidPattern { rule_set, needle, .. }) => {
                assert_eq!(rule_set, "forbidden-method-calls");
                assert_eq!(needle, "console.(log");
            }
            other => panic!("Expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rule_id() {
        let result = registry_from(
            r#"
[gate]
version = "1"

[rules.blacklisted-text]
rules = [{ needle = "<<<<<<<", id = "two words" }]
"#,
        );
        assert!(result.unwrap_err().to_string().contains("Invalid rule ID 'two words'"));
    }

    #[test]
    fn test_needle_with_spaces_gets_derived_id() {
        let registry = registry_from(
            r#"
[gate]
version = "1"

[rules.blacklisted-text]
rules = ["<<<<<<< HEAD", ">>>>>>>"]
"#,
        )
        .unwrap();

        let text = registry.get("blacklisted-text").unwrap();
        assert_eq!(text.rules()[0].id().as_str(), "<<<<<<<-HEAD");
        assert_eq!(text.rules()[0].needle(), "<<<<<<< HEAD");
        assert_eq!(text.rules()[1].id().as_str(), ">>>>>>>");
    }

    #[test]
    fn test_set_scope_and_counts() {
        let registry = registry_from(
            r#"
[gate]
version = "1"

[rules.php-calls]
kind = "plain-calls"
extensions = ["php", "module"]
rules = ["die", "exit"]

[rules.blacklisted-text]
rules = ["<<<<<<<"]
"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.rule_count(), 3);
        assert_eq!(registry.get("php-calls").unwrap().extensions(), ["php", "module"]);
        assert_eq!(registry.get("blacklisted-text").unwrap().kind(), RuleSetKind::Text);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_insert_duplicate_set_name() {
        let mut registry = RuleRegistry::new();
        let set = RuleSet::new("a", RuleSetKind::Text, vec![], vec![]).unwrap();
        registry.insert(set.clone()).unwrap();
        assert!(registry.insert(set).is_err());
    }
}
