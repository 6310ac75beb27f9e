//! Parsing and validation for commitgate.toml configuration files

use crate::engine::pipeline::CheckKind;
use crate::error::ConfigError;
use crate::rules::{MatchMode, RuleSetKind};
use crate::types::Severity;
use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration struct for commitgate.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Gate metadata and file selection
    pub gate: GateMeta,

    /// External tools run per file
    #[serde(default)]
    pub collaborators: CollaboratorsConfig,

    /// Rule sets keyed by name, in document order
    #[serde(default)]
    pub rules: IndexMap<String, RuleSetConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.gate.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.gate.version
            )));
        }

        for pattern in &self.gate.exclude {
            if is_glob(pattern) {
                globset::Glob::new(pattern).map_err(|e| {
                    ConfigError::Validation(format!(
                        "Invalid exclude glob pattern '{}': {}",
                        pattern, e
                    ))
                })?;
            }
        }

        for (name, command) in self.collaborators.iter() {
            if command.command.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Collaborator '{}' has an empty command",
                    name
                )));
            }
        }

        for (name, set) in &self.rules {
            set.resolve_kind(name)?;
        }

        Ok(())
    }

    /// Whether a check kind is enabled by `[gate] checks`
    pub fn check_enabled(&self, kind: CheckKind) -> bool {
        self.gate.checks.contains(&kind)
    }
}

/// Returns true when an exclude entry should be treated as a glob rather
/// than a literal path prefix.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Gate metadata section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateMeta {
    /// Configuration version (must be "1")
    pub version: String,

    /// Allowed file extensions, without the dot. Empty admits everything.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Excluded path prefixes (or globs)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Checks to run; order of execution is fixed by the pipeline
    #[serde(default = "default_checks")]
    pub checks: Vec<CheckKind>,

    /// Process files on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_checks() -> Vec<CheckKind> {
    CheckKind::ALL.to_vec()
}

/// External tool configuration, one optional entry per role
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollaboratorsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<CommandConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<CommandConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CommandConfig>,
}

impl CollaboratorsConfig {
    /// Iterate over configured collaborators with their role names
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CommandConfig)> {
        [
            ("syntax", self.syntax.as_ref()),
            ("fix", self.fix.as_ref()),
            ("style", self.style.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, command)| command.map(|c| (name, c)))
    }
}

/// A command run once per file, with the file path appended to `args`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Program to execute
    pub command: String,

    /// Arguments placed before the file path
    #[serde(default)]
    pub args: Vec<String>,

    /// Extensions this tool understands. Empty means all selected files.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Exit codes meaning "clean"; defaults depend on the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_codes: Option<Vec<i32>>,

    /// Exit codes meaning "the tool ran and found something"; defaults
    /// depend on the role. Any other exit code is an operation error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_codes: Option<Vec<i32>>,
}

/// One `[rules.<name>]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// What the needles match against; inferred from conventional names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RuleSetKind>,

    /// Default match mode for entries of this set
    #[serde(default)]
    pub mode: MatchMode,

    /// Default severity for entries of this set
    #[serde(default)]
    pub severity: Severity,

    /// Extensions this set applies to. Empty means all files.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Default message template for entries of this set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Rules, as bare needles or detailed tables
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl RuleSetConfig {
    /// Resolve the set kind, falling back to the conventional name mapping
    pub fn resolve_kind(&self, name: &str) -> Result<RuleSetKind, ConfigError> {
        self.kind
            .or_else(|| RuleSetKind::from_set_name(name))
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "Rule set '{}' needs a kind (plain-calls, method-calls or text)",
                    name
                ))
            })
    }
}

/// A rule entry: a bare needle or a table with overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    Needle(String),
    Detailed(RuleDefinition),
}

/// Detailed rule entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub needle: String,

    /// Rule id; defaults to the needle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MatchMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
[gate]
version = "1"
extensions = ["php", "module", "js"]
exclude = ["web/core/", "**/vendor/**"]

[collaborators.syntax]
command = "php"
args = ["-l"]
extensions = ["php", "module"]
success_codes = [0]
failure_codes = [255]

[collaborators.fix]
command = "vendor/bin/phpcbf"
args = ["-p"]

[rules.forbidden-plain-calls]
extensions = ["php", "module"]
rules = ["print_r", "var_dump", { needle = "dpm", severity = "warning" }]

[rules.forbidden-method-calls]
mode = "regex"
extensions = ["js"]
rules = ["console\\.log"]

[rules.blacklisted-text]
rules = ["<<<<<<<", ">>>>>>>"]

[output]
format = "jsonl"
color = "never"
"#;

    #[test]
    fn test_valid_config_parsing() {
        let config = Config::parse(VALID_CONFIG).unwrap();

        assert_eq!(config.gate.version, "1");
        assert_eq!(config.gate.extensions, vec!["php", "module", "js"]);
        assert_eq!(config.gate.exclude.len(), 2);
        assert_eq!(config.gate.checks, CheckKind::ALL.to_vec());
        assert!(!config.gate.parallel);

        let syntax = config.collaborators.syntax.as_ref().unwrap();
        assert_eq!(syntax.command, "php");
        assert_eq!(syntax.failure_codes, Some(vec![255]));
        assert!(config.collaborators.style.is_none());

        let names: Vec<&str> = config.rules.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["forbidden-plain-calls", "forbidden-method-calls", "blacklisted-text"]
        );

        let plain = &config.rules["forbidden-plain-calls"];
        assert_eq!(plain.rules.len(), 3);
        assert_eq!(plain.rules[0], RuleEntry::Needle("print_r".to_string()));
        match &plain.rules[2] {
            RuleEntry::Detailed(def) => {
                assert_eq!(def.needle, "dpm");
                assert_eq!(def.severity, Some(Severity::Warning));
            }
            other => panic!("Expected detailed rule, got {:?}", other),
        }

        assert_eq!(config.rules["forbidden-method-calls"].mode, MatchMode::Regex);
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(config.output.color, ColorOption::Never);
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::parse("[gate]\nversion = \"1\"\n").unwrap();
        assert!(config.gate.extensions.is_empty());
        assert!(config.rules.is_empty());
        assert_eq!(config.output.format, OutputFormat::Human);
        assert_eq!(config.output.color, ColorOption::Auto);
        assert_eq!(config.collaborators.iter().count(), 0);
    }

    #[test]
    fn test_invalid_version() {
        let result = Config::parse("[gate]\nversion = \"2\"\n");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Unsupported configuration version")
        );
    }

    #[test]
    fn test_missing_version() {
        assert!(Config::parse("[gate]\nextensions = [\"php\"]\n").is_err());
    }

    #[test]
    fn test_invalid_exclude_glob() {
        let result = Config::parse("[gate]\nversion = \"1\"\nexclude = [\"[invalid*\"]\n");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid exclude glob pattern")
        );
    }

    #[test]
    fn test_rule_set_without_kind() {
        let config_str = r#"
[gate]
version = "1"

[rules.debugging]
rules = ["dpm"]
"#;
        let result = Config::parse(config_str);
        assert!(result.unwrap_err().to_string().contains("needs a kind"));
    }

    #[test]
    fn test_rule_set_with_explicit_kind() {
        let config_str = r#"
[gate]
version = "1"

[rules.js-debugging]
kind = "plain-calls"
extensions = ["js"]
rules = ["alert"]
"#;
        let config = Config::parse(config_str).unwrap();
        let set = &config.rules["js-debugging"];
        assert_eq!(set.resolve_kind("js-debugging").unwrap(), RuleSetKind::PlainCalls);
    }

    #[test]
    fn test_checks_subset() {
        let config_str = r#"
[gate]
version = "1"
checks = ["construct", "text"]
"#;
        let config = Config::parse(config_str).unwrap();
        assert!(config.check_enabled(CheckKind::Text));
        assert!(!config.check_enabled(CheckKind::Syntax));
    }

    #[test]
    fn test_invalid_check_name() {
        let config_str = r#"
[gate]
version = "1"
checks = ["spelling"]
"#;
        assert!(Config::parse(config_str).is_err());
    }

    #[test]
    fn test_empty_collaborator_command() {
        let config_str = r#"
[gate]
version = "1"

[collaborators.style]
command = "  "
"#;
        let result = Config::parse(config_str);
        assert!(result.unwrap_err().to_string().contains("empty command"));
    }

    #[test]
    fn test_invalid_mode_and_severity() {
        let bad_mode = r#"
[gate]
version = "1"

[rules.blacklisted-text]
mode = "fuzzy"
rules = ["<<<<<<<"]
"#;
        assert!(Config::parse(bad_mode).is_err());

        let bad_severity = r#"
[gate]
version = "1"

[rules.forbidden-plain-calls]
severity = "critical"
rules = ["die"]
"#;
        assert!(Config::parse(bad_severity).is_err());
    }

    #[test]
    fn test_is_glob() {
        assert!(is_glob("**/vendor/**"));
        assert!(is_glob("web/*/contrib/"));
        assert!(!is_glob("web/core/"));
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::parse(VALID_CONFIG).unwrap();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized = Config::parse(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
