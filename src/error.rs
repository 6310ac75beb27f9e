//! Error types for commitgate
//!
//! Configuration problems are fatal and abort a run before any file is
//! processed. Everything that can go wrong for a single file is folded into
//! that file's verdict by the pipeline and never surfaces as an error here.

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration parsed but is semantically invalid
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Two rules in the same rule set share an identifier
    #[error("Duplicate rule ID '{rule_id}' in rule set '{rule_set}'")]
    DuplicateRuleId { rule_set: String, rule_id: String },

    /// A rule needle could not be compiled
    #[error("Invalid pattern '{needle}' in rule set '{rule_set}': {message}")]
    InvalidPattern {
        rule_set: String,
        needle: String,
        message: String,
    },
}

/// Rule-related errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

/// Errors raised while collecting candidate files
#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    /// A version-control command could not be run or failed
    #[error("'{command}' failed: {message}")]
    Command { command: String, message: String },

    /// Directory walk error
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid exclude glob
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },
}

/// Top-level error type for commitgate
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Candidate file collection error
    #[error("Candidate files: {0}")]
    Candidates(#[from] CandidateError),
}

impl From<RuleError> for ConfigError {
    fn from(err: RuleError) -> Self {
        ConfigError::Validation(err.to_string())
    }
}
