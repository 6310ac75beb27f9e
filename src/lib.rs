#![forbid(unsafe_code)]

//! commitgate: a source-quality gate run before commits
//!
//! Each candidate file passes through a fixed sequence of checks: external
//! syntax validation, auto-fixing and style checking, then built-in scans for
//! forbidden call constructs and blacklisted text such as merge-conflict
//! markers. The run fails if any check fails for any file.

pub mod cli;
pub mod collab;
pub mod config;
pub mod engine;
pub mod error;
pub mod lexer;
pub mod output;
pub mod rules;
pub mod scan;
pub mod types;

// Re-export error types for convenient access
pub use error::{CandidateError, ConfigError, GateError, RuleError};

// Re-export core domain types for convenient access
pub use engine::{CheckKind, CheckPipeline, FileVerdict, RunVerdict};
pub use scan::Finding;
pub use types::{RuleId, Severity};
