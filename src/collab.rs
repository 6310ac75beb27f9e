#![forbid(unsafe_code)]

//! External tools consulted per file
//!
//! Syntax validation, auto-fixing and style checking are delegated to
//! collaborators. The pipeline only sees their outcomes.

mod command;

pub use command::{CollaboratorRole, CommandCollaborator};

use crate::scan::Finding;
use std::path::Path;

/// Result of validating a file's syntax
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxOutcome {
    Ok,
    /// The file does not parse; carries the tool's diagnostic text
    SyntaxError(String),
    /// The tool itself could not run
    OperationError(String),
}

/// Result of running an auto-fixer over a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    NoChangesNeeded,
    /// The file was modified on disk and must be staged again
    ChangesApplied,
    OperationError(String),
}

/// Result of an external style check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleOutcome {
    NoIssues,
    IssuesFound(Vec<Finding>),
    OperationError(String),
}

pub trait SyntaxValidator: Send + Sync {
    fn validate(&self, path: &Path) -> SyntaxOutcome;

    /// Whether this validator understands `path`
    fn applies_to(&self, _path: &Path) -> bool {
        true
    }
}

pub trait AutoFixer: Send + Sync {
    fn fix(&self, path: &Path) -> FixOutcome;

    fn applies_to(&self, _path: &Path) -> bool {
        true
    }
}

pub trait StyleChecker: Send + Sync {
    fn check(&self, path: &Path) -> StyleOutcome;

    fn applies_to(&self, _path: &Path) -> bool {
        true
    }
}
