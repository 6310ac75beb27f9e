#![forbid(unsafe_code)]

//! Reported violations

use crate::lexer::Token;
use crate::types::{RuleId, Severity};
use std::path::PathBuf;

/// Position of a finding within its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: u32,

    /// Column number in characters (1-indexed)
    pub column: u32,

    /// Byte offset from the start of the file
    pub offset: usize,
}

impl From<&Token> for Location {
    fn from(token: &Token) -> Self {
        Self {
            line: token.line,
            column: token.column,
            offset: token.offset,
        }
    }
}

/// A single reported violation
///
/// Findings are created by scanners or collaborators and never modified
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Rule that produced this finding
    pub rule_id: RuleId,

    pub severity: Severity,

    /// File the finding belongs to
    pub file: PathBuf,

    /// Position; `None` for file-level diagnostics from external tools
    pub location: Option<Location>,

    /// Offending text
    pub matched_text: String,

    /// Human-readable message
    pub message: String,
}

impl Finding {
    /// File-level error record carrying an external tool's diagnostic text
    pub fn diagnostic(
        rule_id: &'static str,
        file: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: RuleId::builtin(rule_id),
            severity: Severity::Error,
            file: file.into(),
            location: None,
            matched_text: String::new(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn line(&self) -> Option<u32> {
        self.location.map(|loc| loc.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_has_no_location() {
        let finding = Finding::diagnostic("syntax", "web/a.php", "Parse error: unexpected '}'");
        assert_eq!(finding.rule_id.as_str(), "syntax");
        assert!(finding.location.is_none());
        assert!(finding.is_error());
        assert_eq!(finding.line(), None);
    }
}
