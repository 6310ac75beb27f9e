#![forbid(unsafe_code)]

//! Collaborators backed by external commands
//!
//! The command is run as `program args... <file>` and its exit status is
//! mapped through two lists: codes meaning "clean" and codes meaning "the
//! tool ran and found something". Every other status is an operation error.

use crate::collab::{
    AutoFixer, FixOutcome, StyleChecker, StyleOutcome, SyntaxOutcome, SyntaxValidator,
};
use crate::config::CommandConfig;
use crate::scan::Finding;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Which pipeline stage a command serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorRole {
    Syntax,
    Fix,
    Style,
}

impl CollaboratorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorRole::Syntax => "syntax",
            CollaboratorRole::Fix => "fix",
            CollaboratorRole::Style => "style",
        }
    }

    /// Exit codes meaning "clean" when none are configured
    pub fn default_success_codes(&self) -> &'static [i32] {
        &[0]
    }

    /// Exit codes meaning "found something" when none are configured
    ///
    /// These follow `php -l` (255 on a parse error), `phpcbf` (1 when it
    /// rewrote the file) and `phpcs` (1 when it reports issues).
    pub fn default_failure_codes(&self) -> &'static [i32] {
        match self {
            CollaboratorRole::Syntax => &[255],
            CollaboratorRole::Fix | CollaboratorRole::Style => &[1],
        }
    }
}

/// Classified result of one command run
#[derive(Debug, Clone, PartialEq, Eq)]
enum RunStatus {
    Clean,
    Flagged(String),
    Failed(String),
}

/// An external command used as a syntax validator, fixer or style checker
#[derive(Debug, Clone)]
pub struct CommandCollaborator {
    role: CollaboratorRole,
    program: String,
    args: Vec<String>,
    extensions: Vec<String>,
    success_codes: Vec<i32>,
    failure_codes: Vec<i32>,
}

impl CommandCollaborator {
    pub fn new(role: CollaboratorRole, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            role,
            program: program.into(),
            args,
            extensions: Vec::new(),
            success_codes: role.default_success_codes().to_vec(),
            failure_codes: role.default_failure_codes().to_vec(),
        }
    }

    pub fn from_config(role: CollaboratorRole, config: &CommandConfig) -> Self {
        let mut collaborator = Self::new(role, config.command.clone(), config.args.clone());
        collaborator.extensions = config
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        if let Some(codes) = &config.success_codes {
            collaborator.success_codes = codes.clone();
        }
        if let Some(codes) = &config.failure_codes {
            collaborator.failure_codes = codes.clone();
        }
        collaborator
    }

    fn handles(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn run(&self, path: &Path) -> RunStatus {
        debug!(
            role = self.role.as_str(),
            program = %self.program,
            file = %path.display(),
            "running collaborator"
        );

        let output = match Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                return RunStatus::Failed(format!("Failed to run '{}': {}", self.program, e));
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }

        match output.status.code() {
            Some(code) if self.success_codes.contains(&code) => RunStatus::Clean,
            Some(code) if self.failure_codes.contains(&code) => RunStatus::Flagged(text),
            Some(code) => RunStatus::Failed(format!(
                "'{}' exited with status {}: {}",
                self.program, code, text
            )),
            None => RunStatus::Failed(format!(
                "'{}' was terminated by a signal: {}",
                self.program, text
            )),
        }
    }
}

impl SyntaxValidator for CommandCollaborator {
    fn validate(&self, path: &Path) -> SyntaxOutcome {
        match self.run(path) {
            RunStatus::Clean => SyntaxOutcome::Ok,
            RunStatus::Flagged(text) => SyntaxOutcome::SyntaxError(text),
            RunStatus::Failed(text) => SyntaxOutcome::OperationError(text),
        }
    }

    fn applies_to(&self, path: &Path) -> bool {
        self.handles(path)
    }
}

impl AutoFixer for CommandCollaborator {
    fn fix(&self, path: &Path) -> FixOutcome {
        match self.run(path) {
            RunStatus::Clean => FixOutcome::NoChangesNeeded,
            RunStatus::Flagged(_) => FixOutcome::ChangesApplied,
            RunStatus::Failed(text) => FixOutcome::OperationError(text),
        }
    }

    fn applies_to(&self, path: &Path) -> bool {
        self.handles(path)
    }
}

impl StyleChecker for CommandCollaborator {
    fn check(&self, path: &Path) -> StyleOutcome {
        match self.run(path) {
            RunStatus::Clean => StyleOutcome::NoIssues,
            RunStatus::Flagged(text) => {
                let message = if text.is_empty() {
                    format!("'{}' reported style issues", self.program)
                } else {
                    text
                };
                StyleOutcome::IssuesFound(vec![Finding::diagnostic("style", path, message)])
            }
            RunStatus::Failed(text) => StyleOutcome::OperationError(text),
        }
    }

    fn applies_to(&self, path: &Path) -> bool {
        self.handles(path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(role: CollaboratorRole, script: &str) -> CommandCollaborator {
        CommandCollaborator::new(role, "sh", vec!["-c".to_string(), script.to_string(), "sh".to_string()])
    }

    #[test]
    fn test_syntax_exit_codes() {
        let path = Path::new("a.php");
        assert_eq!(shell(CollaboratorRole::Syntax, "exit 0").validate(path), SyntaxOutcome::Ok);
        assert_eq!(
            shell(CollaboratorRole::Syntax, "echo 'Parse error in $1'; exit 255").validate(path),
            SyntaxOutcome::SyntaxError("Parse error in a.php".to_string())
        );
        assert!(matches!(
            shell(CollaboratorRole::Syntax, "exit 3").validate(path),
            SyntaxOutcome::OperationError(_)
        ));
    }

    #[test]
    fn test_fix_exit_codes() {
        let path = Path::new("a.php");
        assert_eq!(shell(CollaboratorRole::Fix, "exit 0").fix(path), FixOutcome::NoChangesNeeded);
        assert_eq!(shell(CollaboratorRole::Fix, "exit 1").fix(path), FixOutcome::ChangesApplied);
        assert!(matches!(
            shell(CollaboratorRole::Fix, "echo boom >&2; exit 2").fix(path),
            FixOutcome::OperationError(text) if text.contains("boom")
        ));
    }

    #[test]
    fn test_style_issues_become_file_level_findings() {
        let path = Path::new("a.php");
        let StyleOutcome::IssuesFound(findings) =
            shell(CollaboratorRole::Style, "echo 'Missing doc comment'; exit 1").check(path)
        else {
            panic!("expected issues");
        };
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "Missing doc comment");
        assert!(findings[0].location.is_none());
    }

    #[test]
    fn test_configured_codes_override_defaults() {
        let config = CommandConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "exit 4".to_string()],
            extensions: vec![".php".to_string()],
            success_codes: None,
            failure_codes: Some(vec![4]),
        };
        let collaborator = CommandCollaborator::from_config(CollaboratorRole::Style, &config);
        assert!(matches!(
            collaborator.check(Path::new("a.php")),
            StyleOutcome::IssuesFound(_)
        ));
        assert!(StyleChecker::applies_to(&collaborator, Path::new("a.php")));
        assert!(!StyleChecker::applies_to(&collaborator, Path::new("a.js")));
    }

    #[test]
    fn test_missing_program_is_operation_error() {
        let collaborator = CommandCollaborator::new(
            CollaboratorRole::Syntax,
            "commitgate-definitely-missing-tool",
            vec![],
        );
        assert!(matches!(
            collaborator.validate(Path::new("a.php")),
            SyntaxOutcome::OperationError(text) if text.contains("Failed to run")
        ));
    }
}
