#![forbid(unsafe_code)]

//! Per-file check pipeline and verdict folding
//!
//! Every file walks the same fixed sequence of checks:
//! syntax, fix, style, construct scan, text scan. A syntax failure ends the
//! file early; every other failure is recorded and processing continues.
//! Files never influence each other, so they can be checked on the rayon
//! thread pool.

use crate::collab::{
    AutoFixer, CollaboratorRole, CommandCollaborator, FixOutcome, StyleChecker, StyleOutcome,
    SyntaxOutcome, SyntaxValidator,
};
use crate::config::Config;
use crate::error::ConfigError;
use crate::lexer::tokenize;
use crate::rules::RuleRegistry;
use crate::scan::{BlacklistedTextScanner, Finding, ForbiddenConstructScanner};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The checks a file goes through, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Syntax,
    Fix,
    Style,
    Construct,
    Text,
}

impl CheckKind {
    pub const ALL: [CheckKind; 5] = [
        CheckKind::Syntax,
        CheckKind::Fix,
        CheckKind::Style,
        CheckKind::Construct,
        CheckKind::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Syntax => "syntax",
            CheckKind::Fix => "fix",
            CheckKind::Style => "style",
            CheckKind::Construct => "construct",
            CheckKind::Text => "text",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check on one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub check: CheckKind,
    pub passed: bool,
    pub findings: Vec<Finding>,
    /// Short remark for the reporter, e.g. asking to re-stage a fixed file
    pub note: Option<String>,
}

impl CheckResult {
    fn pass(check: CheckKind) -> Self {
        Self {
            check,
            passed: true,
            findings: Vec::new(),
            note: None,
        }
    }

    /// Fails iff any finding has error severity
    fn from_findings(check: CheckKind, findings: Vec<Finding>) -> Self {
        Self {
            check,
            passed: !findings.iter().any(Finding::is_error),
            findings,
            note: None,
        }
    }

    fn operation_error(check: CheckKind, path: &Path, message: String) -> Self {
        Self {
            check,
            passed: false,
            findings: vec![Finding::diagnostic(check.as_str(), path, message)],
            note: Some("operation error".to_string()),
        }
    }

    fn from_syntax(path: &Path, outcome: SyntaxOutcome) -> Self {
        match outcome {
            SyntaxOutcome::Ok => Self::pass(CheckKind::Syntax),
            SyntaxOutcome::SyntaxError(text) => Self {
                check: CheckKind::Syntax,
                passed: false,
                findings: vec![Finding::diagnostic("syntax", path, text)],
                note: Some("syntax error, remaining checks skipped".to_string()),
            },
            SyntaxOutcome::OperationError(text) => {
                Self::operation_error(CheckKind::Syntax, path, text)
            }
        }
    }

    fn from_fix(path: &Path, outcome: FixOutcome) -> Self {
        match outcome {
            FixOutcome::NoChangesNeeded => Self::pass(CheckKind::Fix),
            FixOutcome::ChangesApplied => Self {
                check: CheckKind::Fix,
                passed: false,
                findings: Vec::new(),
                note: Some("changes applied, please re-stage".to_string()),
            },
            FixOutcome::OperationError(text) => Self::operation_error(CheckKind::Fix, path, text),
        }
    }

    fn from_style(path: &Path, outcome: StyleOutcome) -> Self {
        match outcome {
            StyleOutcome::NoIssues => Self::pass(CheckKind::Style),
            StyleOutcome::IssuesFound(findings) => Self {
                check: CheckKind::Style,
                passed: false,
                findings,
                note: None,
            },
            StyleOutcome::OperationError(text) => {
                Self::operation_error(CheckKind::Style, path, text)
            }
        }
    }
}

/// All check results for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVerdict {
    pub file: PathBuf,
    pub results: Vec<CheckResult>,
}

impl FileVerdict {
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Result of a given check, if it ran
    pub fn result(&self, check: CheckKind) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.results.iter().flat_map(|r| r.findings.iter())
    }
}

/// Verdicts for a whole run, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunVerdict {
    pub files: Vec<FileVerdict>,
}

impl RunVerdict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, verdict: FileVerdict) {
        self.files.push(verdict);
    }

    pub fn passed(&self) -> bool {
        self.files.iter().all(FileVerdict::passed)
    }

    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.files.iter().flat_map(FileVerdict::findings)
    }

    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| !f.passed()).count()
    }
}

impl FromIterator<FileVerdict> for RunVerdict {
    fn from_iter<I: IntoIterator<Item = FileVerdict>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl Extend<FileVerdict> for RunVerdict {
    fn extend<I: IntoIterator<Item = FileVerdict>>(&mut self, iter: I) {
        self.files.extend(iter);
    }
}

/// Runs the configured checks over files
///
/// Absent collaborators or scanners simply skip their stage.
#[derive(Default)]
pub struct CheckPipeline {
    syntax: Option<Box<dyn SyntaxValidator>>,
    fixer: Option<Box<dyn AutoFixer>>,
    style: Option<Box<dyn StyleChecker>>,
    construct: Option<ForbiddenConstructScanner>,
    text: Option<BlacklistedTextScanner>,
}

impl CheckPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_syntax(mut self, validator: impl SyntaxValidator + 'static) -> Self {
        self.syntax = Some(Box::new(validator));
        self
    }

    pub fn with_fixer(mut self, fixer: impl AutoFixer + 'static) -> Self {
        self.fixer = Some(Box::new(fixer));
        self
    }

    pub fn with_style(mut self, checker: impl StyleChecker + 'static) -> Self {
        self.style = Some(Box::new(checker));
        self
    }

    pub fn with_construct(mut self, scanner: ForbiddenConstructScanner) -> Self {
        self.construct = (!scanner.is_empty()).then_some(scanner);
        self
    }

    pub fn with_text(mut self, scanner: BlacklistedTextScanner) -> Self {
        self.text = (!scanner.is_empty()).then_some(scanner);
        self
    }

    /// Assemble a pipeline from configuration and loaded rule sets
    ///
    /// Checks disabled in `[gate] checks` are left out.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if a text rule set fails to compile.
    pub fn from_config(config: &Config, registry: &RuleRegistry) -> Result<Self, ConfigError> {
        let mut pipeline = Self::new();
        let collaborators = &config.collaborators;

        if config.check_enabled(CheckKind::Syntax)
            && let Some(command) = &collaborators.syntax
        {
            pipeline = pipeline.with_syntax(CommandCollaborator::from_config(
                CollaboratorRole::Syntax,
                command,
            ));
        }
        if config.check_enabled(CheckKind::Fix)
            && let Some(command) = &collaborators.fix
        {
            pipeline =
                pipeline.with_fixer(CommandCollaborator::from_config(CollaboratorRole::Fix, command));
        }
        if config.check_enabled(CheckKind::Style)
            && let Some(command) = &collaborators.style
        {
            pipeline = pipeline
                .with_style(CommandCollaborator::from_config(CollaboratorRole::Style, command));
        }
        if config.check_enabled(CheckKind::Construct) {
            pipeline = pipeline.with_construct(ForbiddenConstructScanner::from_registry(registry));
        }
        if config.check_enabled(CheckKind::Text) {
            pipeline = pipeline.with_text(BlacklistedTextScanner::from_registry(registry)?);
        }

        Ok(pipeline)
    }

    /// Checks that would run at all, in order
    pub fn stages(&self) -> Vec<CheckKind> {
        let present = [
            self.syntax.is_some(),
            self.fixer.is_some(),
            self.style.is_some(),
            self.construct.is_some(),
            self.text.is_some(),
        ];
        CheckKind::ALL
            .into_iter()
            .zip(present)
            .filter_map(|(kind, on)| on.then_some(kind))
            .collect()
    }

    /// Check files one after another
    pub fn run(&self, files: &[PathBuf]) -> RunVerdict {
        info!(files = files.len(), "checking files");
        files.iter().map(|file| self.check_file(file)).collect()
    }

    /// Check files on the rayon pool; verdicts keep input order
    pub fn run_parallel(&self, files: &[PathBuf]) -> RunVerdict {
        info!(files = files.len(), "checking files in parallel");
        let verdicts: Vec<FileVerdict> = files.par_iter().map(|file| self.check_file(file)).collect();
        verdicts.into_iter().collect()
    }

    /// Run every applicable check on a single file
    pub fn check_file(&self, path: &Path) -> FileVerdict {
        let mut results = Vec::new();

        if let Some(validator) = self.syntax.as_deref().filter(|v| v.applies_to(path)) {
            let result = CheckResult::from_syntax(path, validator.validate(path));
            let failed = !result.passed;
            results.push(result);
            if failed {
                debug!(file = %path.display(), "syntax check failed, skipping remaining checks");
                return FileVerdict {
                    file: path.to_path_buf(),
                    results,
                };
            }
        }

        if let Some(fixer) = self.fixer.as_deref().filter(|f| f.applies_to(path)) {
            results.push(CheckResult::from_fix(path, fixer.fix(path)));
        }

        if let Some(checker) = self.style.as_deref().filter(|c| c.applies_to(path)) {
            results.push(CheckResult::from_style(path, checker.check(path)));
        }

        let construct = self.construct.as_ref().filter(|s| s.applies_to(path));
        let text = self.text.as_ref().filter(|s| s.applies_to(path));

        if construct.is_some() || text.is_some() {
            // Read after fixing so scanners see the rewritten file
            match fs::read_to_string(path) {
                Ok(content) => {
                    if let Some(scanner) = construct {
                        let tokens = tokenize(&content);
                        results.push(CheckResult::from_findings(
                            CheckKind::Construct,
                            scanner.scan(path, &tokens),
                        ));
                    }
                    if let Some(scanner) = text {
                        results.push(CheckResult::from_findings(
                            CheckKind::Text,
                            scanner.scan(path, &content),
                        ));
                    }
                }
                Err(e) => {
                    let check = if construct.is_some() {
                        CheckKind::Construct
                    } else {
                        CheckKind::Text
                    };
                    results.push(CheckResult::operation_error(
                        check,
                        path,
                        format!("Failed to read {}: {}", path.display(), e),
                    ));
                }
            }
        }

        let verdict = FileVerdict {
            file: path.to_path_buf(),
            results,
        };
        debug!(
            file = %path.display(),
            passed = verdict.passed(),
            checks = verdict.results.len(),
            "file checked"
        );
        verdict
    }
}

impl fmt::Debug for CheckPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckPipeline")
            .field("stages", &self.stages())
            .finish()
    }
}
