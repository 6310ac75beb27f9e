//! Check command implementation
//!
//! This module implements the `commitgate check` command, which:
//! - Loads configuration from commitgate.toml
//! - Collects candidates (staged files, or a walk of the given paths)
//! - Selects files by extension and exclude list
//! - Runs the check pipeline over every selected file
//! - Formats output (human or JSONL)
//! - Returns appropriate exit code

use crate::cli::common::{EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS, config_exit_code, gate_exit_code};
use crate::config::{ColorOption, OutputFormat};
use crate::engine::{CandidateSource, CheckPipeline, FileSelector, GitStagedFiles, WalkedFiles};
use crate::error::{CandidateError, ConfigError, GateError};
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::rules::RuleRegistry;
use std::path::PathBuf;
use tracing::info;

/// Options of a check run, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub paths: Vec<PathBuf>,
    pub staged: bool,
    pub format: Option<OutputFormat>,
    pub config: Option<PathBuf>,
    pub color: Option<ColorOption>,
}

/// Error type specific to check command
#[derive(Debug, thiserror::Error)]
pub(crate) enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Gate(#[from] GateError),

    #[error("Candidate files: {0}")]
    Candidates(#[from] CandidateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the check command
///
/// Exit code:
/// - 0: every selected file passed
/// - 1: at least one check failed
/// - 2: error (I/O, git, walk)
/// - 3: configuration does not parse or validate
pub fn run_check(options: &CheckOptions) -> i32 {
    match run_check_inner(options) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_FAILED,
        Err(e) => {
            eprintln!("Error: {}", e);
            match &e {
                CheckError::Config(e) => config_exit_code(e),
                CheckError::Gate(e) => gate_exit_code(e),
                _ => EXIT_ERROR,
            }
        }
    }
}

fn run_check_inner(options: &CheckOptions) -> Result<bool, CheckError> {
    let config = super::common::load_config(options.config.as_deref())?;
    let registry = RuleRegistry::build_from_config(&config.rules)?;
    let pipeline = CheckPipeline::from_config(&config, &registry)?;

    let source: Box<dyn CandidateSource> = if options.staged {
        Box::new(GitStagedFiles::new())
    } else if options.paths.is_empty() {
        Box::new(WalkedFiles::new(vec![PathBuf::from(".")]))
    } else {
        Box::new(WalkedFiles::new(options.paths.clone()))
    };
    let candidates = source.candidates()?;

    let selector = FileSelector::from_config(&config.gate)?;
    let files = selector.select(candidates);
    info!(
        files = files.len(),
        stages = ?pipeline.stages(),
        "selected files"
    );

    let verdict = if config.gate.parallel {
        pipeline.run_parallel(&files)
    } else {
        pipeline.run(&files)
    };

    match options.format.unwrap_or(config.output.format) {
        OutputFormat::Human => {
            HumanFormatter::new(options.color.unwrap_or(config.output.color)).print(&verdict)?
        }
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format(&verdict)),
    }

    Ok(verdict.passed())
}
