//! CLI argument parsing using clap

use crate::config::{ColorOption, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// commitgate CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "commitgate")]
#[command(about = "Source-quality gate for commits: syntax, style, forbidden calls and conflict markers")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (overrides [output] color)
    #[arg(long, global = true)]
    pub color: Option<ColorOption>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commitgate subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check files against the configured gate
    Check {
        /// Files or directories to check (defaults to the current directory)
        paths: Vec<PathBuf>,

        /// Check the files staged in git instead of walking paths
        #[arg(long, conflicts_with = "paths")]
        staged: bool,

        /// Output format (overrides [output] format)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a starter commitgate.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the checks and rules that would run
    List {
        /// Output format
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Install a git pre-commit hook that runs `commitgate check --staged`
    InstallHook {
        /// Replace an existing pre-commit hook
        #[arg(long)]
        force: bool,
    },
}
