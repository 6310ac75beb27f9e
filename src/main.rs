//! commitgate CLI entry point

use clap::Parser;
use commitgate::cli::common::{EXIT_ERROR, EXIT_SUCCESS};
use commitgate::cli::init::InitOutcome;
use commitgate::cli::{CheckOptions, Command, args::Cli};
use std::process;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter comes from COMMITGATE_LOG; `--verbose` forces debug
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("COMMITGATE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Check {
            paths,
            staged,
            format,
            config,
        } => commitgate::cli::check::run_check(&CheckOptions {
            paths,
            staged,
            format,
            config,
            color: cli.color,
        }),
        Command::Init { force } => match commitgate::cli::init::run_init(force) {
            Ok(InitOutcome::Created) => {
                println!("Created commitgate.toml. Review the rules and enable collaborators as needed.");
                EXIT_SUCCESS
            }
            Ok(InitOutcome::Overwritten) => {
                println!("Overwrote commitgate.toml.");
                EXIT_SUCCESS
            }
            Ok(InitOutcome::Skipped) => {
                println!("commitgate.toml already exists. Use --force to overwrite it.");
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Command::List { format, config } => {
            commitgate::cli::list::run_list(format, config.as_deref())
        }
        Command::InstallHook { force } => match commitgate::cli::hook::run_install_hook(force) {
            Ok(path) => {
                println!("Installed pre-commit hook at {}", path.display());
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
    };

    process::exit(exit_code);
}
