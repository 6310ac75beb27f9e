//! Common helper functions shared across CLI commands

use crate::config::Config;
use crate::error::{ConfigError, GateError};
use std::path::Path;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "commitgate.toml";

/// Load commitgate.toml, or the file given on the command line
///
/// # Errors
///
/// Returns `ConfigError::Io` if the file does not exist or cannot be read,
/// and the parse and validation errors of `Config::load` otherwise.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
    if !config_path.exists() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "{} not found. Run 'commitgate init' to create it.",
                config_path.display()
            ),
        )));
    }

    Config::load(config_path)
}

/// Exit code for a configuration error
///
/// A file that exists but does not parse or validate is exit code 3; an
/// unreadable file is a general error.
pub(crate) fn config_exit_code(err: &ConfigError) -> i32 {
    match err {
        ConfigError::Io(_) => EXIT_ERROR,
        _ => EXIT_PARSE_ERROR,
    }
}

pub(crate) fn gate_exit_code(err: &GateError) -> i32 {
    match err {
        GateError::Config(e) => config_exit_code(e),
        _ => EXIT_ERROR,
    }
}
