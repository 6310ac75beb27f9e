//! Initialize commitgate in a repository
//!
//! Writes a starter commitgate.toml tuned for a Drupal project: PHP and
//! JavaScript debugging calls are forbidden and merge-conflict markers are
//! rejected in every selected file.

use crate::cli::common::CONFIG_FILE;
use std::fs;
use std::path::Path;

/// Default content for commitgate.toml
pub const DEFAULT_CONFIG_TOML: &str = r#"[gate]
version = "1"

# Only files with these extensions are checked
extensions = ["inc", "install", "js", "md", "module", "php", "profile", "test", "theme", "txt", "yml"]

# Path prefixes (or globs) that are never checked
exclude = [
    "web/core/",
    "web/libraries/contrib/",
    "web/modules/contrib/",
    "web/profiles/contrib/",
    "web/themes/contrib/",
    "drush/contrib/",
]

# Checks to run (defaults to all)
# checks = ["syntax", "fix", "style", "construct", "text"]

# Check files in parallel
# parallel = true

# External tools, run once per file with the file path appended.
# Uncomment to enable.
#
# [collaborators.syntax]
# command = "php"
# args = ["-l"]
# extensions = ["inc", "install", "module", "php", "profile", "test", "theme"]
# success_codes = [0]
# failure_codes = [255]
#
# [collaborators.fix]
# command = "vendor/bin/phpcbf"
# args = ["--standard=Drupal", "-p"]
# extensions = ["inc", "install", "module", "php", "profile", "test", "theme"]
#
# [collaborators.style]
# command = "vendor/bin/phpcs"
# args = ["--standard=Drupal", "-p"]
# extensions = ["inc", "install", "module", "php", "profile", "test", "theme"]

# PHP functions that must not be committed
[rules.forbidden-plain-calls]
extensions = ["inc", "install", "module", "php", "profile", "test", "theme"]
rules = [
    "die",
    "print_r",
    "var_dump",
    "debug",
    "dd",
    "ddebug_backtrace",
    "dpm",
    "dpq",
    "dpr",
    "dprint_r",
    "drupal_debug",
    "dsm",
    "dvm",
    "dvr",
    "kdevel_print_object",
    "kpr",
    "kprint_r",
    "krumo",
]

# JavaScript functions that must not be committed
[rules.forbidden-js-calls]
kind = "plain-calls"
extensions = ["js"]
rules = ["alert"]

# JavaScript object calls that must not be committed
[rules.forbidden-method-calls]
extensions = ["js"]
rules = ["console.error", "console.info", "console.log", "window.alert"]

# Leftovers of an unfinished git merge
[rules.blacklisted-text]
rules = ["<<<<<<<", ">>>>>>>"]

[output]
format = "human"
color = "auto"
"#;

/// Error type for init command
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened to the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Overwritten,
    /// The file existed and `force` was not given
    Skipped,
}

/// Run the init command in the current directory
pub fn run_init(force: bool) -> Result<InitOutcome, InitError> {
    init_at(Path::new("."), force)
}

/// Write commitgate.toml into `dir`
pub fn init_at(dir: &Path, force: bool) -> Result<InitOutcome, InitError> {
    let path = dir.join(CONFIG_FILE);

    if path.exists() {
        if force {
            fs::write(&path, DEFAULT_CONFIG_TOML)?;
            Ok(InitOutcome::Overwritten)
        } else {
            Ok(InitOutcome::Skipped)
        }
    } else {
        fs::write(&path, DEFAULT_CONFIG_TOML)?;
        Ok(InitOutcome::Created)
    }
}
