//! Test utilities for commitgate integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Configuration used by most integration tests: PHP and JS rules plus
/// conflict markers, no collaborators
pub const GATE_CONFIG: &str = r#"
[gate]
version = "1"
extensions = ["php", "module", "js", "txt"]
exclude = ["web/core/", "web/modules/contrib/"]

[rules.forbidden-plain-calls]
extensions = ["php", "module"]
rules = ["print_r", "var_dump", "dpm"]

[rules.forbidden-js-calls]
kind = "plain-calls"
extensions = ["js"]
rules = ["alert"]

[rules.forbidden-method-calls]
mode = "regex"
extensions = ["js"]
rules = ["console.log"]

[rules.blacklisted-text]
rules = ["<<<<<<<", ">>>>>>>"]
"#;

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
}
