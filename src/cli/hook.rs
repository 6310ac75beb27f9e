//! Install the git pre-commit hook

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Contents of the installed hook
pub const PRE_COMMIT_HOOK: &str = "#!/bin/sh\n# Installed by commitgate\nexec commitgate check --staged\n";

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Not inside a git repository: {0}")]
    NotARepository(String),

    #[error("{} already exists. Use --force to replace it.", .0.display())]
    Exists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Install the hook into the repository containing the working directory
pub fn run_install_hook(force: bool) -> Result<PathBuf, HookError> {
    let output = Command::new("git")
        .args(["rev-parse", "--git-path", "hooks"])
        .output()?;
    if !output.status.success() {
        return Err(HookError::NotARepository(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let hooks_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    write_hook(&hooks_dir, force)
}

/// Write an executable `pre-commit` script into `hooks_dir`
pub fn write_hook(hooks_dir: &Path, force: bool) -> Result<PathBuf, HookError> {
    let path = hooks_dir.join("pre-commit");
    if path.exists() && !force {
        return Err(HookError::Exists(path));
    }

    fs::create_dir_all(hooks_dir)?;
    fs::write(&path, PRE_COMMIT_HOOK)?;
    make_executable(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
