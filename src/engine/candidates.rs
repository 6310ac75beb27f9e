#![forbid(unsafe_code)]

//! Where candidate files come from
//!
//! A pre-commit run checks the files staged in git; a manual run walks the
//! given paths with gitignore support.

use crate::error::{CandidateError, GateError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Hash of git's empty tree, diffed against when there is no HEAD yet
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// A source of paths to check
pub trait CandidateSource {
    fn candidates(&self) -> Result<Vec<PathBuf>, GateError>;
}

/// Added, copied and modified files in the git index
#[derive(Debug, Clone, Default)]
pub struct GitStagedFiles {
    repo: Option<PathBuf>,
}

impl GitStagedFiles {
    /// Staged files of the repository containing the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Staged files of the repository at `repo`
    ///
    /// Paths are relative to the repository root, as git reports them, so
    /// exclude prefixes apply unchanged; resolve them against `repo` to read.
    pub fn in_repo(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: Some(repo.into()),
        }
    }

    fn git(&self, args: &[&str]) -> Result<std::process::Output, CandidateError> {
        let mut command = Command::new("git");
        if let Some(repo) = &self.repo {
            command.current_dir(repo);
        }
        command.args(args).output().map_err(|e| CandidateError::Command {
            command: format!("git {}", args.join(" ")),
            message: e.to_string(),
        })
    }

    /// Commit to diff the index against
    fn against(&self) -> Result<String, CandidateError> {
        let output = self.git(&["rev-parse", "--verify", "HEAD"])?;
        if output.status.success() {
            Ok("HEAD".to_string())
        } else {
            debug!("no HEAD commit, diffing against the empty tree");
            Ok(EMPTY_TREE.to_string())
        }
    }
}

impl CandidateSource for GitStagedFiles {
    fn candidates(&self) -> Result<Vec<PathBuf>, GateError> {
        let against = self.against()?;
        let args = [
            "diff",
            "--cached",
            "--name-only",
            "--diff-filter=ACM",
            against.as_str(),
        ];
        let output = self.git(&args)?;

        if !output.status.success() {
            return Err(CandidateError::Command {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let files: Vec<PathBuf> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();

        debug!(count = files.len(), "staged files");
        Ok(files)
    }
}

/// Regular files below the given roots, honoring .gitignore
///
/// A root that is a file yields itself. The `.git` directory is never
/// entered.
#[derive(Debug, Clone)]
pub struct WalkedFiles {
    roots: Vec<PathBuf>,
}

impl WalkedFiles {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }
}

impl CandidateSource for WalkedFiles {
    fn candidates(&self) -> Result<Vec<PathBuf>, GateError> {
        let mut files = Vec::new();

        for root in &self.roots {
            let walker = WalkBuilder::new(root)
                .hidden(false)
                .git_ignore(true)
                .sort_by_file_name(|a, b| a.cmp(b))
                .filter_entry(|entry| entry.file_name() != ".git")
                .build();

            for result in walker {
                let entry = result.map_err(CandidateError::from)?;
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(strip_current_dir(entry.path()));
                }
            }
        }

        debug!(count = files.len(), "walked files");
        Ok(files)
    }
}

fn strip_current_dir(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walk_skips_git_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config"), "").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/b.php"), "").unwrap();
        fs::write(dir.path().join("a.php"), "").unwrap();

        let files = WalkedFiles::new(vec![dir.path().to_path_buf()])
            .candidates()
            .unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.php"), dir.path().join("src/b.php")]
        );
    }

    #[test]
    fn test_walk_file_root_yields_itself() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.js");
        fs::write(&file, "").unwrap();

        let files = WalkedFiles::new(vec![file.clone()]).candidates().unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_walk_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let result = WalkedFiles::new(vec![dir.path().join("missing")]).candidates();
        assert!(matches!(result, Err(GateError::Candidates(_))));
    }

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .status()
            .is_ok_and(|s| s.success())
    }

    #[test]
    fn test_staged_files_before_first_commit() {
        let dir = TempDir::new().unwrap();
        if !git(dir.path(), &["init", "-q"]) {
            return;
        }
        fs::write(dir.path().join("staged.php"), "<?php\n").unwrap();
        fs::write(dir.path().join("untracked.php"), "<?php\n").unwrap();
        assert!(git(dir.path(), &["add", "staged.php"]));

        fs::create_dir_all(dir.path().join("web/core")).unwrap();
        fs::write(dir.path().join("web/core/lib.php"), "<?php\n").unwrap();
        assert!(git(dir.path(), &["add", "web/core/lib.php"]));

        let files = GitStagedFiles::in_repo(dir.path()).candidates().unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("staged.php"), PathBuf::from("web/core/lib.php")]
        );

        let selector =
            crate::engine::FileSelector::new(&["php".to_string()], &["web/core/".to_string()])
                .unwrap();
        assert_eq!(selector.select(files), vec![PathBuf::from("staged.php")]);
    }

    #[test]
    fn test_strip_current_dir() {
        assert_eq!(strip_current_dir(Path::new("./a/b.php")), PathBuf::from("a/b.php"));
        assert_eq!(strip_current_dir(Path::new("a/b.php")), PathBuf::from("a/b.php"));
    }
}
