#![forbid(unsafe_code)]

//! Candidate filtering by extension and excluded locations

use crate::config::gate_toml::{GateMeta, is_glob};
use crate::error::CandidateError;
use crate::types::normalize_path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Decides which candidate files get checked
///
/// A path is kept when its extension is allowed and it is not excluded.
/// Exclude entries are path prefixes, or globs when they contain glob
/// metacharacters.
#[derive(Debug, Clone)]
pub struct FileSelector {
    extensions: Vec<String>,
    prefixes: Vec<String>,
    globs: Option<GlobSet>,
}

impl FileSelector {
    /// # Errors
    ///
    /// Returns `CandidateError::InvalidGlob` if an exclude glob is malformed.
    pub fn new(extensions: &[String], exclude: &[String]) -> Result<Self, CandidateError> {
        let extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        let mut prefixes = Vec::new();
        let mut builder = GlobSetBuilder::new();
        let mut has_globs = false;

        for entry in exclude {
            if is_glob(entry) {
                let glob = Glob::new(entry).map_err(|e| CandidateError::InvalidGlob {
                    pattern: entry.clone(),
                    source: e,
                })?;
                builder.add(glob);
                has_globs = true;
            } else {
                prefixes.push(normalize_path(entry));
            }
        }

        let globs = if has_globs {
            Some(builder.build().map_err(|e| CandidateError::InvalidGlob {
                pattern: "<globset>".to_string(),
                source: e,
            })?)
        } else {
            None
        };

        Ok(Self {
            extensions,
            prefixes,
            globs,
        })
    }

    pub fn from_config(gate: &GateMeta) -> Result<Self, CandidateError> {
        Self::new(&gate.extensions, &gate.exclude)
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        if !self.extensions.is_empty() {
            let allowed = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));
            if !allowed {
                return false;
            }
        }

        let normalized = normalize_path(&path.to_string_lossy());
        if self
            .prefixes
            .iter()
            .any(|prefix| normalized.starts_with(prefix.as_str()))
        {
            return false;
        }

        !self
            .globs
            .as_ref()
            .is_some_and(|globs| globs.is_match(&normalized))
    }

    /// Filter candidates, preserving their order
    pub fn select(&self, candidates: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
        candidates
            .into_iter()
            .filter(|path| self.is_selected(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_prefix_exclusion() {
        let selector = FileSelector::new(
            &strings(&["php", "module"]),
            &strings(&["web/modules/contrib/", "web/core/"]),
        )
        .unwrap();

        let kept = selector.select(paths(&[
            "web/modules/custom/a.module",
            "web/modules/contrib/x/x.module",
            "web/core/lib/Drupal.php",
            "./web/core/index.php",
            "web/themes/custom/t.theme",
        ]));
        assert_eq!(kept, paths(&["web/modules/custom/a.module"]));
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        let selector = FileSelector::new(&strings(&["php"]), &[]).unwrap();
        assert!(selector.is_selected(Path::new("a.php")));
        assert!(!selector.is_selected(Path::new("a.PHP")));
        assert!(!selector.is_selected(Path::new("Makefile")));
    }

    #[test]
    fn test_empty_allow_list_admits_everything() {
        let selector = FileSelector::new(&[], &strings(&["vendor/"])).unwrap();
        assert!(selector.is_selected(Path::new("README")));
        assert!(selector.is_selected(Path::new("src/a.rs")));
        assert!(!selector.is_selected(Path::new("vendor/a.rs")));
    }

    #[test]
    fn test_glob_exclusion() {
        let selector = FileSelector::new(&strings(&["js"]), &strings(&["**/*.min.js"])).unwrap();
        assert!(selector.is_selected(Path::new("web/app.js")));
        assert!(!selector.is_selected(Path::new("web/lib/jquery.min.js")));
    }

    #[test]
    fn test_order_is_preserved() {
        let selector = FileSelector::new(&strings(&["php"]), &[]).unwrap();
        let input = paths(&["c.php", "a.php", "b.txt", "b.php"]);
        assert_eq!(selector.select(input), paths(&["c.php", "a.php", "b.php"]));
    }

    #[test]
    fn test_invalid_glob() {
        let result = FileSelector::new(&[], &strings(&["web/{a"]));
        assert!(matches!(result, Err(CandidateError::InvalidGlob { .. })));
    }
}
