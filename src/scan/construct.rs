#![forbid(unsafe_code)]

//! Forbidden function and method call detection
//!
//! Two call shapes are recognized over a [`TokenStream`]:
//!
//! - method calls: `receiver SEPARATOR method (`, e.g. `console.log(` or
//!   `$node->dpm(`; the candidate is `lowercase(receiver + sep + method)`
//! - plain calls: `name (` not preceded by a separator or a declaration
//!   keyword; the candidate is `lowercase(name)`
//!
//! Whitespace and comments between the pieces are ignored.

use crate::lexer::{TokenKind, TokenStream, TRIVIA};
use crate::rules::{CallMatch, RuleRegistry, RuleSet, RuleSetKind};
use crate::scan::{Finding, Location};
use std::path::Path;
use tracing::trace;

/// Member-access operators that join a receiver and a method name
pub const SEPARATORS: &[&str] = &[".", "->", "?->", "::", "?."];

/// Identifiers that turn `name (` into a declaration or constructor
const NON_CALL_KEYWORDS: &[&str] = &["function", "new"];

/// Extensions of PHP sources, where `.` concatenates strings
const PHP_EXTENSIONS: &[&str] = &[
    "php", "module", "inc", "install", "theme", "profile", "test", "engine",
];

/// Message used when a rule carries no template of its own
pub const DEFAULT_CALL_MESSAGE: &str = "The use of {matched}() is forbidden";

/// Scanner for call-shaped token sequences
#[derive(Debug, Clone, Default)]
pub struct ForbiddenConstructScanner {
    plain: Vec<RuleSet>,
    method: Vec<RuleSet>,
}

impl ForbiddenConstructScanner {
    /// Build a scanner from call rule sets; text sets are ignored
    pub fn new(sets: impl IntoIterator<Item = RuleSet>) -> Self {
        let mut scanner = Self::default();
        for set in sets {
            match set.kind() {
                RuleSetKind::PlainCalls => scanner.plain.push(set),
                RuleSetKind::MethodCalls => scanner.method.push(set),
                RuleSetKind::Text => {}
            }
        }
        scanner
    }

    /// Build a scanner from every call rule set in the registry
    pub fn from_registry(registry: &RuleRegistry) -> Self {
        Self::new(registry.iter().cloned())
    }

    /// Whether no call rule sets are configured
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.method.is_empty()
    }

    /// Whether any call rule set applies to `path`
    pub fn applies_to(&self, path: &Path) -> bool {
        self.plain
            .iter()
            .chain(&self.method)
            .any(|set| set.applies_to(path))
    }

    /// Scan a token stream, returning findings in token order
    pub fn scan(&self, path: &Path, tokens: &TokenStream) -> Vec<Finding> {
        let plain: Vec<&RuleSet> = self.plain.iter().filter(|s| s.applies_to(path)).collect();
        let method: Vec<&RuleSet> = self.method.iter().filter(|s| s.applies_to(path)).collect();
        let dot_is_concat = is_php(path);
        let mut findings = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            let call = match token.kind {
                TokenKind::Operator if !method.is_empty() => {
                    method_call_at(tokens, index).map(|(at, candidate)| (at, candidate, &method))
                }
                TokenKind::Identifier if !plain.is_empty() => {
                    plain_call_at(tokens, index, dot_is_concat)
                        .map(|candidate| (index, candidate, &plain))
                }
                _ => None,
            };

            let Some((at, candidate, sets)) = call else {
                continue;
            };
            if let Some(finding) = finding_for(path, tokens, at, &candidate, sets) {
                findings.push(finding);
            }
        }

        findings
    }
}

/// Matching rule across `sets`, reported at the token `at`
///
/// Exact rules of every set are consulted before any regex rule; within
/// each phase the first set in configuration order wins.
fn finding_for(
    path: &Path,
    tokens: &TokenStream,
    at: usize,
    candidate: &str,
    sets: &[&RuleSet],
) -> Option<Finding> {
    let anchor = tokens.get(at)?;
    let (set, CallMatch { rule, matched }) = sets
        .iter()
        .find_map(|set| set.match_exact(candidate).map(|m| (set, m)))
        .or_else(|| {
            sets.iter()
                .find_map(|set| set.match_regex(candidate).map(|m| (set, m)))
        })?;

    trace!(
        rule_set = set.name(),
        rule = rule.id().as_str(),
        line = anchor.line,
        "forbidden call"
    );
    Some(Finding {
        rule_id: rule.id().clone(),
        severity: rule.severity(),
        file: path.to_path_buf(),
        location: Some(Location::from(anchor)),
        matched_text: matched.to_string(),
        message: rule.render_message(DEFAULT_CALL_MESSAGE, matched, path),
    })
}

fn is_php(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PHP_EXTENSIONS.contains(&ext))
}

/// If the operator at `index` is a separator in `Identifier SEP Identifier (`
/// shape, return the receiver index and the lowercased candidate.
fn method_call_at(tokens: &TokenStream, index: usize) -> Option<(usize, String)> {
    let separator = tokens.get(index)?;
    if !SEPARATORS.contains(&separator.text.as_str()) {
        return None;
    }

    let prev = tokens.prev_significant(index, TRIVIA)?;
    let next = tokens.next_significant(index, TRIVIA)?;
    let after_next = tokens.next_significant(next, TRIVIA)?;

    let receiver = tokens.get(prev)?;
    let method = tokens.get(next)?;
    if !receiver.is(TokenKind::Identifier)
        || !method.is(TokenKind::Identifier)
        || !tokens.get(after_next)?.is(TokenKind::OpenParen)
    {
        return None;
    }

    let candidate = format!("{}{}{}", receiver.text, separator.text, method.text).to_lowercase();
    Some((prev, candidate))
}

/// If the identifier at `index` is a bare call, return the lowercased name.
///
/// With `dot_is_concat` a preceding `.` is string concatenation, so
/// `'x' . print_r($y)` is still a call.
fn plain_call_at(tokens: &TokenStream, index: usize, dot_is_concat: bool) -> Option<String> {
    let name = tokens.get(index)?;
    let next = tokens.next_significant(index, TRIVIA)?;
    if !tokens.get(next)?.is(TokenKind::OpenParen) {
        return None;
    }

    if let Some(prev) = tokens.prev_significant(index, TRIVIA).and_then(|i| tokens.get(i)) {
        let is_keyword = prev.is(TokenKind::Identifier)
            && NON_CALL_KEYWORDS
                .iter()
                .any(|kw| prev.text.eq_ignore_ascii_case(kw));
        let is_separator = prev.is(TokenKind::Operator)
            && SEPARATORS.contains(&prev.text.as_str())
            && !(dot_is_concat && prev.text == ".");
        if is_keyword || is_separator {
            return None;
        }
    }

    Some(name.text.to_lowercase())
}
