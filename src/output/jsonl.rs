#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in input order:
//! 1. For each file, its finding records followed by one file record
//! 2. One status record

use crate::engine::{CheckKind, RunVerdict};
use crate::types::Severity;
use serde::Serialize;
use std::path::PathBuf;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format a run verdict as JSON Lines
    pub fn format(&self, verdict: &RunVerdict) -> String {
        let mut output = String::new();
        let mut total_findings = 0u64;

        for file in &verdict.files {
            for result in &file.results {
                for finding in &result.findings {
                    total_findings += 1;
                    push_record(
                        &mut output,
                        &FindingRecord {
                            record_type: "finding",
                            check: result.check,
                            rule: finding.rule_id.as_str(),
                            severity: finding.severity,
                            file: finding.file.clone(),
                            line: finding.location.map(|l| l.line),
                            column: finding.location.map(|l| l.column),
                            matched: &finding.matched_text,
                            message: &finding.message,
                        },
                    );
                }
            }

            push_record(
                &mut output,
                &FileRecord {
                    record_type: "file",
                    file: file.file.clone(),
                    passed: file.passed(),
                    checks: file
                        .results
                        .iter()
                        .map(|r| CheckRecord {
                            check: r.check,
                            passed: r.passed,
                            note: r.note.as_deref(),
                        })
                        .collect(),
                },
            );
        }

        push_record(
            &mut output,
            &StatusRecord {
                record_type: "status",
                passed: verdict.passed(),
                files_checked: verdict.files.len() as u64,
                files_failed: verdict.failed_files() as u64,
                total_findings,
            },
        );

        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_record(output: &mut String, record: &impl Serialize) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct FindingRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    check: CheckKind,
    rule: &'a str,
    severity: Severity,
    file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<u32>,
    matched: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct CheckRecord<'a> {
    check: CheckKind,
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FileRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    file: PathBuf,
    passed: bool,
    checks: Vec<CheckRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    files_checked: u64,
    files_failed: u64,
    total_findings: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CheckResult, FileVerdict};
    use crate::scan::{Finding, Location};
    use crate::types::RuleId;

    #[test]
    fn test_format_empty_run() {
        let output = JsonlFormatter::new().format(&RunVerdict::new());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 1);

        let status: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(status["type"], "status");
        assert_eq!(status["passed"], true);
        assert_eq!(status["files_checked"], 0);
        assert_eq!(status["total_findings"], 0);
    }

    #[test]
    fn test_format_findings_and_files() {
        let finding = Finding {
            rule_id: RuleId::new("console.log").unwrap(),
            severity: Severity::Error,
            file: PathBuf::from("web/app.js"),
            location: Some(Location {
                line: 1,
                column: 1,
                offset: 0,
            }),
            matched_text: "console.log".to_string(),
            message: "The use of console.log() is forbidden".to_string(),
        };
        let verdict: RunVerdict = vec![FileVerdict {
            file: PathBuf::from("web/app.js"),
            results: vec![
                CheckResult {
                    check: CheckKind::Construct,
                    passed: false,
                    findings: vec![finding],
                    note: None,
                },
                CheckResult {
                    check: CheckKind::Fix,
                    passed: false,
                    findings: vec![Finding::diagnostic("fix", "web/app.js", "eslint crashed")],
                    note: Some("operation error".to_string()),
                },
            ],
        }]
        .into_iter()
        .collect();

        let output = JsonlFormatter::new().format(&verdict);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);

        assert_eq!(lines[0]["type"], "finding");
        assert_eq!(lines[0]["check"], "construct");
        assert_eq!(lines[0]["rule"], "console.log");
        assert_eq!(lines[0]["severity"], "error");
        assert_eq!(lines[0]["line"], 1);
        assert_eq!(lines[0]["matched"], "console.log");

        assert_eq!(lines[1]["rule"], "fix");
        assert!(lines[1].get("line").is_none());

        assert_eq!(lines[2]["type"], "file");
        assert_eq!(lines[2]["passed"], false);
        assert_eq!(lines[2]["checks"][1]["note"], "operation error");

        assert_eq!(lines[3]["type"], "status");
        assert_eq!(lines[3]["passed"], false);
        assert_eq!(lines[3]["files_failed"], 1);
        assert_eq!(lines[3]["total_findings"], 2);
    }
}
