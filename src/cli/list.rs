//! List command implementation
//!
//! This module implements the `commitgate list` command, which shows the
//! checks that would run and every configured rule with its set, kind,
//! match mode and severity.

use crate::cli::common::{EXIT_SUCCESS, config_exit_code};
use crate::config::OutputFormat;
use crate::engine::CheckPipeline;
use crate::error::ConfigError;
use crate::rules::{MatchMode, RuleRegistry, RuleSetKind};
use crate::types::Severity;
use serde::Serialize;
use std::path::Path;

/// Run the list command
///
/// Exit code:
/// - 0: Success
/// - 2: Configuration file missing or unreadable
/// - 3: Configuration does not parse or validate
pub fn run_list(format: Option<OutputFormat>, config: Option<&Path>) -> i32 {
    match run_list_inner(format, config) {
        Ok(output) => {
            print!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            config_exit_code(&e)
        }
    }
}

fn run_list_inner(format: Option<OutputFormat>, config: Option<&Path>) -> Result<String, ConfigError> {
    let config = super::common::load_config(config)?;
    let registry = RuleRegistry::build_from_config(&config.rules)?;
    let pipeline = CheckPipeline::from_config(&config, &registry)?;
    let stages: Vec<&str> = pipeline.stages().iter().map(|s| s.as_str()).collect();

    Ok(match format.unwrap_or(config.output.format) {
        OutputFormat::Human => format_human(&stages, &registry),
        OutputFormat::Jsonl => format_jsonl(&registry),
    })
}

fn format_human(stages: &[&str], registry: &RuleRegistry) -> String {
    let mut output = String::new();

    if stages.is_empty() {
        output.push_str("Checks: none\n");
    } else {
        output.push_str(&format!("Checks: {}\n", stages.join(", ")));
    }

    if registry.is_empty() {
        output.push_str("No rules are configured.\n");
        return output;
    }

    for set in registry.iter() {
        let scope = if set.extensions().is_empty() {
            "all files".to_string()
        } else {
            set.extensions().join(", ")
        };
        output.push_str(&format!(
            "\n{} ({}; {})\n",
            set.name(),
            set.kind().as_str(),
            scope
        ));
        for rule in set.rules() {
            output.push_str(&format!(
                "  {:<24} {:<6} {}\n",
                rule.id().as_str(),
                rule.mode().as_str(),
                rule.severity().as_str()
            ));
        }
    }

    output.push_str(&format!(
        "\n{} rule(s) in {} set(s)\n",
        registry.rule_count(),
        registry.len()
    ));
    output
}

#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    set: &'a str,
    kind: RuleSetKind,
    id: &'a str,
    mode: MatchMode,
    needle: &'a str,
    severity: Severity,
    extensions: &'a [String],
}

fn format_jsonl(registry: &RuleRegistry) -> String {
    let mut output = String::new();
    for set in registry.iter() {
        for rule in set.rules() {
            let record = RuleRecord {
                record_type: "rule",
                set: set.name(),
                kind: set.kind(),
                id: rule.id().as_str(),
                mode: rule.mode(),
                needle: rule.needle(),
                severity: rule.severity(),
                extensions: set.extensions(),
            };
            if let Ok(json) = serde_json::to_string(&record) {
                output.push_str(&json);
                output.push('\n');
            }
        }
    }
    output
}
