#![forbid(unsafe_code)]

//! Human-readable report for terminals
//!
//! Only failing checks and non-error findings are detailed; passing files are
//! summarized in the final line.

use crate::config::ColorOption;
use crate::engine::{CheckResult, FileVerdict, RunVerdict};
use crate::scan::Finding;
use crate::types::Severity;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Map the configured color option onto a termcolor choice for stderr
pub fn color_choice(option: ColorOption) -> ColorChoice {
    match option {
        ColorOption::Always => ColorChoice::Always,
        ColorOption::Never => ColorChoice::Never,
        ColorOption::Auto if io::stderr().is_terminal() => ColorChoice::Auto,
        ColorOption::Auto => ColorChoice::Never,
    }
}

/// Human-readable formatter
pub struct HumanFormatter {
    color: ColorChoice,
}

impl HumanFormatter {
    pub fn new(color: ColorOption) -> Self {
        Self {
            color: color_choice(color),
        }
    }

    /// Print the report to stderr
    pub fn print(&self, verdict: &RunVerdict) -> io::Result<()> {
        let mut stream = StandardStream::stderr(self.color);
        self.write(verdict, &mut stream)
    }

    pub fn write(&self, verdict: &RunVerdict, out: &mut impl WriteColor) -> io::Result<()> {
        for file in &verdict.files {
            write_file(file, out)?;
        }

        let total = verdict.files.len();
        if verdict.passed() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "Check PASSED")?;
            out.reset()?;
            writeln!(out, ": {} file(s) checked", total)?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "Check FAILED")?;
            out.reset()?;
            writeln!(
                out,
                ": {} of {} file(s) failed",
                verdict.failed_files(),
                total
            )?;
        }
        Ok(())
    }
}

fn write_file(file: &FileVerdict, out: &mut impl WriteColor) -> io::Result<()> {
    let shown: Vec<&CheckResult> = file
        .results
        .iter()
        .filter(|r| !r.passed || !r.findings.is_empty())
        .collect();
    if shown.is_empty() {
        return Ok(());
    }

    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "{}", file.file.display())?;
    out.reset()?;

    for result in shown {
        let (mark, color) = if result.passed {
            ("✓", Color::Yellow)
        } else {
            ("✗", Color::Red)
        };
        write!(out, "  ")?;
        out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(out, "{} {}", mark, result.check)?;
        out.reset()?;
        match &result.note {
            Some(note) => writeln!(out, ": {}", note)?,
            None => writeln!(out)?,
        }

        for finding in &result.findings {
            write_finding(finding, out)?;
        }
    }
    writeln!(out)
}

fn write_finding(finding: &Finding, out: &mut impl WriteColor) -> io::Result<()> {
    let (label, color) = match finding.severity {
        Severity::Error => ("error", Color::Red),
        Severity::Warning => ("warning", Color::Yellow),
    };

    write!(out, "      ")?;
    if let Some(location) = finding.location {
        write!(out, "{}:{} ", location.line, location.column)?;
    }
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    write!(out, "{}", label)?;
    out.reset()?;

    let mut lines = finding.message.lines();
    writeln!(
        out,
        " [{}] {}",
        finding.rule_id,
        lines.next().unwrap_or_default()
    )?;
    for line in lines {
        writeln!(out, "        {}", line)?;
    }
    Ok(())
}
