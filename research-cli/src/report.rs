//! Report files written by the CLI

use anyhow::Context;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Width of the `=` rule under the heading
pub const RULE_WIDTH: usize = 80;

/// Characters of the report echoed after a `research` run
pub const PREVIEW_CHARS: usize = 500;

/// `research_report_YYYYmmdd_HHMMSS.txt` for `now`
pub fn default_report_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("research_report_{}.txt", now.format("%Y%m%d_%H%M%S")))
}

/// Local wall-clock time as written in the `Generated on:` line
pub fn generated_on(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Heading line, optional timestamp line, the rule, a blank line, then the report.
pub fn render_report(heading: &str, generated_on: Option<&str>, report: &str) -> String {
    let mut out = String::with_capacity(heading.len() + report.len() + RULE_WIDTH + 64);
    out.push_str(heading);
    out.push('\n');
    if let Some(at) = generated_on {
        out.push_str("Generated on: ");
        out.push_str(at);
        out.push('\n');
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");
    out.push_str(report);
    out
}

pub fn write_report(
    path: &Path,
    heading: &str,
    generated_on: Option<&str>,
    report: &str,
) -> anyhow::Result<()> {
    std::fs::write(path, render_report(heading, generated_on, report))
        .with_context(|| format!("failed to write report to {}", path.display()))
}

/// First `limit` characters, with `...` appended only when something was cut.
pub fn preview(report: &str, limit: usize) -> String {
    match report.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &report[..cut]),
        None => report.to_string(),
    }
}
