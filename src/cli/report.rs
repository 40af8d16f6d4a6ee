//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style text or as a JSON array. Kept apart
//! from the core logic so optguard can be used as a library.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::core::analyzer::SuggestedFix;
use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to stdout.
pub fn report(issues: &[Issue]) {
    report_to(issues, &mut io::stdout().lock());
}

/// Print issues to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no issues are found.
pub fn print_success(source_files: usize) {
    print_success_to(source_files, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(source_files: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} Go {} - no issues found",
            source_files,
            if source_files == 1 { "file" } else { "files" }
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning(count: usize, verbose: bool) {
    print_parse_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a parse warning to a custom writer.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// One finding in the JSON output.
#[derive(Debug, Serialize)]
struct JsonIssue<'a> {
    file: &'a str,
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
    rule: String,
    severity: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a SuggestedFix>,
}

impl<'a> JsonIssue<'a> {
    fn new(issue: &'a Issue) -> Self {
        let (file, line, column, _) = extract_location_info(issue.location());
        let (offset, fix) = match issue {
            Issue::UnguardedUpdate(issue) => (Some(issue.position), issue.fix.as_ref()),
            Issue::ParseError(_) => (None, None),
        };
        Self {
            file,
            line,
            column,
            offset,
            rule: issue.report_rule().to_string(),
            severity: issue.report_severity().to_string(),
            message: issue.message(),
            fix,
        }
    }
}

/// Print issues as a pretty JSON array to stdout.
pub fn report_json(issues: &[Issue]) -> Result<()> {
    report_json_to(issues, &mut io::stdout().lock())
}

/// Print issues as a pretty JSON array to a custom writer.
pub fn report_json_to<W: Write>(issues: &[Issue], writer: &mut W) -> Result<()> {
    let mut sorted = issues.to_vec();
    sorted.sort();
    let entries: Vec<JsonIssue> = sorted.iter().map(JsonIssue::new).collect();
    serde_json::to_writer_pretty(&mut *writer, &entries)?;
    writeln!(writer)?;
    Ok(())
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let (file_path, line, col, source_line) = extract_location_info(issue.location());

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col
    if source_line.is_some() {
        let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), file_path, line, col);
    } else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
    }

    if let Some(source_line) = source_line {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // col is 1-based and counts characters; leading tabs are echoed as-is
        let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
        let tabs = leading_tabs(&prefix);
        let caret_padding = UnicodeWidthStr::width(&prefix[tabs.len()..]);
        let _ = writeln!(
            writer,
            "{:>width$} {} {}{:>padding$}{}",
            "",
            "|".blue(),
            tabs,
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

/// Leading tab characters of `prefix`, so the caret lines up under Go's tab indentation.
fn leading_tabs(prefix: &str) -> &str {
    let end = prefix.len() - prefix.trim_start_matches('\t').len();
    &prefix[..end]
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            if total_problems == 1 { "problem" } else { "problems" },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn extract_location_info<'a>(loc: ReportLocation<'a>) -> (&'a str, usize, usize, Option<&'a str>) {
    match loc {
        ReportLocation::Source(ctx) => (
            ctx.file_path(),
            ctx.line(),
            ctx.col(),
            Some(&ctx.source_line),
        ),
        ReportLocation::File { path } => (path, 0, 0, None),
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| match i.location() {
            ReportLocation::Source(ctx) => Some(ctx.line()),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}
