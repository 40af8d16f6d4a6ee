//! Unguarded update detection rule.
//!
//! Converts the analyzer's diagnostics into issues with a display location.

use std::collections::HashMap;

use anyhow::Result;

use crate::{
    core::{
        AllDiagnostics, CheckContext, SourceContext, SourceLocation, analyzer::Strategy,
        parsers::go::ParsedGoFile,
    },
    issues::UnguardedUpdateIssue,
};

pub fn check_unguarded_update_issues(ctx: &CheckContext) -> Result<Vec<UnguardedUpdateIssue>> {
    let diagnostics = ctx.diagnostics()?;
    Ok(check_unguarded_update(
        diagnostics,
        ctx.parsed_files(),
        ctx.analyzer.strategy,
    ))
}

/// Attach line, column and source line to every diagnostic.
///
/// Only the first suggested fix of a diagnostic is kept.
pub fn check_unguarded_update(
    diagnostics: &AllDiagnostics,
    parsed_files: &HashMap<String, ParsedGoFile>,
    strategy: Strategy,
) -> Vec<UnguardedUpdateIssue> {
    let mut issues = Vec::new();

    for (file_path, file_diagnostics) in diagnostics {
        let Some(file) = parsed_files.get(file_path) else {
            continue;
        };
        for diagnostic in file_diagnostics {
            let (line, col) = file.line_col(diagnostic.position);
            let context = SourceContext::new(
                SourceLocation::new(file_path.as_str(), line, col),
                file.source_line(line),
            );
            issues.push(UnguardedUpdateIssue {
                context,
                position: diagnostic.position,
                message: diagnostic.message.clone(),
                strategy,
                fix: diagnostic.suggested_fixes.first().cloned(),
            });
        }
    }

    issues
}
