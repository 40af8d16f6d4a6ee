//! Fix command - Wrap unguarded update receivers with the optimistic-lock wrapper.
//!
//! Only findings of the types strategy carry a fix. Chain strategy findings
//! are listed as unfixable.
//!
//! Use `--apply` to actually rewrite files (default is dry-run mode).

use std::collections::HashSet;

use anyhow::Result;
use colored::Colorize;

use super::super::{
    actions::{Action, ActionStats, ApplyFix},
    args::FixCommand,
    exit_status::ExitStatus,
    report::{self, FAILURE_MARK},
};
use crate::{
    core::CheckContext, issues::UnguardedUpdateIssue, rules::check_unguarded_update_issues,
};

pub fn fix(cmd: FixCommand, verbose: bool) -> Result<ExitStatus> {
    let args = &cmd.args;
    let ctx = CheckContext::new(&args.common)?;
    let apply = args.apply;

    let issues: Vec<UnguardedUpdateIssue> = check_unguarded_update_issues(&ctx)?;
    let (fixable, unfixable): (Vec<&UnguardedUpdateIssue>, Vec<&UnguardedUpdateIssue>) =
        issues.iter().partition(|issue| issue.fix.is_some());

    if issues.is_empty() {
        report::print_success(ctx.files.len());
    } else {
        if !unfixable.is_empty() {
            print_unfixable(&unfixable);
        }

        if apply {
            let stats = if fixable.is_empty() {
                ActionStats::default()
            } else {
                ApplyFix::run(&issues)?
            };
            if stats.changes_applied > 0 {
                println!(
                    "{} {} call(s) in {} file(s) (processed {} issue(s)).",
                    "Wrapped".green().bold(),
                    stats.changes_applied,
                    stats.files_modified,
                    issues.len()
                );
            }
            let overlapping = stats.skipped.saturating_sub(unfixable.len());
            if overlapping > 0 {
                println!(
                    "  - skipped: {} overlapping fix(es), run again to apply them",
                    overlapping
                );
            }
        } else if !fixable.is_empty() {
            ApplyFix::preview(&issues);
            let files: HashSet<&str> = fixable.iter().map(|i| i.context.file_path()).collect();
            println!(
                "{} {} call(s) in {} file(s).",
                "Would wrap".yellow().bold(),
                fixable.len(),
                files.len()
            );
            println!("Run with {} to rewrite these files.", "--apply".cyan());
        }
    }

    let parse_error_count = ctx.parsed_files_errors().len();
    report::print_parse_warning(parse_error_count, verbose);

    // In dry-run mode, pending fixes are a "Failure" to signal there's work to do.
    // Unfixable findings remain a failure after --apply.
    if parse_error_count > 0 {
        Ok(ExitStatus::Error)
    } else if (!apply && !issues.is_empty()) || !unfixable.is_empty() {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

fn print_unfixable(issues: &[&UnguardedUpdateIssue]) {
    println!(
        "{} Cannot fix {} update(s) automatically (no suggested fix with the {} strategy):",
        FAILURE_MARK.red(),
        issues.len(),
        issues
            .first()
            .map(|i| i.strategy.to_string())
            .unwrap_or_default()
    );
    println!();

    for issue in issues {
        let ctx = &issue.context;
        println!(
            "  {} {}:{}:{}",
            "-->".blue(),
            ctx.file_path(),
            ctx.line(),
            ctx.col()
        );
        println!("     {}", "|".blue());
        println!(
            " {:>3} {} {}",
            ctx.line().to_string().blue(),
            "|".blue(),
            ctx.source_line
        );
        println!();
    }
}
