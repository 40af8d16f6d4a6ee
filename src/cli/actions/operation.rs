//! Low-level file operations produced by actions.

use std::{collections::BTreeMap, fs};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use crate::core::{SourceContext, analyzer::TextEdit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace a byte span of a source file.
    ReplaceSpan {
        context: SourceContext,
        edit: TextEdit,
    },
}

impl Operation {
    pub fn file_path(&self) -> &str {
        match self {
            Operation::ReplaceSpan { context, .. } => context.file_path(),
        }
    }

    /// Print what the operation would change.
    pub fn preview(&self) {
        match self {
            Operation::ReplaceSpan { context, edit } => {
                println!(
                    "  {} {}:{}:{}",
                    "-->".blue(),
                    context.file_path(),
                    context.line(),
                    context.col()
                );
                println!("     {}", "|".blue());
                println!(
                    " {:>3} {} {}",
                    context.line().to_string().blue(),
                    "|".blue(),
                    context.source_line
                );
                println!("     {} {}", "+".green(), edit.new_text.green());
                println!();
            }
        }
    }
}

/// Outcome of applying the operations of one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileEditStats {
    pub applied: usize,
    pub skipped: usize,
}

/// Apply all span replacements of a single file, back to front.
///
/// An edit that overlaps one already applied, or whose span is not valid for
/// the file's current content, is skipped.
pub fn apply_edits_to_file(file_path: &str, edits: &[&TextEdit]) -> Result<FileEditStats> {
    let mut content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path))?;

    let mut stats = FileEditStats::default();
    let applied = apply_edits(&mut content, edits, &mut stats);

    if applied {
        fs::write(file_path, &content)
            .with_context(|| format!("Failed to write file: {}", file_path))?;
    }
    debug!(file = file_path, applied = stats.applied, skipped = stats.skipped, "edits applied");

    Ok(stats)
}

fn apply_edits(content: &mut String, edits: &[&TextEdit], stats: &mut FileEditStats) -> bool {
    let mut sorted: Vec<&TextEdit> = edits.to_vec();
    sorted.sort_by(|a, b| b.start.cmp(&a.start).then_with(|| b.end.cmp(&a.end)));
    sorted.dedup();

    let mut lowest_start = usize::MAX;
    for edit in sorted {
        let in_bounds = edit.start <= edit.end
            && content.is_char_boundary(edit.start)
            && edit.end <= content.len()
            && content.is_char_boundary(edit.end);
        if !in_bounds || edit.end > lowest_start {
            stats.skipped += 1;
            continue;
        }
        content.replace_range(edit.start..edit.end, &edit.new_text);
        lowest_start = edit.start;
        stats.applied += 1;
    }

    stats.applied > 0
}

/// Group replacement operations by file, in path order.
pub fn group_by_file(ops: &[Operation]) -> BTreeMap<&str, Vec<&TextEdit>> {
    let mut by_file: BTreeMap<&str, Vec<&TextEdit>> = BTreeMap::new();
    for op in ops {
        match op {
            Operation::ReplaceSpan { edit, .. } => {
                by_file.entry(op.file_path()).or_default().push(edit);
            }
        }
    }
    by_file
}
