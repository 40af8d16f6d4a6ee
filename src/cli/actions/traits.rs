//! Action trait definition.
//!
//! Actions convert Issues into Operations. Each Action can be implemented
//! for multiple Issue types, providing type-safe handling.

use std::collections::HashSet;

use anyhow::Result;

use super::operation::{Operation, apply_edits_to_file, group_by_file};

/// Statistics from running an action.
#[derive(Debug, Clone, Default)]
pub struct ActionStats {
    /// Number of issues processed.
    pub processed: usize,
    /// Number of issues skipped (no fix, or overlapping another fix).
    pub skipped: usize,
    /// Number of changes actually applied to files.
    pub changes_applied: usize,
    /// Number of files modified.
    pub files_modified: usize,
}

impl std::ops::AddAssign for ActionStats {
    fn add_assign(&mut self, other: Self) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.changes_applied += other.changes_applied;
        self.files_modified += other.files_modified;
    }
}

/// Action trait - converts Issues into Operations and executes them.
///
/// ```ignore
/// if apply {
///     ApplyFix::run(&issues)?;
/// } else {
///     ApplyFix::preview(&issues);
/// }
/// ```
pub trait Action<I> {
    /// Convert issues to low-level operations.
    ///
    /// This is the only method that must be implemented.
    fn to_operations(issues: &[I]) -> Vec<Operation>;

    /// Execute the action (modify files).
    fn run(issues: &[I]) -> Result<ActionStats> {
        let ops = Self::to_operations(issues);
        execute_operations(&ops)
    }

    /// Preview the action (dry-run mode).
    fn preview(issues: &[I]) {
        let ops = Self::to_operations(issues);
        for op in &ops {
            op.preview();
        }
    }
}

pub(crate) fn execute_operations(ops: &[Operation]) -> Result<ActionStats> {
    let mut files_modified: HashSet<&str> = HashSet::new();
    let mut changes_applied = 0;
    let mut skipped = 0;

    for (file_path, edits) in group_by_file(ops) {
        let stats = apply_edits_to_file(file_path, &edits)?;
        if stats.applied > 0 {
            changes_applied += stats.applied;
            files_modified.insert(file_path);
        }
        skipped += stats.skipped;
    }

    Ok(ActionStats {
        processed: ops.len(),
        skipped,
        changes_applied,
        files_modified: files_modified.len(),
    })
}
