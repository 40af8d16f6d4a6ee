//! ApplyFix action.
//!
//! Applies the suggested fix of every unguarded update, wrapping its receiver
//! with the optimistic-lock wrapper. Used by the `optguard fix` command.

use anyhow::Result;

use super::operation::Operation;
use super::traits::{Action, ActionStats, execute_operations};
use crate::issues::UnguardedUpdateIssue;

/// Action to rewrite unguarded update receivers.
///
/// Issues without a suggested fix (chain strategy findings) are skipped.
pub struct ApplyFix;

impl Action<UnguardedUpdateIssue> for ApplyFix {
    fn to_operations(issues: &[UnguardedUpdateIssue]) -> Vec<Operation> {
        issues
            .iter()
            .filter_map(|issue| issue.fix.as_ref().map(|fix| (issue, fix)))
            .flat_map(|(issue, fix)| {
                fix.edits.iter().map(|edit| Operation::ReplaceSpan {
                    context: issue.context.clone(),
                    edit: edit.clone(),
                })
            })
            .collect()
    }

    /// Override run to count issues without a fix as skipped.
    fn run(issues: &[UnguardedUpdateIssue]) -> Result<ActionStats> {
        let ops = Self::to_operations(issues);
        let without_fix = issues.iter().filter(|issue| issue.fix.is_none()).count();

        let mut stats = execute_operations(&ops)?;
        stats.skipped += without_fix;
        Ok(stats)
    }
}
