use anyhow::Result;

use super::CommandResult;
use crate::{core::CheckContext, issues::Issue, rules::check_unguarded_update_issues};

/// All issues of a context: unguarded updates plus parse errors.
pub fn collect_issues(ctx: &CheckContext) -> Result<Vec<Issue>> {
    let mut issues: Vec<Issue> = check_unguarded_update_issues(ctx)?
        .into_iter()
        .map(Issue::UnguardedUpdate)
        .collect();
    issues.extend(
        ctx.parsed_files_errors()
            .iter()
            .map(|i| Issue::ParseError(i.clone())),
    );
    Ok(issues)
}

pub fn finish(mut issues: Vec<Issue>, source_files_checked: usize) -> CommandResult {
    issues.sort();

    let parse_error_count = issues
        .iter()
        .filter(|i| matches!(i, Issue::ParseError(_)))
        .count();

    CommandResult {
        issues,
        parse_error_count,
        source_files_checked,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::exit_status::ExitStatus;
    use crate::core::analyzer::Strategy;
    use crate::core::{SourceContext, SourceLocation};
    use crate::issues::{ParseErrorIssue, UnguardedUpdateIssue};

    fn unguarded(strategy: Strategy) -> Issue {
        Issue::UnguardedUpdate(UnguardedUpdateIssue {
            context: SourceContext::new(SourceLocation::new("./a.go", 3, 2), "\tq.Exec(ctx)"),
            position: 20,
            message: "bun.UpdateQuery must wrap with bunwithoptimistic.WithOptimistic".to_string(),
            strategy,
            fix: None,
        })
    }

    fn parse_error() -> Issue {
        Issue::ParseError(ParseErrorIssue {
            file_path: "./b.go".to_string(),
            error: "Syntax error".to_string(),
        })
    }

    #[test]
    fn test_finish_counts() {
        let result = finish(
            vec![parse_error(), unguarded(Strategy::Types), unguarded(Strategy::Chain)],
            4,
        );

        assert_eq!(result.parse_error_count, 1);
        assert_eq!(result.issues.len(), 3);
        assert_eq!(result.source_files_checked, 4);
        assert!(matches!(result.issues[0], Issue::UnguardedUpdate(_)));
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(finish(Vec::new(), 1).exit_status(), ExitStatus::Success);
        assert_eq!(
            finish(vec![unguarded(Strategy::Chain)], 1).exit_status(),
            ExitStatus::Failure
        );
        assert_eq!(
            finish(vec![unguarded(Strategy::Types), parse_error()], 1).exit_status(),
            ExitStatus::Error
        );
    }
}
