//! Issue types for optimistic-lock analysis results.
//!
//! Each issue is self-contained with all information needed by:
//! - Reporter: to display the issue to users (text or JSON)
//! - Action: to fix the issue (wrap the receiver of an update)

use enum_dispatch::enum_dispatch;

use crate::core::SourceContext;
use crate::core::analyzer::{Strategy, SuggestedFix};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    UnguardedUpdate,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::UnguardedUpdate => write!(f, "unguarded-update"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Update executed without passing through the optimistic-lock wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnguardedUpdateIssue {
    pub context: SourceContext,
    /// Byte offset of the diagnostic in the file.
    pub position: usize,
    pub message: String,
    /// Strategy that produced the finding.
    pub strategy: Strategy,
    /// Rewrite wrapping the receiver. Only the types strategy builds one.
    pub fix: Option<SuggestedFix>,
}

impl UnguardedUpdateIssue {
    /// Type-resolved findings are proven; chain findings are a heuristic.
    pub fn severity(&self) -> Severity {
        match self.strategy {
            Strategy::Types => Severity::Error,
            Strategy::Chain => Severity::Warning,
        }
    }

    pub fn rule() -> Rule {
        Rule::UnguardedUpdate
    }
}

/// File could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// An issue found during analysis.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    UnguardedUpdate(UnguardedUpdateIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::UnguardedUpdate(issue) => issue.severity(),
            Issue::ParseError(_) => ParseErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::UnguardedUpdate(_) => UnguardedUpdateIssue::rule(),
            Issue::ParseError(_) => ParseErrorIssue::rule(),
        }
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// Source code location (has source_line for context display).
    Source(&'a SourceContext),
    /// File-level only (for ParseError - no line context).
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Uses `enum_dispatch` for zero-cost dispatch on the `Issue` enum.
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    /// Severity level.
    fn report_severity(&self) -> Severity;

    /// Rule identifier.
    fn report_rule(&self) -> Rule;

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<String> {
        None
    }
}

impl Report for UnguardedUpdateIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source(&self.context)
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn report_severity(&self) -> Severity {
        self.severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn hint(&self) -> Option<String> {
        let edit = self.fix.as_ref()?.edits.first()?;
        Some(format!("wrap the receiver: {}", edit.new_text))
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Issue {
    fn sort_file_path(&self) -> &str {
        match self.location() {
            ReportLocation::Source(ctx) => &ctx.location.file_path,
            ReportLocation::File { path } => path,
        }
    }

    fn sort_line(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.line,
            ReportLocation::File { .. } => 0,
        }
    }

    fn sort_col(&self) -> usize {
        match self.location() {
            ReportLocation::Source(ctx) => ctx.location.col,
            ReportLocation::File { .. } => 0,
        }
    }
}

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: file_path, line, col, rule, message
        self.sort_file_path()
            .cmp(other.sort_file_path())
            .then_with(|| self.sort_line().cmp(&other.sort_line()))
            .then_with(|| self.sort_col().cmp(&other.sort_col()))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::SourceLocation;
    use crate::core::analyzer::TextEdit;
    use crate::issues::*;

    fn unguarded(path: &str, line: usize, col: usize, strategy: Strategy) -> UnguardedUpdateIssue {
        let loc = SourceLocation::new(path, line, col);
        let ctx = SourceContext::new(loc, "\tdb.NewUpdate().Model(u).Exec(ctx)");
        UnguardedUpdateIssue {
            context: ctx,
            position: 42,
            message: "bun.UpdateQuery must wrap with bunwithoptimistic.WithOptimistic".to_string(),
            strategy,
            fix: None,
        }
    }

    #[test]
    fn test_unguarded_update_severity_follows_strategy() {
        assert_eq!(
            unguarded("a.go", 1, 1, Strategy::Types).severity(),
            Severity::Error
        );
        assert_eq!(
            unguarded("a.go", 1, 1, Strategy::Chain).severity(),
            Severity::Warning
        );
        assert_eq!(UnguardedUpdateIssue::rule(), Rule::UnguardedUpdate);
    }

    #[test]
    fn test_unguarded_update_hint_shows_rewrite() {
        let mut issue = unguarded("a.go", 6, 26, Strategy::Types);
        assert_eq!(issue.hint(), None);

        issue.fix = Some(SuggestedFix {
            message: "Wrap with bunwithoptimistic.WithOptimistic".to_string(),
            edits: vec![TextEdit {
                start: 10,
                end: 34,
                new_text: "bunwithoptimistic.WithOptimistic(db.NewUpdate().Model(u))".to_string(),
            }],
        });
        assert_eq!(
            issue.hint().as_deref(),
            Some("wrap the receiver: bunwithoptimistic.WithOptimistic(db.NewUpdate().Model(u))")
        );
    }

    #[test]
    fn test_parse_error_issue() {
        let issue = ParseErrorIssue {
            file_path: "./internal/broken.go".to_string(),
            error: "Syntax error at line 5, column 8".to_string(),
        };

        assert_eq!(ParseErrorIssue::severity(), Severity::Error);
        assert_eq!(ParseErrorIssue::rule(), Rule::ParseError);
        assert_eq!(issue.message(), "Syntax error at line 5, column 8");
        assert!(matches!(
            issue.location(),
            ReportLocation::File { path: "./internal/broken.go" }
        ));
    }

    #[test]
    fn test_issue_enum_dispatch() {
        let issue = Issue::UnguardedUpdate(unguarded("a.go", 3, 4, Strategy::Chain));
        assert_eq!(issue.severity(), Severity::Warning);
        assert_eq!(issue.rule(), Rule::UnguardedUpdate);
        assert_eq!(issue.report_rule(), Rule::UnguardedUpdate);
    }

    #[test]
    fn test_issue_ordering() {
        let mut issues = vec![
            Issue::UnguardedUpdate(unguarded("b.go", 1, 1, Strategy::Types)),
            Issue::UnguardedUpdate(unguarded("a.go", 10, 2, Strategy::Types)),
            Issue::ParseError(ParseErrorIssue {
                file_path: "a.go".to_string(),
                error: "broken".to_string(),
            }),
            Issue::UnguardedUpdate(unguarded("a.go", 3, 9, Strategy::Types)),
        ];
        issues.sort();

        let order: Vec<(String, usize)> = issues
            .iter()
            .map(|i| (i.sort_file_path().to_string(), i.sort_line()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.go".to_string(), 0),
                ("a.go".to_string(), 3),
                ("a.go".to_string(), 10),
                ("b.go".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::UnguardedUpdate.to_string(), "unguarded-update");
        assert_eq!(Rule::ParseError.to_string(), "parse-error");
    }
}
