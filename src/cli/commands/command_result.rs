use super::super::exit_status::ExitStatus;
use crate::issues::Issue;

/// Result of running an analysis command.
#[derive(Debug)]
pub struct CommandResult {
    /// All issues found, sorted for display.
    pub issues: Vec<Issue>,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
    /// Number of Go files that were checked.
    pub source_files_checked: usize,
}

impl CommandResult {
    /// Parse errors take precedence over findings.
    pub fn exit_status(&self) -> ExitStatus {
        if self.parse_error_count > 0 {
            ExitStatus::Error
        } else if self.issues.is_empty() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}
