use std::process::ExitCode;

/// Exit status of an optguard command.
///
/// - `Success` (0): no unguarded update found, or every fix was applied
/// - `Failure` (1): unguarded updates found, or fixes pending in dry-run mode
/// - `Error` (2): files failed to parse, or the run aborted (config, I/O, fix synthesis)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
