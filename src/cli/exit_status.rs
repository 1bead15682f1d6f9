use std::process::ExitCode;

/// Exit status of a strsync command.
///
/// - `Success` (0): completed, up to date, or dry run
/// - `Failure` (1): stopped by a gate (blocked diff, declined deletion)
/// - `Error` (2): configuration, fetch or publish failure
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// A gate stopped the run before anything was written.
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
