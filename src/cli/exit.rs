use std::process::ExitCode;

use super::CliError;

/// Process exit status of one CLI invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command succeeded
    Success,
    /// The usecase or command execution failed
    Failure,
    /// The command line did not match any command contract
    Usage,
    /// The operator cancelled an interactive session
    Cancelled,
}

impl ExitStatus {
    /// Numeric process exit code
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Usage => 2,
            ExitStatus::Cancelled => 130,
        }
    }
}

impl From<&CliError> for ExitStatus {
    fn from(error: &CliError) -> Self {
        match error {
            CliError::CommandNotFound(_)
            | CliError::MissingArguments { .. }
            | CliError::InvalidArguments(_) => ExitStatus::Usage,
            CliError::Cancelled => ExitStatus::Cancelled,
            CliError::InvalidDescriptor(_)
            | CliError::ConfigError(_)
            | CliError::Usecase(_)
            | CliError::Setup(_)
            | CliError::IoError(_) => ExitStatus::Failure,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
