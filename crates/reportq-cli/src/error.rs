use reportq_core::{PollError, ReportError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] reportq_core::ValidationError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("timestamp formatting failed: {0}")]
    TimeFormat(#[from] time::error::Format),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Report(error) => match error {
                ReportError::Validation(_) => 2,
                ReportError::Remote(_) | ReportError::NotReady(_) => 3,
                ReportError::Decode { .. } => 4,
                ReportError::Transport(_) => 6,
            },
            Self::Poll(_) => 7,
            Self::Serialization(_) => 4,
            Self::TimeFormat(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
