use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::HttpError;
use crate::method::ApiMethod;
use crate::report::ReportId;

/// Input and configuration errors caught before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("report definition cannot be empty")]
    EmptyDefinition,
    #[error("endpoint must be an http(s) URL: '{value}'")]
    InvalidEndpoint { value: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("max_attempts must be greater than zero when set")]
    ZeroMaxAttempts,
}

/// Well-formed rejection returned by the report service with status 400.
///
/// Missing fields decode as empty strings; only a body that is not a JSON
/// object at all fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error_description}")]
#[serde(default)]
pub struct RemoteError {
    /// Short machine-readable name, e.g. `report_not_ready`.
    pub error: String,
    pub error_description: String,
    pub error_uri: String,
}

impl RemoteError {
    pub fn new(
        error: impl Into<String>,
        error_description: impl Into<String>,
        error_uri: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            error_description: error_description.into(),
            error_uri: error_uri.into(),
        }
    }
}

/// Failure of a single queue or fetch call.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(#[source] HttpError),

    #[error("{operation} returned '{body}'; error attempting to decode {expected}: {source}")]
    Decode {
        operation: ApiMethod,
        expected: &'static str,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Remote(RemoteError),

    #[error("{0}")]
    NotReady(RemoteError),
}

impl ReportError {
    /// The service rejected the call with a structured error body.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(error) | Self::NotReady(error) => Some(error),
            _ => None,
        }
    }

    /// The report exists but is still being generated.
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }

    /// Infrastructure failure rather than an answer from the service.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<HttpError> for ReportError {
    fn from(error: HttpError) -> Self {
        Self::Transport(error)
    }
}

/// Terminal outcome of a poll that never delivered its report.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("polling for report {id} was cancelled after {attempts} attempt(s)")]
    Cancelled { id: ReportId, attempts: u32 },

    #[error("report {id} was not delivered after {attempts} attempt(s): {last_error}")]
    AttemptsExhausted {
        id: ReportId,
        attempts: u32,
        #[source]
        last_error: ReportError,
    },

    #[error("report {id} was not delivered within {elapsed:?} ({attempts} attempt(s))")]
    DeadlineElapsed {
        id: ReportId,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("polling for report {id} stopped after {attempts} attempt(s): {error}")]
    Failed {
        id: ReportId,
        attempts: u32,
        #[source]
        error: ReportError,
    },

    #[error("poll task for report {id} ended abnormally: {message}")]
    Aborted { id: ReportId, message: String },
}

impl PollError {
    pub const fn report_id(&self) -> ReportId {
        match self {
            Self::Cancelled { id, .. }
            | Self::AttemptsExhausted { id, .. }
            | Self::DeadlineElapsed { id, .. }
            | Self::Failed { id, .. }
            | Self::Aborted { id, .. } => *id,
        }
    }
}
