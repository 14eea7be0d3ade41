//! Client and poll configuration.

use std::time::Duration;

use crate::classify::DEFAULT_NOT_READY_ERROR;
use crate::error::ValidationError;

/// Default REST endpoint of the report service.
pub const DEFAULT_ENDPOINT: &str = "https://api.omniture.com/admin/1.4/rest/";

/// How the poller treats failures other than "not ready yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Rejections, undecodable bodies and transport errors are retried exactly
    /// like a not-ready answer. A report that can never become ready is
    /// polled until the poll is cancelled or a configured bound is hit.
    #[default]
    Retry,
    /// The first failure that is not "not ready" ends the poll.
    Stop,
}

/// Configuration of the fetch loop behind `report` and `start_polling`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between the end of one attempt and the start of the next.
    pub interval: Duration,
    /// Upper bound on fetch attempts. `None` polls without limit.
    pub max_attempts: Option<u32>,
    /// Upper bound on total time spent polling. `None` polls without limit.
    pub deadline: Option<Duration>,
    pub failure_policy: FailurePolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
            deadline: None,
            failure_policy: FailurePolicy::Retry,
        }
    }
}

impl PollConfig {
    /// Poll every `interval` without any bound.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Give up after `max_attempts` fetches.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Give up once `deadline` has elapsed since polling started.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Whether `attempts` fetches used up the attempt budget.
    pub fn attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval.is_zero() {
            return Err(ValidationError::ZeroPollInterval);
        }
        if self.max_attempts == Some(0) {
            return Err(ValidationError::ZeroMaxAttempts);
        }
        Ok(())
    }
}

/// Everything a [`ReportClient`](crate::client::ReportClient) needs besides
/// its transport and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST endpoint; the remote method is appended as `?method=<name>`.
    pub endpoint: String,
    /// Per-request timeout handed to the transport.
    pub timeout_ms: u64,
    /// Error name that marks a `Report.Get` rejection as "not ready yet".
    pub not_ready_error: String,
    pub poll: PollConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            timeout_ms: 30_000,
            not_ready_error: String::from(DEFAULT_NOT_READY_ERROR),
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_not_ready_error(mut self, name: impl Into<String>) -> Self {
        self.not_ready_error = name.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://"))
            || endpoint.contains(char::is_whitespace)
        {
            return Err(ValidationError::InvalidEndpoint {
                value: self.endpoint.clone(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        self.poll.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_polls_every_second_forever() {
        let config = ClientConfig::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.not_ready_error, "report_not_ready");
        assert_eq!(config.poll.interval, Duration::from_secs(1));
        assert_eq!(config.poll.max_attempts, None);
        assert_eq!(config.poll.deadline, None);
        assert_eq!(config.poll.failure_policy, FailurePolicy::Retry);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn attempt_budget_is_inclusive() {
        let poll = PollConfig::every(Duration::from_millis(10)).with_max_attempts(3);

        assert!(!poll.attempts_exhausted(2));
        assert!(poll.attempts_exhausted(3));
        assert!(!PollConfig::default().attempts_exhausted(u32::MAX));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert_eq!(
            ClientConfig::default().with_endpoint("ftp://example.test").validate(),
            Err(ValidationError::InvalidEndpoint {
                value: String::from("ftp://example.test")
            })
        );
        assert_eq!(
            ClientConfig::default().with_timeout_ms(0).validate(),
            Err(ValidationError::ZeroTimeout)
        );
        assert_eq!(
            ClientConfig::default()
                .with_poll(PollConfig::every(Duration::ZERO))
                .validate(),
            Err(ValidationError::ZeroPollInterval)
        );
        assert_eq!(
            ClientConfig::default()
                .with_poll(PollConfig::default().with_max_attempts(0))
                .validate(),
            Err(ValidationError::ZeroMaxAttempts)
        );
    }
}
