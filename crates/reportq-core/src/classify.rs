//! Interpretation of raw report API responses.
//!
//! Both classifiers are pure functions of the response they are given. The
//! fetch classifier is the single place that decides between "ready", "not
//! ready yet" and "rejected"; everything above it (single-shot fetch, the
//! poller) only maps its outcome.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::{RemoteError, ReportError};
use crate::method::ApiMethod;
use crate::report::{ReportData, ReportId};

/// Status the service answers `Report.Get` with while a report is pending or
/// when the request is rejected.
pub const NOT_READY_STATUS: u16 = 400;

/// Error name the service uses for a report that is still being generated.
pub const DEFAULT_NOT_READY_ERROR: &str = "report_not_ready";

/// Classified `Report.Get` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Ready(ReportData),
    NotReady(RemoteError),
    Rejected(RemoteError),
}

#[derive(Debug, Deserialize)]
struct QueueResponse {
    #[serde(rename = "reportID", deserialize_with = "integral_number")]
    report_id: i64,
}

/// Accept any JSON number with an integral value that fits in an `i64`,
/// including float forms such as `12345.0`.
fn integral_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    match number.as_f64() {
        Some(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(D::Error::custom(format!(
            "reportID {number} is not an integral 64-bit number"
        ))),
    }
}

/// Extract the identifier from a `Report.Queue` response body.
pub fn classify_queue(body: &str) -> Result<ReportId, ReportError> {
    let response: QueueResponse =
        serde_json::from_str(body).map_err(|source| ReportError::Decode {
            operation: ApiMethod::Queue,
            expected: "queue response",
            body: body.to_owned(),
            source,
        })?;

    Ok(ReportId::new(response.report_id))
}

/// Classify a `Report.Get` response.
///
/// Status 400 carries a structured error body; a body that does not decode is
/// reported with the raw text attached. Any other status is success and the
/// body is returned untouched.
pub fn classify_fetch(
    status: u16,
    body: &str,
    not_ready_error: &str,
) -> Result<FetchOutcome, ReportError> {
    if status != NOT_READY_STATUS {
        if !(200..300).contains(&status) {
            warn!(status, "Report.Get answered with an unexpected status; treating body as report");
        }
        return Ok(FetchOutcome::Ready(ReportData::new(body)));
    }

    // A `null` body decodes to an error with every field empty.
    let remote: RemoteError = serde_json::from_str::<Option<RemoteError>>(body)
        .map_err(|source| ReportError::Decode {
            operation: ApiMethod::Get,
            expected: "error structure",
            body: body.to_owned(),
            source,
        })?
        .unwrap_or_default();

    if remote.error == not_ready_error {
        Ok(FetchOutcome::NotReady(remote))
    } else {
        Ok(FetchOutcome::Rejected(remote))
    }
}
