//! Fixed-interval polling of a queued report.
//!
//! One poll runs per report, on its own tokio task, and owns the report id
//! and the delivery callback for its whole life. Polls share nothing but the
//! client's transport.
//!
//! | Fetch result | [`FailurePolicy::Retry`] | [`FailurePolicy::Stop`] |
//! |--------------|--------------------------|-------------------------|
//! | ready | deliver, finish | deliver, finish |
//! | not ready | sleep, retry | sleep, retry |
//! | rejected / undecodable / transport | sleep, retry | finish with [`PollError::Failed`] |
//!
//! `max_attempts`, `deadline` and [`ReportHandle::cancel`] end the poll in
//! every case.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::FetchOutcome;
use crate::client::ReportClient;
use crate::config::FailurePolicy;
use crate::error::{PollError, ReportError};
use crate::report::{ReportData, ReportId};

/// Summary of a poll that delivered its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub id: ReportId,
    /// Fetches made, including the one that returned the report.
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Handle to a background poll started by `report` or `start_polling`.
///
/// Dropping the handle detaches the poll; it keeps running until it
/// delivers or reaches a configured bound.
#[derive(Debug)]
pub struct ReportHandle {
    id: ReportId,
    cancel: CancellationToken,
    task: JoinHandle<Result<PollOutcome, PollError>>,
}

impl ReportHandle {
    pub(crate) fn new(
        id: ReportId,
        cancel: CancellationToken,
        task: JoinHandle<Result<PollOutcome, PollError>>,
    ) -> Self {
        Self { id, cancel, task }
    }

    pub const fn id(&self) -> ReportId {
        self.id
    }

    /// Ask the poll to stop at its next fetch or sleep. The callback is not
    /// invoked once the request is observed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this poll, for wiring into a wider shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the poll to end.
    ///
    /// A callback that panicked surfaces as [`PollError::Aborted`].
    pub async fn wait(self) -> Result<PollOutcome, PollError> {
        match self.task.await {
            Ok(result) => result,
            Err(join_error) => Err(PollError::Aborted {
                id: self.id,
                message: join_error.to_string(),
            }),
        }
    }
}

/// Resolve when `deadline` passes, or never when there is none.
async fn deadline_reached(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

enum Interrupt<T> {
    Cancelled,
    DeadlineElapsed,
    Completed(T),
}

/// Run `work` unless the poll is cancelled or its deadline passes first.
async fn guarded<T>(
    work: impl Future<Output = T>,
    cancel: &CancellationToken,
    deadline: Option<Instant>,
) -> Interrupt<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Interrupt::Cancelled,
        _ = deadline_reached(deadline) => Interrupt::DeadlineElapsed,
        value = work => Interrupt::Completed(value),
    }
}

/// Fetch `id` every `poll.interval` until it is ready or the poll ends.
pub(crate) async fn poll_until_ready(
    client: &ReportClient,
    id: ReportId,
    cancel: &CancellationToken,
) -> Result<(ReportData, PollOutcome), PollError> {
    let poll = &client.config().poll;
    let started = Instant::now();
    let deadline = poll.deadline.map(|limit| started + limit);
    let mut attempts: u32 = 0;

    let deadline_error = |attempts: u32| PollError::DeadlineElapsed {
        id,
        attempts,
        elapsed: started.elapsed(),
    };

    loop {
        attempts = attempts.saturating_add(1);
        debug!(report_id = %id, attempt = attempts, "fetching report");

        let fetched = match guarded(client.fetch_report(id), cancel, deadline).await {
            Interrupt::Completed(fetched) => fetched,
            Interrupt::Cancelled => return Err(PollError::Cancelled { id, attempts }),
            Interrupt::DeadlineElapsed => return Err(deadline_error(attempts)),
        };

        let last_error = match fetched {
            Ok(FetchOutcome::Ready(data)) => {
                let outcome = PollOutcome {
                    id,
                    attempts,
                    elapsed: started.elapsed(),
                };
                return Ok((data, outcome));
            }
            Ok(FetchOutcome::NotReady(remote)) => {
                debug!(report_id = %id, attempt = attempts, "report not ready");
                ReportError::NotReady(remote)
            }
            Ok(FetchOutcome::Rejected(remote)) => ReportError::Remote(remote),
            Err(error) => error,
        };

        if !last_error.is_not_ready() {
            match poll.failure_policy {
                FailurePolicy::Stop => {
                    return Err(PollError::Failed {
                        id,
                        attempts,
                        error: last_error,
                    });
                }
                FailurePolicy::Retry => {
                    warn!(
                        report_id = %id,
                        attempt = attempts,
                        error = %last_error,
                        "fetch failed; retrying as if the report were not ready"
                    );
                }
            }
        }

        if poll.attempts_exhausted(attempts) {
            return Err(PollError::AttemptsExhausted {
                id,
                attempts,
                last_error,
            });
        }

        match guarded(tokio::time::sleep(poll.interval), cancel, deadline).await {
            Interrupt::Completed(()) => {}
            Interrupt::Cancelled => return Err(PollError::Cancelled { id, attempts }),
            Interrupt::DeadlineElapsed => return Err(deadline_error(attempts)),
        }
    }
}
