//! Report client: queue, fetch and poll against the report API.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reportq_core::{HttpAuth, ReportClient, ReqwestHttpClient, WSSE_HEADER};
//!
//! async fn run(definition: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReportClient::new(
//!         Arc::new(ReqwestHttpClient::new()),
//!         Arc::new(HttpAuth::header(WSSE_HEADER, "UsernameToken ...")),
//!     );
//!
//!     let handle = client
//!         .report(definition, |data| println!("{data}"))
//!         .await?;
//!     println!("queued report {}", handle.id());
//!
//!     handle.wait().await?;
//!     Ok(())
//! }
//! ```

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};

use crate::auth::AuthProvider;
use crate::classify::{classify_fetch, classify_queue, FetchOutcome};
use crate::config::ClientConfig;
use crate::error::{PollError, ReportError, ValidationError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::method::ApiMethod;
use crate::poller::{poll_until_ready, PollOutcome, ReportHandle};
use crate::report::{validate_definition, ReportData, ReportId};

/// Client for one report API account.
///
/// Cloning is cheap; every clone shares the same transport, credentials and
/// configuration. Each poll task owns its own clone.
#[derive(Clone)]
pub struct ReportClient {
    http_client: Arc<dyn HttpClient>,
    auth: Arc<dyn AuthProvider>,
    config: Arc<ClientConfig>,
}

impl Debug for ReportClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReportClient {
    pub fn new(http_client: Arc<dyn HttpClient>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            http_client,
            auth,
            config: Arc::new(ClientConfig::default()),
        }
    }

    pub fn with_config(
        http_client: Arc<dyn HttpClient>,
        auth: Arc<dyn AuthProvider>,
        config: ClientConfig,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            http_client,
            auth,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn call(&self, method: ApiMethod, body: String) -> Result<HttpResponse, ReportError> {
        let request = HttpRequest::post(method.url(&self.config.endpoint), body)
            .with_auth(&self.auth.auth())
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await?;
        debug!(%method, status = response.status, body = %response.body, "report api response");
        Ok(response)
    }

    /// Queue `definition` and return the identifier the service assigned.
    pub async fn queue_report(&self, definition: &str) -> Result<ReportId, ReportError> {
        validate_definition(definition)?;

        let response = self.call(ApiMethod::Queue, definition.to_owned()).await?;
        let id = classify_queue(&response.body)?;

        info!(report_id = %id, "queued report");
        Ok(id)
    }

    /// Fetch `id` once and classify the answer.
    pub async fn fetch_report(&self, id: ReportId) -> Result<FetchOutcome, ReportError> {
        let body = json!({ "reportID": id.get() }).to_string();
        let response = self.call(ApiMethod::Get, body).await?;

        classify_fetch(response.status, &response.body, &self.config.not_ready_error)
    }

    /// Fetch `id` once.
    ///
    /// A report that is still being generated comes back as
    /// [`ReportError::NotReady`], any other structured rejection as
    /// [`ReportError::Remote`].
    pub async fn get_report(&self, id: ReportId) -> Result<ReportData, ReportError> {
        match self.fetch_report(id).await? {
            FetchOutcome::Ready(data) => Ok(data),
            FetchOutcome::NotReady(remote) => Err(ReportError::NotReady(remote)),
            FetchOutcome::Rejected(remote) => Err(ReportError::Remote(remote)),
        }
    }

    /// Queue `definition`, then poll for it in the background.
    ///
    /// Returns as soon as the report is queued. `on_ready` runs at most once,
    /// on a tokio worker thread, with the finished report. Must be called
    /// from within a tokio runtime.
    pub async fn report<F>(&self, definition: &str, on_ready: F) -> Result<ReportHandle, ReportError>
    where
        F: FnOnce(ReportData) + Send + 'static,
    {
        let id = self.queue_report(definition).await?;
        Ok(self.start_polling(id, on_ready))
    }

    /// Poll an already queued report in the background.
    ///
    /// The returned handle may be dropped; polling then continues detached
    /// until the report is delivered or a configured bound is reached.
    /// Must be called from within a tokio runtime.
    pub fn start_polling<F>(&self, id: ReportId, on_ready: F) -> ReportHandle
    where
        F: FnOnce(ReportData) + Send + 'static,
    {
        let client = self.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(
            async move {
                let (data, outcome) = poll_until_ready(&client, id, &token).await?;
                info!(attempts = outcome.attempts, "report ready; delivering");
                on_ready(data);
                Ok::<_, PollError>(outcome)
            }
            .instrument(tracing::info_span!("report_poll", report_id = %id)),
        );

        ReportHandle::new(id, cancel, task)
    }

    /// Poll `id` in the current task and return the report instead of
    /// handing it to a callback.
    pub async fn wait_for_report(
        &self,
        id: ReportId,
    ) -> Result<(ReportData, PollOutcome), PollError> {
        poll_until_ready(self, id, &CancellationToken::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpAuth, HttpError, ScriptedHttpClient};

    fn client_with(http: Arc<ScriptedHttpClient>) -> ReportClient {
        ReportClient::new(http, Arc::new(HttpAuth::header("X-WSSE", "creds")))
    }

    #[tokio::test]
    async fn queue_posts_raw_definition_to_queue_method() {
        let http = ScriptedHttpClient::new([Ok(HttpResponse::ok(r#"{"reportID": 12345}"#))])
            .into_shared();
        let client = client_with(Arc::clone(&http));

        let id = client
            .queue_report(r#"{"reportDescription":{"reportSuiteID":"suite"}}"#)
            .await
            .expect("queued");

        assert_eq!(id, ReportId::new(12345));
        let requests = http.requests();
        let request = &requests[0];
        assert_eq!(
            request.url,
            "https://api.omniture.com/admin/1.4/rest/?method=Report.Queue"
        );
        assert_eq!(request.body, r#"{"reportDescription":{"reportSuiteID":"suite"}}"#);
        assert_eq!(request.headers.get("x-wsse").map(String::as_str), Some("creds"));
    }

    #[tokio::test]
    async fn queue_propagates_transport_failure_unchanged() {
        let http = ScriptedHttpClient::new([Err(HttpError::new("dns lookup failed"))]).into_shared();
        let client = client_with(http);

        let error = client.queue_report("def").await.expect_err("transport failure");

        match error {
            ReportError::Transport(inner) => assert_eq!(inner.message(), "dns lookup failed"),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_definition_is_rejected_without_a_request() {
        let http = ScriptedHttpClient::new(Vec::new()).into_shared();
        let client = client_with(Arc::clone(&http));

        let error = client.queue_report("   ").await.expect_err("validation");

        assert!(matches!(
            error,
            ReportError::Validation(ValidationError::EmptyDefinition)
        ));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn get_sends_report_id_payload_to_get_method() {
        let http = ScriptedHttpClient::new([Ok(HttpResponse::ok("report-body"))]).into_shared();
        let client = client_with(Arc::clone(&http));

        let data = client.get_report(ReportId::new(42)).await.expect("ready");

        assert_eq!(data, "report-body");
        let requests = http.requests();
        let request = &requests[0];
        assert!(request.url.ends_with("?method=Report.Get"));
        assert_eq!(request.body, r#"{"reportID":42}"#);
    }

    #[tokio::test]
    async fn get_separates_not_ready_from_rejection() {
        let http = ScriptedHttpClient::new([
            Ok(HttpResponse::new(
                400,
                r#"{"error":"report_not_ready","error_description":"Report not ready","error_uri":""}"#,
            )),
            Ok(HttpResponse::new(
                400,
                r#"{"error":"report_id_invalid","error_description":"Report ID invalid","error_uri":""}"#,
            )),
        ])
        .into_shared();
        let client = client_with(http);

        let pending = client.get_report(ReportId::new(1)).await.expect_err("pending");
        assert!(pending.is_not_ready());
        assert_eq!(pending.to_string(), "Report not ready");

        let rejected = client.get_report(ReportId::new(1)).await.expect_err("rejected");
        assert!(!rejected.is_not_ready());
        assert_eq!(
            rejected.remote().map(|remote| remote.error.as_str()),
            Some("report_id_invalid")
        );
    }

    #[test]
    #[should_panic]
    fn start_polling_outside_a_runtime_panics() {
        let client = client_with(ScriptedHttpClient::new(Vec::new()).into_shared());

        let _handle = client.start_polling(ReportId::new(1), |_| {});
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let result = ReportClient::with_config(
            ScriptedHttpClient::new(Vec::new()).into_shared(),
            Arc::new(HttpAuth::None),
            ClientConfig::default().with_timeout_ms(0),
        );

        assert_eq!(result.err(), Some(ValidationError::ZeroTimeout));
    }
}
