//! # reportq Core
//!
//! Client for asynchronous report-generation APIs: queue a report
//! definition, poll until the report is ready, deliver it to a callback.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`auth`] | Per-request authentication seam |
//! | [`classify`] | Interpretation of queue and fetch responses |
//! | [`client`] | `ReportClient`: queue, fetch, report |
//! | [`config`] | Client and poll configuration |
//! | [`error`] | Error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`method`] | Remote method names and URLs |
//! | [`poller`] | Background polling and `ReportHandle` |
//! | [`report`] | Report identifiers and payloads |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use reportq_core::{HttpAuth, ReportClient, ReqwestHttpClient, WSSE_HEADER};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReportClient::new(
//!         Arc::new(ReqwestHttpClient::new()),
//!         Arc::new(HttpAuth::header(WSSE_HEADER, std::env::var("WSSE")?)),
//!     );
//!
//!     let handle = client
//!         .report(r#"{"reportDescription": {}}"#, |data| println!("{data}"))
//!         .await?;
//!
//!     println!("queued report {}", handle.id());
//!     handle.wait().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Caller         │
//! └────────┬────────┘
//!          │ report(definition, on_ready)
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ReportClient   │────▶│ Poll task        │──▶ on_ready(data)
//! │  queue / get    │◀────│ (one per report) │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Classifier      │◀────│ HTTP Client      │
//! │ ready/not ready │     │ (reqwest/script) │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use reportq_core::ReportError;
//!
//! fn describe(error: &ReportError) -> &'static str {
//!     match error {
//!         ReportError::NotReady(_) => "still generating",
//!         ReportError::Remote(_) => "rejected by the service",
//!         ReportError::Transport(_) => "network problem",
//!         ReportError::Decode { .. } => "unexpected response body",
//!         ReportError::Validation(_) => "invalid input",
//!     }
//! }
//! ```

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http_client;
pub mod method;
pub mod poller;
pub mod report;

pub use auth::{AuthProvider, FnAuthProvider, WSSE_HEADER};
pub use classify::{classify_fetch, classify_queue, FetchOutcome, DEFAULT_NOT_READY_ERROR};
pub use client::ReportClient;
pub use config::{ClientConfig, FailurePolicy, PollConfig, DEFAULT_ENDPOINT};
pub use error::{PollError, RemoteError, ReportError, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use method::ApiMethod;
pub use poller::{PollOutcome, ReportHandle};
pub use report::{ReportData, ReportId};
