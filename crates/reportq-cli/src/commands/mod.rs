mod get;
mod queue;
mod run;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reportq_core::{
    ClientConfig, FailurePolicy, HttpAuth, PollConfig, PollOutcome, ReportClient, ReportData,
    ReportId, ReqwestHttpClient,
};
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::cli::{Cli, Command, RunArgs};
use crate::error::CliError;

/// What a command hands back for rendering.
#[derive(Debug)]
pub enum CommandResult {
    /// A report body, printed exactly as the service sent it.
    Report(ReportData),
    /// A JSON summary.
    Summary(Value),
}

/// JSON summary of a delivered report.
#[derive(Debug, Serialize)]
struct ReportSummary<'a> {
    report_id: ReportId,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<u64>,
    completed_at: String,
    report: &'a str,
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let poll = match &cli.command {
        Command::Run(args) => poll_config(cli, args),
        Command::Queue(_) | Command::Get(_) => {
            PollConfig::every(Duration::from_millis(cli.interval_ms))
        }
    };
    let client = build_client(cli, poll)?;

    match &cli.command {
        Command::Queue(args) => queue::run(args, &client).await,
        Command::Get(args) => get::run(args, &client, cli.json).await,
        Command::Run(args) => run::run(args, &client, cli.json).await,
    }
}

fn poll_config(cli: &Cli, args: &RunArgs) -> PollConfig {
    let mut poll = PollConfig::every(Duration::from_millis(cli.interval_ms));
    if let Some(max_attempts) = args.max_attempts {
        poll = poll.with_max_attempts(max_attempts);
    }
    if let Some(deadline_secs) = args.deadline_secs {
        poll = poll.with_deadline(Duration::from_secs(deadline_secs));
    }
    if args.stop_on_failure {
        poll = poll.with_failure_policy(FailurePolicy::Stop);
    }
    poll
}

fn build_client(cli: &Cli, poll: PollConfig) -> Result<ReportClient, CliError> {
    let auth = match &cli.auth_header {
        Some(value) => HttpAuth::header(cli.auth_header_name.as_str(), value.as_str()),
        None => HttpAuth::None,
    };
    let config = ClientConfig::default()
        .with_endpoint(cli.endpoint.as_str())
        .with_timeout_ms(cli.timeout_ms)
        .with_poll(poll);

    Ok(ReportClient::with_config(
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(auth),
        config,
    )?)
}

/// Read a report definition from `path`, or from stdin when `path` is `-`.
pub fn read_definition(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut definition = String::new();
        std::io::stdin().read_to_string(&mut definition)?;
        return Ok(definition);
    }

    Ok(std::fs::read_to_string(path)?)
}

pub(crate) fn now_rfc3339() -> Result<String, CliError> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}

pub(crate) fn report_result(
    id: ReportId,
    data: ReportData,
    outcome: Option<PollOutcome>,
    json: bool,
) -> Result<CommandResult, CliError> {
    if !json {
        return Ok(CommandResult::Report(data));
    }

    let summary = ReportSummary {
        report_id: id,
        attempts: outcome.map(|outcome| outcome.attempts),
        elapsed_ms: outcome
            .map(|outcome| u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX)),
        completed_at: now_rfc3339()?,
        report: data.as_str(),
    };
    Ok(CommandResult::Summary(serde_json::to_value(summary)?))
}

#[cfg(test)]
pub(crate) fn scripted_client(
    replies: Vec<Result<reportq_core::HttpResponse, reportq_core::HttpError>>,
) -> (ReportClient, Arc<reportq_core::ScriptedHttpClient>) {
    scripted_client_with(replies, PollConfig::every(Duration::from_millis(50)))
}

#[cfg(test)]
pub(crate) fn scripted_client_with(
    replies: Vec<Result<reportq_core::HttpResponse, reportq_core::HttpError>>,
    poll: PollConfig,
) -> (ReportClient, Arc<reportq_core::ScriptedHttpClient>) {
    let http = reportq_core::ScriptedHttpClient::new(replies).into_shared();
    let client = ReportClient::with_config(
        http.clone(),
        Arc::new(HttpAuth::None),
        ClientConfig::default().with_poll(poll),
    )
    .expect("valid config");
    (client, http)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    #[test]
    fn definition_is_read_from_file_verbatim() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "{{\"reportDescription\":{{}}}}").expect("write");

        let definition = read_definition(file.path()).expect("readable");

        assert_eq!(definition, "{\"reportDescription\":{}}\n");
    }

    #[test]
    fn missing_definition_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = read_definition(&dir.path().join("absent.json")).expect_err("missing");

        assert!(matches!(error, CliError::Io(_)));
        assert_eq!(error.exit_code(), 10);
    }

    #[test]
    fn run_flags_become_poll_bounds() {
        let cli = Cli::try_parse_from([
            "reportq",
            "run",
            "def.json",
            "--max-attempts",
            "4",
            "--deadline-secs",
            "30",
            "--stop-on-failure",
            "--interval-ms",
            "500",
        ])
        .expect("valid arguments");
        let Command::Run(args) = &cli.command else {
            panic!("expected run");
        };

        let poll = poll_config(&cli, args);

        assert_eq!(poll.interval, Duration::from_millis(500));
        assert_eq!(poll.max_attempts, Some(4));
        assert_eq!(poll.deadline, Some(Duration::from_secs(30)));
        assert_eq!(poll.failure_policy, FailurePolicy::Stop);
    }

    #[test]
    fn invalid_endpoint_is_rejected_before_any_request() {
        let cli = Cli::try_parse_from(["reportq", "--endpoint", "not a url", "get", "1"])
            .expect("valid arguments");

        let error = build_client(&cli, PollConfig::default()).expect_err("invalid endpoint");

        assert!(matches!(error, CliError::Validation(_)));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn json_summary_carries_poll_outcome() {
        let outcome = PollOutcome {
            id: ReportId::new(9),
            attempts: 3,
            elapsed: Duration::from_millis(2_000),
        };

        let result = report_result(ReportId::new(9), ReportData::new("body"), Some(outcome), true)
            .expect("summary");

        let CommandResult::Summary(value) = result else {
            panic!("expected summary");
        };
        assert_eq!(value["report_id"], 9);
        assert_eq!(value["attempts"], 3);
        assert_eq!(value["elapsed_ms"], 2_000);
        assert_eq!(value["report"], "body");
        assert!(value["completed_at"].as_str().is_some());
    }
}
