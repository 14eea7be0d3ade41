//! CLI argument definitions for reportq.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `queue` | Queue a report definition and print its id |
//! | `get` | Fetch a queued report once |
//! | `run` | Queue a definition and wait for the report |
//!
//! # Global Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--endpoint` | `REPORTQ_ENDPOINT` | report API endpoint | REST endpoint |
//! | `--auth-header-name` | `REPORTQ_AUTH_HEADER_NAME` | `X-WSSE` | Credential header name |
//! | `--auth-header` | `REPORTQ_AUTH_HEADER` | none | Credential header value |
//! | `--timeout-ms` | `REPORTQ_TIMEOUT_MS` | `30000` | Per-request timeout |
//! | `--interval-ms` | `REPORTQ_INTERVAL_MS` | `1000` | Poll interval |
//! | `--json` | | `false` | Wrap report output in a JSON summary |
//! | `--pretty` | | `false` | Pretty-print JSON output |
//! | `-v` | | | Raise log verbosity (repeatable) |
//!
//! # Examples
//!
//! ```bash
//! # Queue a definition stored in a file
//! reportq queue ranked.json
//!
//! # Fetch report 12345 once
//! reportq get 12345
//!
//! # Queue from stdin and wait at most two minutes
//! cat ranked.json | reportq run - --deadline-secs 120 --stop-on-failure
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use reportq_core::{DEFAULT_ENDPOINT, WSSE_HEADER};

/// reportq - queue, poll and fetch asynchronous reports.
#[derive(Debug, Parser)]
#[command(
    name = "reportq",
    author,
    version,
    about = "Queue, poll and fetch asynchronous reports",
    long_about = "reportq submits report definitions to a report API, polls until the \
report is generated and prints it.\n\
\n\
Credentials are passed verbatim as a request header; reportq does not compute them.\n\
\n\
Use 'reportq <command> --help' for command-specific help."
)]
pub struct Cli {
    /// REST endpoint of the report API.
    #[arg(long, global = true, env = "REPORTQ_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Name of the credential header.
    #[arg(long, global = true, env = "REPORTQ_AUTH_HEADER_NAME", default_value = WSSE_HEADER)]
    pub auth_header_name: String,

    /// Value of the credential header, sent with every request.
    #[arg(long, global = true, env = "REPORTQ_AUTH_HEADER", hide_env_values = true)]
    pub auth_header: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "REPORTQ_TIMEOUT_MS", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Delay between fetch attempts in milliseconds.
    #[arg(long, global = true, env = "REPORTQ_INTERVAL_MS", default_value_t = 1_000)]
    pub interval_ms: u64,

    /// Print a JSON summary instead of the bare report body.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Queue a report definition and print the assigned report id.
    ///
    /// # Examples
    ///
    ///   reportq queue ranked.json
    ///   reportq queue - < ranked.json
    Queue(QueueArgs),

    /// Fetch a queued report once.
    ///
    /// Exits with code 3 when the report is not ready yet or was rejected.
    ///
    /// # Examples
    ///
    ///   reportq get 12345
    Get(GetArgs),

    /// Queue a report definition and wait until the report is ready.
    ///
    /// # Examples
    ///
    ///   reportq run ranked.json
    ///   reportq run ranked.json --max-attempts 60 --stop-on-failure
    Run(RunArgs),
}

/// Arguments for the `queue` command.
#[derive(Debug, Args)]
pub struct QueueArgs {
    /// File holding the report definition, or '-' for stdin.
    pub definition: PathBuf,
}

/// Arguments for the `get` command.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Report id returned by `queue`.
    pub report_id: i64,
}

/// Arguments for the `run` command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// File holding the report definition, or '-' for stdin.
    pub definition: PathBuf,

    /// Give up after this many fetch attempts.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Give up after this many seconds of polling.
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Stop on the first rejection or transport error instead of retrying.
    #[arg(long, default_value_t = false)]
    pub stop_on_failure: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_bounds_and_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "reportq",
            "run",
            "def.json",
            "--max-attempts",
            "5",
            "--deadline-secs",
            "60",
            "--stop-on-failure",
            "--interval-ms",
            "250",
            "-vv",
        ])
        .expect("valid arguments");

        assert_eq!(cli.interval_ms, 250);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.definition, PathBuf::from("def.json"));
                assert_eq!(args.max_attempts, Some(5));
                assert_eq!(args.deadline_secs, Some(60));
                assert!(args.stop_on_failure);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn get_requires_a_numeric_id() {
        assert!(Cli::try_parse_from(["reportq", "get", "abc"]).is_err());

        let cli = Cli::try_parse_from(["reportq", "get", "12345"]).expect("valid id");
        assert!(matches!(cli.command, Command::Get(GetArgs { report_id: 12345 })));
        assert_eq!(cli.auth_header_name, "X-WSSE");
    }
}
