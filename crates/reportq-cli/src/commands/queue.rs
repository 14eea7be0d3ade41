use reportq_core::{ReportClient, ReportId};
use serde::Serialize;
use tracing::info;

use crate::cli::QueueArgs;
use crate::error::CliError;

use super::{now_rfc3339, read_definition, CommandResult};

#[derive(Debug, Serialize)]
struct QueueResponseData {
    report_id: ReportId,
    queued_at: String,
}

pub async fn run(args: &QueueArgs, client: &ReportClient) -> Result<CommandResult, CliError> {
    let definition = read_definition(&args.definition)?;
    let report_id = client.queue_report(&definition).await?;
    info!(%report_id, "report queued");

    let data = serde_json::to_value(QueueResponseData {
        report_id,
        queued_at: now_rfc3339()?,
    })?;
    Ok(CommandResult::Summary(data))
}
