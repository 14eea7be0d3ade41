use reportq_core::{ReportClient, ReportId};
use tracing::debug;

use crate::cli::GetArgs;
use crate::error::CliError;

use super::{report_result, CommandResult};

pub async fn run(
    args: &GetArgs,
    client: &ReportClient,
    json: bool,
) -> Result<CommandResult, CliError> {
    let id = ReportId::new(args.report_id);
    let data = client.get_report(id).await?;
    debug!(report_id = %id, bytes = data.as_str().len(), "report fetched");

    report_result(id, data, None, json)
}
