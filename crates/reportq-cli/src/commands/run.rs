use reportq_core::{PollError, ReportClient};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;

use super::{read_definition, report_result, CommandResult};

pub async fn run(
    args: &RunArgs,
    client: &ReportClient,
    json: bool,
) -> Result<CommandResult, CliError> {
    let definition = read_definition(&args.definition)?;
    let (tx, rx) = oneshot::channel();
    let handle = client
        .report(&definition, move |data| {
            let _ = tx.send(data);
        })
        .await?;
    let id = handle.id();
    info!(report_id = %id, "report queued; polling");

    let cancel = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(report_id = %id, "interrupted; cancelling poll");
            cancel.cancel();
        }
    });

    let outcome = handle.wait().await?;
    let data = rx.await.map_err(|_| PollError::Aborted {
        id,
        message: String::from("poll finished without delivering the report"),
    })?;

    report_result(id, data, Some(outcome), json)
}
