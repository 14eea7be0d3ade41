use std::io::Write;

use crate::commands::CommandResult;
use crate::error::CliError;

/// Render a command result as the text written to stdout.
///
/// Report bodies are passed through untouched; a trailing newline is added
/// only when the body lacks one.
pub fn render_to_string(result: &CommandResult, pretty: bool) -> Result<String, CliError> {
    let mut rendered = match result {
        CommandResult::Report(data) => data.as_str().to_owned(),
        CommandResult::Summary(value) if pretty => serde_json::to_string_pretty(value)?,
        CommandResult::Summary(value) => serde_json::to_string(value)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

pub fn render(result: &CommandResult, pretty: bool) -> Result<(), CliError> {
    let rendered = render_to_string(result, pretty)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
