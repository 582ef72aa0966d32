//! History command handler.

use atelier::{AtelierConfig, GenerationLog};
use std::process::ExitCode;

/// Prints logged generations, oldest first.
#[tracing::instrument(skip_all, fields(path = %config.log().path().display()))]
pub fn handle_history_command(
    config: &AtelierConfig,
    limit: Option<usize>,
) -> anyhow::Result<ExitCode> {
    let records = GenerationLog::new(config.log().path()).records()?;
    if records.is_empty() {
        println!("No generations logged yet.");
        return Ok(ExitCode::SUCCESS);
    }

    let skip = limit.map_or(0, |limit| records.len().saturating_sub(limit));
    for record in records.iter().skip(skip) {
        let members = if record.group_members().is_empty() {
            "-"
        } else {
            record.group_members().as_str()
        };
        println!("{}  [{}]  {}", record.timestamp(), members, record.prompt());
    }
    Ok(ExitCode::SUCCESS)
}
