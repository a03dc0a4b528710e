use trucktok_core::Aggregator;

use crate::error::CliError;

use super::CommandResult;

pub fn run(aggregator: &Aggregator) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(aggregator.descriptors())?;
    Ok(CommandResult::ok(data))
}
