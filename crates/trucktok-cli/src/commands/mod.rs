mod search;
mod sources;

use serde_json::Value;
use trucktok_core::{AggregatorBuilder, AppConfig, ProviderFailure};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Command output: the JSON printed to stdout plus provider failures that
/// did not abort the command.
pub struct CommandResult {
    pub data: Value,
    pub errors: Vec<ProviderFailure>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(mut self, errors: Vec<ProviderFailure>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli, config: AppConfig) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Search(args) => {
            let builder = AggregatorBuilder::new(config.clone());
            let aggregator = match args.source.provider() {
                Some(provider) => builder.with_only(provider).build(),
                None => builder.build(),
            };
            search::run(args, &config, &aggregator).await
        }
        Command::Sources => sources::run(&AggregatorBuilder::new(config).build()),
    }
}
