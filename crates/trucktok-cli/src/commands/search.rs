use trucktok_core::{AppConfig, Aggregator, VideoQuery};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &SearchArgs,
    config: &AppConfig,
    aggregator: &Aggregator,
) -> Result<CommandResult, CliError> {
    let limit = args.limit.unwrap_or(config.max_results);
    if limit == 0 {
        return Err(CliError::Command(String::from(
            "--limit must be greater than zero",
        )));
    }

    let query = VideoQuery::new(config.query_or_default(args.query.as_deref()), limit)
        .map_err(|error| CliError::Command(error.message().to_owned()))?;

    match args.source.provider() {
        Some(provider) => match aggregator.fetch_one(provider, &query).await {
            Ok(videos) => Ok(CommandResult::ok(serde_json::to_value(videos)?)),
            Err(error) => Err(CliError::AllProvidersFailed(format!("{provider}: {error}"))),
        },
        None => match aggregator.aggregate(&query).await {
            Ok(success) => {
                tracing::debug!(
                    latency_ms = success.latency_ms,
                    total = success.total_videos(),
                    "aggregate search complete"
                );
                Ok(CommandResult::ok(serde_json::to_value(&success.videos)?)
                    .with_errors(success.errors))
            }
            Err(failure) => Err(CliError::AllProvidersFailed(failure.to_string())),
        },
    }
}
