use std::sync::Arc;

use trucktok_core::{AppConfig, Aggregator, SourceError, VideoQuery};

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct GatewayState {
    pub aggregator: Arc<Aggregator>,
    pub config: Arc<AppConfig>,
}

impl GatewayState {
    pub fn new(aggregator: Aggregator, config: AppConfig) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            config: Arc::new(config),
        }
    }

    /// Builds the adapter query, substituting the configured default for an
    /// absent or blank `q`.
    pub fn query(&self, q: Option<&str>) -> Result<VideoQuery, SourceError> {
        VideoQuery::new(self.config.query_or_default(q), self.config.max_results)
    }
}
