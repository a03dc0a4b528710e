use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::Serialize;

use crate::adapters::{TiktokAdapter, TwitterAdapter, YoutubeAdapter};
use crate::config::AppConfig;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::video_source::{SourceDescriptor, SourceError, VideoQuery, VideoSource};
use crate::{ProviderId, VideoRecord};

/// One provider's failure inside an aggregate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub provider: ProviderId,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub retryable: bool,
}

impl ProviderFailure {
    pub fn from_source_error(provider: ProviderId, error: &SourceError) -> Self {
        Self {
            provider,
            code: error.code(),
            message: error.message().to_owned(),
            status: error.status(),
            details: error.details_excerpt().map(str::to_owned),
            retryable: error.retryable(),
        }
    }
}

impl Display for ProviderFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.provider, self.message, self.code)
    }
}

/// Aggregate call where at least one provider answered.
///
/// Every registered provider has an entry in `videos`; failed providers map
/// to an empty list and appear in `errors`.
#[derive(Debug, Clone)]
pub struct AggregateSuccess {
    pub videos: BTreeMap<ProviderId, Vec<VideoRecord>>,
    pub errors: Vec<ProviderFailure>,
    pub latency_ms: u64,
}

impl AggregateSuccess {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn total_videos(&self) -> usize {
        self.videos.values().map(Vec::len).sum()
    }
}

/// Aggregate call where every registered provider failed, or none was
/// registered.
#[derive(Debug, Clone)]
pub struct AggregateFailure {
    pub errors: Vec<ProviderFailure>,
    pub latency_ms: u64,
}

impl Display for AggregateFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no providers are enabled");
        }

        let causes = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "all providers failed: {causes}")
    }
}

impl std::error::Error for AggregateFailure {}

pub type AggregateResult = Result<AggregateSuccess, AggregateFailure>;

/// Fans a query out to every registered adapter and merges the answers.
pub struct Aggregator {
    sources: Vec<Arc<dyn VideoSource>>,
    provider_timeout: Duration,
}

impl Aggregator {
    /// Adapters are kept in the given order; a later adapter with the same
    /// provider id replaces an earlier one.
    pub fn new(sources: Vec<Arc<dyn VideoSource>>, provider_timeout: Duration) -> Self {
        let mut unique: Vec<Arc<dyn VideoSource>> = Vec::with_capacity(sources.len());
        for source in sources {
            match unique.iter_mut().find(|existing| existing.id() == source.id()) {
                Some(existing) => *existing = source,
                None => unique.push(source),
            }
        }

        Self {
            sources: unique,
            provider_timeout,
        }
    }

    pub fn source(&self, provider: ProviderId) -> Option<Arc<dyn VideoSource>> {
        self.sources
            .iter()
            .find(|source| source.id() == provider)
            .cloned()
    }

    pub fn providers(&self) -> Vec<ProviderId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        self.sources.iter().map(|source| source.describe()).collect()
    }

    pub const fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    /// Runs one provider under the per-provider timeout.
    pub async fn fetch_one(
        &self,
        provider: ProviderId,
        query: &VideoQuery,
    ) -> Result<Vec<VideoRecord>, SourceError> {
        let source = self.source(provider).ok_or_else(|| {
            SourceError::configuration(format!("{provider} provider is not enabled"))
        })?;
        self.run(source.as_ref(), query.clone()).await
    }

    pub async fn aggregate(&self, query: &VideoQuery) -> AggregateResult {
        let started = Instant::now();

        let outcomes = join_all(self.sources.iter().map(|source| {
            let query = query.clone();
            async move { (source.id(), self.run(source.as_ref(), query).await) }
        }))
        .await;

        let mut videos = BTreeMap::new();
        let mut errors = Vec::new();
        let mut succeeded = 0_usize;

        for (provider, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    succeeded += 1;
                    videos.insert(provider, records);
                }
                Err(error) => {
                    errors.push(ProviderFailure::from_source_error(provider, &error));
                    videos.insert(provider, Vec::new());
                }
            }
        }

        let latency_ms = elapsed_ms(started);
        if succeeded == 0 {
            tracing::error!(
                failed = errors.len(),
                latency_ms,
                query = %query.query,
                "aggregate search failed for every provider"
            );
            return Err(AggregateFailure { errors, latency_ms });
        }

        tracing::info!(
            succeeded,
            failed = errors.len(),
            latency_ms,
            query = %query.query,
            "aggregate search finished"
        );
        Ok(AggregateSuccess {
            videos,
            errors,
            latency_ms,
        })
    }

    async fn run(
        &self,
        source: &dyn VideoSource,
        query: VideoQuery,
    ) -> Result<Vec<VideoRecord>, SourceError> {
        let provider = source.id();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.provider_timeout, source.fetch_videos(query))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(SourceError::timeout(format!(
                "{provider} did not answer within {} ms",
                self.provider_timeout.as_millis()
            ))),
        };

        match &outcome {
            Ok(records) => tracing::debug!(
                provider = provider.as_str(),
                count = records.len(),
                latency_ms = elapsed_ms(started),
                "provider answered"
            ),
            Err(error) => tracing::warn!(
                provider = provider.as_str(),
                code = error.code(),
                status = error.status(),
                details = error.details_excerpt().unwrap_or_default(),
                latency_ms = elapsed_ms(started),
                "provider failed: {}",
                error.message()
            ),
        }

        outcome
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Builds an [`Aggregator`] from [`AppConfig`].
///
/// ```rust,ignore
/// use trucktok_core::{AggregatorBuilder, AppConfig};
///
/// let aggregator = AggregatorBuilder::new(AppConfig::from_env()?)
///     .with_tiktok_enabled(false)
///     .build();
/// ```
pub struct AggregatorBuilder {
    config: AppConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    enable_youtube: bool,
    enable_twitter: bool,
    enable_tiktok: bool,
    extra_sources: Vec<Arc<dyn VideoSource>>,
}

impl AggregatorBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            http_client: None,
            enable_youtube: true,
            enable_twitter: true,
            enable_tiktok: true,
            extra_sources: Vec::new(),
        }
    }

    /// Shares one transport between adapters. Defaults to a reqwest client.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_youtube_enabled(mut self, enabled: bool) -> Self {
        self.enable_youtube = enabled;
        self
    }

    pub fn with_twitter_enabled(mut self, enabled: bool) -> Self {
        self.enable_twitter = enabled;
        self
    }

    pub fn with_tiktok_enabled(mut self, enabled: bool) -> Self {
        self.enable_tiktok = enabled;
        self
    }

    /// Keeps a single provider enabled.
    pub fn with_only(self, provider: ProviderId) -> Self {
        self.with_youtube_enabled(provider == ProviderId::Youtube)
            .with_twitter_enabled(provider == ProviderId::Twitter)
            .with_tiktok_enabled(provider == ProviderId::Tiktok)
    }

    /// Registers a custom adapter, replacing the built-in one with the same id.
    pub fn with_source(mut self, source: Arc<dyn VideoSource>) -> Self {
        self.extra_sources.push(source);
        self
    }

    pub fn build(mut self) -> Aggregator {
        let extra_sources = std::mem::take(&mut self.extra_sources);
        let http_client = self
            .http_client
            .take()
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let timeout_ms = self.config.provider_timeout_ms;
        let mut sources: Vec<Arc<dyn VideoSource>> = Vec::new();

        if self.enable_youtube {
            sources.push(Arc::new(
                YoutubeAdapter::new(Arc::clone(&http_client), &self.config.youtube)
                    .with_request_timeout_ms(timeout_ms),
            ));
        }

        if self.enable_twitter {
            sources.push(Arc::new(
                TwitterAdapter::new(Arc::clone(&http_client), &self.config.twitter)
                    .with_request_timeout_ms(timeout_ms),
            ));
        }

        if self.enable_tiktok {
            sources.push(Arc::new(TiktokAdapter::new()));
        }

        sources.extend(
            extra_sources
                .into_iter()
                .filter(|source| self.is_enabled(source.id())),
        );

        Aggregator::new(sources, Duration::from_millis(timeout_ms))
    }

    fn is_enabled(&self, provider: ProviderId) -> bool {
        match provider {
            ProviderId::Youtube => self.enable_youtube,
            ProviderId::Twitter => self.enable_twitter,
            ProviderId::Tiktok => self.enable_tiktok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video_source::{FetchFuture, SourceErrorKind};

    struct StubSource {
        id: ProviderId,
        outcome: Result<Vec<VideoRecord>, SourceError>,
        delay: Option<Duration>,
    }

    impl StubSource {
        fn ok(id: ProviderId, count: usize) -> Arc<dyn VideoSource> {
            let records = (0..count)
                .map(|index| {
                    VideoRecord::new(id, format!("{id}-{index}"), "title", "https://video.test")
                })
                .collect();
            Arc::new(Self {
                id,
                outcome: Ok(records),
                delay: None,
            })
        }

        fn failing(id: ProviderId, error: SourceError) -> Arc<dyn VideoSource> {
            Arc::new(Self {
                id,
                outcome: Err(error),
                delay: None,
            })
        }

        fn slow(id: ProviderId, delay: Duration) -> Arc<dyn VideoSource> {
            Arc::new(Self {
                id,
                outcome: Ok(Vec::new()),
                delay: Some(delay),
            })
        }
    }

    impl VideoSource for StubSource {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn describe(&self) -> SourceDescriptor {
            SourceDescriptor {
                id: self.id,
                configured: true,
                auth: "none",
                live: false,
            }
        }

        fn fetch_videos<'a>(&'a self, _query: VideoQuery) -> FetchFuture<'a> {
            Box::pin(async move {
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                self.outcome.clone()
            })
        }
    }

    fn query() -> VideoQuery {
        VideoQuery::new("custom trucks", 12).expect("valid query")
    }

    #[tokio::test]
    async fn one_failure_degrades_to_empty_slot() {
        let aggregator = Aggregator::new(
            vec![
                StubSource::ok(ProviderId::Youtube, 2),
                StubSource::failing(
                    ProviderId::Twitter,
                    SourceError::upstream("twitter search failed", 503, "down"),
                ),
                StubSource::ok(ProviderId::Tiktok, 1),
            ],
            Duration::from_secs(1),
        );

        let success = aggregator.aggregate(&query()).await.expect("partial success");

        assert_eq!(success.videos[&ProviderId::Youtube].len(), 2);
        assert!(success.videos[&ProviderId::Twitter].is_empty());
        assert_eq!(success.videos[&ProviderId::Tiktok].len(), 1);
        assert!(success.is_partial());
        assert_eq!(success.total_videos(), 3);
        assert_eq!(success.errors.len(), 1);
        assert_eq!(success.errors[0].provider, ProviderId::Twitter);
        assert_eq!(success.errors[0].status, Some(503));
    }

    #[tokio::test]
    async fn all_failures_yield_aggregate_failure() {
        let aggregator = Aggregator::new(
            vec![
                StubSource::failing(
                    ProviderId::Youtube,
                    SourceError::configuration("youtube api key is not configured"),
                ),
                StubSource::failing(ProviderId::Twitter, SourceError::transport("refused")),
            ],
            Duration::from_secs(1),
        );

        let failure = aggregator.aggregate(&query()).await.expect_err("all failed");

        assert_eq!(failure.errors.len(), 2);
        assert!(failure.to_string().starts_with("all providers failed"));
    }

    #[tokio::test]
    async fn empty_registry_is_a_failure() {
        let aggregator = Aggregator::new(Vec::new(), Duration::from_secs(1));

        let failure = aggregator.aggregate(&query()).await.expect_err("nothing registered");
        assert!(failure.errors.is_empty());
        assert_eq!(failure.to_string(), "no providers are enabled");
    }

    #[tokio::test]
    async fn slow_provider_times_out_without_blocking_others() {
        let aggregator = Aggregator::new(
            vec![
                StubSource::slow(ProviderId::Youtube, Duration::from_secs(5)),
                StubSource::ok(ProviderId::Tiktok, 1),
            ],
            Duration::from_millis(50),
        );

        let success = aggregator.aggregate(&query()).await.expect("partial success");

        assert_eq!(success.errors.len(), 1);
        assert_eq!(success.errors[0].code, "source.timeout");
        assert_eq!(success.videos[&ProviderId::Tiktok].len(), 1);
        assert!(success.latency_ms < 5_000);
    }

    #[tokio::test]
    async fn fetch_one_rejects_unregistered_provider() {
        let aggregator = Aggregator::new(
            vec![StubSource::ok(ProviderId::Tiktok, 1)],
            Duration::from_secs(1),
        );

        let error = aggregator
            .fetch_one(ProviderId::Youtube, &query())
            .await
            .expect_err("youtube not registered");
        assert_eq!(error.kind(), SourceErrorKind::Configuration);

        let videos = aggregator
            .fetch_one(ProviderId::Tiktok, &query())
            .await
            .expect("tiktok registered");
        assert_eq!(videos.len(), 1);
    }

    #[tokio::test]
    async fn builder_honors_enable_switches_and_overrides() {
        let aggregator = AggregatorBuilder::new(AppConfig::default())
            .with_twitter_enabled(false)
            .with_source(StubSource::ok(ProviderId::Tiktok, 3))
            .build();

        assert_eq!(
            aggregator.providers(),
            vec![ProviderId::Youtube, ProviderId::Tiktok]
        );
        let tiktok = aggregator
            .descriptors()
            .into_iter()
            .find(|descriptor| descriptor.id == ProviderId::Tiktok)
            .expect("tiktok descriptor");
        assert_eq!(tiktok.auth, "none");
        let overridden = aggregator
            .fetch_one(ProviderId::Tiktok, &query())
            .await
            .expect("stub tiktok");
        assert_eq!(overridden.len(), 3);

        let only = AggregatorBuilder::new(AppConfig::default())
            .with_only(ProviderId::Twitter)
            .build();
        assert_eq!(only.providers(), vec![ProviderId::Twitter]);
        assert_eq!(only.provider_timeout(), Duration::from_millis(10_000));
    }
}
