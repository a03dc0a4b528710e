//! Video source trait and request/error types.
//!
//! Every provider adapter implements [`VideoSource`]. The aggregator and the
//! gateway only ever see this trait, so adding a provider never touches them.
//!
//! # Example
//!
//! ```rust,ignore
//! use trucktok_core::{VideoQuery, VideoSource, SourceError, TiktokAdapter};
//!
//! async fn print_titles(adapter: &TiktokAdapter) -> Result<(), SourceError> {
//!     let query = VideoQuery::new("custom trucks", 12)?;
//!     for video in adapter.fetch_videos(query).await? {
//!         println!("{} ({})", video.title(), video.views());
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::{ProviderId, ValidationError, VideoRecord};

/// Longest upstream body excerpt written to logs.
pub const DETAILS_LOG_LIMIT: usize = 512;

/// Search request passed to every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
    pub query: String,
    pub max_results: usize,
}

impl VideoQuery {
    pub fn new(query: impl Into<String>, max_results: usize) -> Result<Self, SourceError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(SourceError::invalid_request(
                ValidationError::EmptyQuery.to_string(),
            ));
        }
        if max_results == 0 {
            return Err(SourceError::invalid_request(
                ValidationError::ZeroMaxResults.to_string(),
            ));
        }
        Ok(Self {
            query: query.trim().to_owned(),
            max_results,
        })
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    /// Credentials missing; detected before any network call.
    Configuration,
    /// Upstream answered with a non-2xx status or refused a token exchange.
    Upstream,
    /// The request never produced a response.
    Transport,
    Timeout,
    InvalidRequest,
    Internal,
}

/// Structured source error surfaced by adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    status: Option<u16>,
    details: Option<String>,
    retryable: bool,
}

impl SourceError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Configuration, message, false)
    }

    /// Non-2xx upstream answer; the body is kept for diagnostics.
    pub fn upstream(message: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            kind: SourceErrorKind::Upstream,
            message: message.into(),
            status: Some(status),
            details: (!body.trim().is_empty()).then_some(body),
            retryable: status == 429 || status >= 500,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Transport, message, true)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Timeout, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::InvalidRequest, message, false)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Internal, message, false)
    }

    fn with_kind(kind: SourceErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            details: None,
            retryable,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Upstream body cut to [`DETAILS_LOG_LIMIT`] characters, for log fields.
    pub fn details_excerpt(&self) -> Option<&str> {
        self.details.as_deref().map(|details| {
            match details.char_indices().nth(DETAILS_LOG_LIMIT) {
                Some((end, _)) => &details[..end],
                None => details,
            }
        })
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Configuration => "source.configuration",
            SourceErrorKind::Upstream => "source.upstream",
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status}, {})", self.message, self.code()),
            None => write!(f, "{} ({})", self.message, self.code()),
        }
    }
}

impl std::error::Error for SourceError {}

/// Static description of an adapter, used by `sources` listings and `/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    pub id: ProviderId,
    /// Whether the credentials this adapter needs are present.
    pub configured: bool,
    /// Auth scheme label, e.g. `api_key` or `oauth1`.
    pub auth: &'static str,
    /// Whether results come from the real upstream.
    pub live: bool,
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<VideoRecord>, SourceError>> + Send + 'a>>;

/// Provider adapter contract.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`id`](VideoSource::id) | Provider tag stamped on every record |
/// | [`describe`](VideoSource::describe) | Configuration summary |
/// | [`fetch_videos`](VideoSource::fetch_videos) | Search and normalize |
///
/// Shape mismatches in an upstream answer are not errors: the adapter returns
/// an empty list. Missing credentials, non-2xx answers and transport failures
/// are errors.
pub trait VideoSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn describe(&self) -> SourceDescriptor;

    fn fetch_videos<'a>(&'a self, query: VideoQuery) -> FetchFuture<'a>;
}
