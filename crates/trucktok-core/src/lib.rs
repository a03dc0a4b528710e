//! # Trucktok Core
//!
//! Provider adapters, canonical video records and multi-provider aggregation
//! for the trucktok short-video search service.
//!
//! ## Overview
//!
//! - **Canonical video record** every provider is normalized into
//! - **Unit formatters** for view counts and durations
//! - **Video source trait** implemented once per provider
//! - **Aggregator** that fans a query out and isolates per-provider failures
//! - **Configuration** loaded once from the environment
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | YouTube, Twitter and TikTok adapters |
//! | [`aggregator`] | Concurrent fan-out and merge |
//! | [`config`] | Environment-backed configuration |
//! | [`domain`] | `VideoRecord` and formatters |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`oauth`] | OAuth 1.0a request signing |
//! | [`source`] | Provider identifiers |
//! | [`video_source`] | Adapter trait and request/error types |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trucktok_core::{AggregatorBuilder, AppConfig, VideoQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let aggregator = AggregatorBuilder::new(config).build();
//!
//!     let query = VideoQuery::new("custom trucks", 12)?;
//!     match aggregator.aggregate(&query).await {
//!         Ok(success) => println!("{} videos", success.total_videos()),
//!         Err(failure) => eprintln!("{failure}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Gateway / CLI   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Aggregator    │  join-all + per-provider timeout
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Video Source    │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  VideoRecord    │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use trucktok_core::{SourceError, SourceErrorKind};
//!
//! fn handle_error(error: SourceError) {
//!     match error.kind() {
//!         SourceErrorKind::Configuration => {
//!             // Credentials missing for this provider
//!         }
//!         SourceErrorKind::Upstream => {
//!             // error.status() and error.details() describe the answer
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - Credentials are read from the environment once and never logged
//! - All HTTP requests use TLS via rustls

pub mod adapters;
pub mod aggregator;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod oauth;
pub mod source;
pub mod video_source;

#[cfg(test)]
mod test_support;

pub use adapters::{TiktokAdapter, TwitterAdapter, YoutubeAdapter};

pub use aggregator::{
    AggregateFailure, AggregateResult, AggregateSuccess, Aggregator, AggregatorBuilder,
    ProviderFailure,
};

pub use config::{
    AppConfig, TwitterAuth, TwitterConfig, YoutubeConfig, DEFAULT_BIND_ADDR, DEFAULT_MAX_RESULTS,
    DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_QUERY,
};

pub use domain::{
    format_iso_duration, format_millis_duration, format_view_count, is_canonical_duration,
    parse_view_count, VideoRecord, DEFAULT_DURATION, PLACEHOLDER_THUMBNAIL_URL,
};

pub use error::{ConfigError, ValidationError};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use oauth::{OAuth1Credentials, OAuth1Signer, SigningParams};

pub use source::ProviderId;

pub use video_source::{
    FetchFuture, SourceDescriptor, SourceError, SourceErrorKind, VideoQuery, VideoSource,
    DETAILS_LOG_LIMIT,
};
