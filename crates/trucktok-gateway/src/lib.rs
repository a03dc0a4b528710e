//! # Trucktok Gateway
//!
//! axum front end over [`trucktok_core::Aggregator`].
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /videos?q=` | YouTube search |
//! | `GET /twitter?q=` | Twitter search |
//! | `GET /tiktok?q=` | TikTok placeholder |
//! | `GET /search?q=` | Every provider, keyed by platform |
//! | `GET /health` | Liveness and provider configuration |
//!
//! The same routes are also mounted under `/api`. Successful searches answer
//! 200 with a JSON array of records; failures answer 500 with
//! `{"error": ..., "details": ...}`.

pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use trucktok_core::{AggregatorBuilder, AppConfig};

pub use error::{ApiError, ApiResult, ServeError};
pub use state::GatewayState;

fn routes() -> Router<GatewayState> {
    Router::new()
        .route("/videos", get(handlers::youtube_videos))
        .route("/twitter", get(handlers::twitter_videos))
        .route("/tiktok", get(handlers::tiktok_videos))
        .route("/search", get(handlers::search_all))
        .route("/health", get(handlers::health))
}

pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the adapters from `config` and serves until the listener fails.
pub async fn run(config: AppConfig) -> Result<(), ServeError> {
    let aggregator = AggregatorBuilder::new(config.clone()).build();
    for descriptor in aggregator.descriptors() {
        if descriptor.configured {
            tracing::info!(
                provider = descriptor.id.as_str(),
                auth = descriptor.auth,
                "provider enabled"
            );
        } else {
            tracing::warn!(
                provider = descriptor.id.as_str(),
                "provider has no credentials; its route will answer 500"
            );
        }
    }

    let addr = config.bind_addr.clone();
    let app = create_router(GatewayState::new(aggregator, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(%addr, "trucktok gateway listening");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServeError::Serve)
}
