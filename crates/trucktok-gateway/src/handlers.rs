use std::collections::BTreeMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use trucktok_core::{ProviderId, SourceDescriptor, SourceError, VideoRecord};

use crate::error::{ApiError, ApiResult};
use crate::state::GatewayState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Query extraction that leaves a malformed query string to [`ApiError`]
/// instead of axum's plain-text 400.
pub type SearchQuery = Result<Query<SearchParams>, QueryRejection>;

fn search_params(params: SearchQuery) -> Result<SearchParams, SourceError> {
    params.map(|Query(params)| params).map_err(|rejection| {
        let reason = rejection.body_text();
        tracing::warn!(reason = %reason, "query string rejected");
        SourceError::invalid_request(reason)
    })
}

/// `GET /videos`
pub async fn youtube_videos(
    State(state): State<GatewayState>,
    params: SearchQuery,
) -> ApiResult<Json<Vec<VideoRecord>>> {
    provider_videos(&state, ProviderId::Youtube, params).await
}

/// `GET /twitter`
pub async fn twitter_videos(
    State(state): State<GatewayState>,
    params: SearchQuery,
) -> ApiResult<Json<Vec<VideoRecord>>> {
    provider_videos(&state, ProviderId::Twitter, params).await
}

/// `GET /tiktok`
pub async fn tiktok_videos(
    State(state): State<GatewayState>,
    params: SearchQuery,
) -> ApiResult<Json<Vec<VideoRecord>>> {
    provider_videos(&state, ProviderId::Tiktok, params).await
}

async fn provider_videos(
    state: &GatewayState,
    provider: ProviderId,
    params: SearchQuery,
) -> ApiResult<Json<Vec<VideoRecord>>> {
    let query = search_params(params)
        .and_then(|params| state.query(params.q.as_deref()))
        .map_err(|error| ApiError::provider(provider, error))?;

    match state.aggregator.fetch_one(provider, &query).await {
        Ok(videos) => {
            tracing::info!(
                provider = provider.as_str(),
                query = %query.query,
                count = videos.len(),
                "search served"
            );
            Ok(Json(videos))
        }
        Err(error) => {
            tracing::error!(
                provider = provider.as_str(),
                query = %query.query,
                code = error.code(),
                status = error.status(),
                details = error.details_excerpt().unwrap_or_default(),
                "search failed: {}",
                error.message()
            );
            Err(ApiError::provider(provider, error))
        }
    }
}

/// `GET /search`: every enabled provider, keyed by platform tag.
pub async fn search_all(
    State(state): State<GatewayState>,
    params: SearchQuery,
) -> ApiResult<Json<BTreeMap<ProviderId, Vec<VideoRecord>>>> {
    let query = search_params(params)
        .and_then(|params| state.query(params.q.as_deref()))
        .map_err(ApiError::AggregateQuery)?;

    match state.aggregator.aggregate(&query).await {
        Ok(success) => {
            for failure in &success.errors {
                tracing::warn!(
                    provider = failure.provider.as_str(),
                    code = failure.code,
                    details = failure.details.as_deref().unwrap_or_default(),
                    "provider dropped from aggregate: {}",
                    failure.message
                );
            }
            Ok(Json(success.videos))
        }
        Err(failure) => {
            tracing::error!(failed = failure.errors.len(), "aggregate search failed");
            Err(ApiError::AllProvidersFailed(failure))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<SourceDescriptor>,
}

/// `GET /health`
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: state.aggregator.descriptors(),
    })
}
