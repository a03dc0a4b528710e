use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use trucktok_core::{AggregateFailure, ProviderId, SourceError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures a handler can report. Every variant renders as status 500 with
/// the fixed `{error, details}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", provider_message(*provider))]
    Provider {
        provider: ProviderId,
        #[source]
        source: SourceError,
    },

    #[error("Failed to fetch videos from all providers")]
    AllProvidersFailed(#[source] AggregateFailure),

    #[error("Failed to fetch videos from all providers")]
    AggregateQuery(#[source] SourceError),
}

impl ApiError {
    pub fn provider(provider: ProviderId, source: SourceError) -> Self {
        Self::Provider { provider, source }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::Provider { source, .. } => Some(source.to_string()),
            Self::AllProvidersFailed(failure) => Some(failure.to_string()),
            Self::AggregateQuery(source) => Some(source.to_string()),
        }
    }
}

/// Client-facing message for a single provider route. `/videos` keeps an
/// unbranded message.
pub fn provider_message(provider: ProviderId) -> String {
    match provider {
        ProviderId::Youtube => String::from("Failed to fetch videos"),
        other => format!("Failed to fetch {} videos", other.display_name()),
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Startup failures of the gateway binary.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] trucktok_core::ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
