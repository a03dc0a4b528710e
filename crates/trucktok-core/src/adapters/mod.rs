//! Provider adapters.
//!
//! | Adapter | Provider | Auth |
//! |---------|----------|------|
//! | [`YoutubeAdapter`] | YouTube Data API v3 | API key query parameter |
//! | [`TwitterAdapter`] | Twitter API v2 recent search | bearer, client credentials or OAuth 1.0a |
//! | [`TiktokAdapter`] | static placeholder | none |

mod tiktok;
mod twitter;
mod youtube;

pub use tiktok::TiktokAdapter;
pub use twitter::TwitterAdapter;
pub use youtube::YoutubeAdapter;

use std::sync::Arc;

use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::video_source::SourceError;
use crate::ProviderId;

/// Executes one upstream call and turns transport failures and non-2xx
/// answers into [`SourceError`]s.
pub(crate) async fn execute_checked(
    http_client: &Arc<dyn HttpClient>,
    provider: ProviderId,
    request: HttpRequest,
    failure_message: &str,
) -> Result<HttpResponse, SourceError> {
    tracing::debug!(
        provider = provider.as_str(),
        method = request.method.as_str(),
        url = %request.url,
        "issuing upstream request"
    );

    let response = http_client
        .execute(request)
        .await
        .map_err(|error| transport_error(provider, error))?;

    if !response.is_success() {
        let error = SourceError::upstream(failure_message, response.status, response.body);
        tracing::warn!(
            provider = provider.as_str(),
            status = response.status,
            details = error.details_excerpt().unwrap_or_default(),
            "{failure_message}"
        );
        return Err(error);
    }

    Ok(response)
}

fn transport_error(provider: ProviderId, error: HttpError) -> SourceError {
    tracing::warn!(provider = provider.as_str(), error = %error, "upstream transport failure");
    if error.timed_out() {
        SourceError::timeout(format!("{provider} request timed out: {}", error.message()))
    } else {
        SourceError::transport(format!("{provider} transport error: {}", error.message()))
    }
}

/// Parses an upstream body, degrading to `None` with a warning on a shape
/// mismatch.
pub(crate) fn parse_or_warn<T>(provider: ProviderId, body: &str, what: &str) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    match serde_json::from_str(body) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            tracing::warn!(
                provider = provider.as_str(),
                error = %error,
                "unexpected {what} shape, returning no results"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block_on, CapturedLogs, ScriptedHttpClient};

    #[test]
    fn rejected_request_logs_upstream_body() {
        let client: Arc<dyn HttpClient> = Arc::new(ScriptedHttpClient::new(vec![Ok(
            HttpResponse::new(429, r#"{"title":"Too Many Requests"}"#),
        )]));
        let logs = CapturedLogs::default();

        let error = tracing::subscriber::with_default(logs.subscriber(), || {
            block_on(execute_checked(
                &client,
                ProviderId::Twitter,
                HttpRequest::get("https://api.twitter.com/2/tweets/search/recent"),
                "twitter search failed",
            ))
        })
        .expect_err("429 is an upstream error");

        assert_eq!(error.status(), Some(429));
        let output = logs.contents();
        assert!(output.contains("status=429"), "{output}");
        assert!(output.contains("Too Many Requests"), "{output}");
    }

    #[test]
    fn transport_timeout_maps_to_timeout_kind() {
        let client: Arc<dyn HttpClient> = Arc::new(ScriptedHttpClient::new(vec![Err(
            HttpError::timeout("deadline elapsed"),
        )]));

        let error = block_on(execute_checked(
            &client,
            ProviderId::Youtube,
            HttpRequest::get("https://www.googleapis.com/youtube/v3/search"),
            "youtube search failed",
        ))
        .expect_err("timeout");

        assert_eq!(error.kind(), crate::SourceErrorKind::Timeout);
        assert!(error.retryable());
    }
}
