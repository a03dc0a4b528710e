use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::{execute_checked, parse_or_warn};
use crate::config::{TwitterAuth, TwitterConfig};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::oauth::OAuth1Signer;
use crate::video_source::{
    FetchFuture, SourceDescriptor, SourceError, VideoQuery, VideoSource,
};
use crate::{format_millis_duration, ProviderId, VideoRecord};

const SEARCH_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
const TOKEN_URL: &str = "https://api.twitter.com/oauth2/token";
const MIN_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;

/// Twitter API v2 recent-search adapter restricted to tweets with video.
///
/// The auth strategy is fixed at construction; record mapping is the same for
/// every strategy.
#[derive(Clone)]
pub struct TwitterAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: Option<TwitterAuth>,
    request_timeout_ms: u64,
}

impl TwitterAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &TwitterConfig) -> Self {
        Self {
            http_client,
            auth: config.auth.clone(),
            request_timeout_ms: 10_000,
        }
    }

    pub fn with_auth(http_client: Arc<dyn HttpClient>, auth: TwitterAuth) -> Self {
        Self::new(http_client, &TwitterConfig { auth: Some(auth) })
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    fn search_request(&self, query: &VideoQuery) -> HttpRequest {
        HttpRequest::get(SEARCH_URL)
            .with_query("query", format!("{} has:videos", query.query))
            .with_query(
                "max_results",
                query
                    .max_results
                    .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
                    .to_string(),
            )
            .with_query("tweet.fields", "public_metrics,created_at,attachments")
            .with_query("expansions", "author_id,attachments.media_keys")
            .with_query(
                "media.fields",
                "preview_image_url,url,duration_ms,public_metrics",
            )
            .with_query("user.fields", "username")
            .with_timeout_ms(self.request_timeout_ms)
    }

    async fn authorize(
        &self,
        auth: &TwitterAuth,
        request: HttpRequest,
    ) -> Result<HttpRequest, SourceError> {
        match auth {
            TwitterAuth::StaticToken { bearer_token } => {
                Ok(request.with_auth(&HttpAuth::BearerToken(bearer_token.clone())))
            }
            TwitterAuth::ClientCredentials {
                api_key,
                api_secret,
            } => {
                let token = self.exchange_token(api_key, api_secret).await?;
                Ok(request.with_auth(&HttpAuth::BearerToken(token)))
            }
            TwitterAuth::RequestSigning(credentials) => {
                OAuth1Signer::new(credentials.clone()).sign(request)
            }
        }
    }

    /// Trades the app key and secret for a bearer token. Tokens are not
    /// reused across requests.
    async fn exchange_token(&self, api_key: &str, api_secret: &str) -> Result<String, SourceError> {
        let request = HttpRequest::post(TOKEN_URL)
            .with_auth(&HttpAuth::Basic {
                username: api_key.to_owned(),
                password: api_secret.to_owned(),
            })
            .with_form(&[("grant_type", "client_credentials")])
            .with_timeout_ms(self.request_timeout_ms);

        let response = execute_checked(
            &self.http_client,
            ProviderId::Twitter,
            request,
            "twitter token exchange failed",
        )
        .await?;

        serde_json::from_str::<TokenResponse>(&response.body)
            .ok()
            .and_then(|token| token.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::warn!("twitter token exchange returned no access token");
                SourceError::upstream(
                    "twitter token exchange returned no access token",
                    response.status,
                    "",
                )
            })
    }

    async fn search(&self, query: &VideoQuery) -> Result<Vec<VideoRecord>, SourceError> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| SourceError::configuration("twitter credentials are not configured"))?;

        let request = self.authorize(auth, self.search_request(query)).await?;
        let response = execute_checked(
            &self.http_client,
            ProviderId::Twitter,
            request,
            "twitter search failed",
        )
        .await?;

        let Some(search) =
            parse_or_warn::<SearchResponse>(ProviderId::Twitter, &response.body, "search response")
        else {
            return Ok(Vec::new());
        };

        let Some(tweets) = search.data else {
            tracing::debug!(query = %query.query, "twitter search returned no data");
            return Ok(Vec::new());
        };

        let includes = search.includes.unwrap_or_default();
        let media_by_key = includes
            .media
            .iter()
            .filter_map(|media| media.media_key.as_deref().map(|key| (key, media)))
            .collect::<HashMap<_, _>>();
        let usernames = includes
            .users
            .iter()
            .filter_map(|user| Some((user.id.as_deref()?, user.username.as_deref()?)))
            .collect::<HashMap<_, _>>();

        let records = tweets
            .iter()
            .filter_map(|tweet| tweet.to_record(&media_by_key, &usernames))
            .take(query.max_results)
            .collect::<Vec<_>>();

        tracing::debug!(count = records.len(), "twitter videos normalized");
        Ok(records)
    }
}

impl VideoSource for TwitterAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Twitter
    }

    fn describe(&self) -> SourceDescriptor {
        SourceDescriptor {
            id: ProviderId::Twitter,
            configured: self.auth.is_some(),
            auth: self.auth.as_ref().map_or("none", TwitterAuth::label),
            live: true,
        }
    }

    fn fetch_videos<'a>(&'a self, query: VideoQuery) -> FetchFuture<'a> {
        Box::pin(async move { self.search(&query).await })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<Vec<Tweet>>,
    includes: Option<Includes>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    media: Vec<Media>,
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    id: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: Option<String>,
    text: Option<String>,
    created_at: Option<String>,
    author_id: Option<String>,
    public_metrics: Option<Metrics>,
    attachments: Option<Attachments>,
}

#[derive(Debug, Deserialize)]
struct Attachments {
    #[serde(default)]
    media_keys: Vec<String>,
    #[serde(default)]
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
struct Media {
    media_key: Option<String>,
    preview_image_url: Option<String>,
    url: Option<String>,
    duration_ms: Option<u64>,
    public_metrics: Option<Metrics>,
}

#[derive(Debug, Deserialize)]
struct Metrics {
    view_count: Option<u64>,
}

impl Tweet {
    /// First attached media, inline or resolved through `includes.media`.
    fn first_media<'a>(&'a self, media_by_key: &HashMap<&str, &'a Media>) -> Option<&'a Media> {
        let attachments = self.attachments.as_ref()?;
        attachments.media.first().or_else(|| {
            attachments
                .media_keys
                .iter()
                .find_map(|key| media_by_key.get(key.as_str()).copied())
        })
    }

    fn to_record(
        &self,
        media_by_key: &HashMap<&str, &Media>,
        usernames: &HashMap<&str, &str>,
    ) -> Option<VideoRecord> {
        let id = self.id.as_deref().filter(|id| !id.is_empty())?;
        let text = self.text.clone().unwrap_or_default();
        let media = self.first_media(media_by_key);

        let author = self
            .author_id
            .as_deref()
            .map(|author_id| usernames.get(author_id).copied().unwrap_or(author_id))
            .unwrap_or("unknown");
        let view_count = self
            .public_metrics
            .as_ref()
            .and_then(|metrics| metrics.view_count)
            .or_else(|| {
                media
                    .and_then(|media| media.public_metrics.as_ref())
                    .and_then(|metrics| metrics.view_count)
            })
            .unwrap_or(0);
        let thumbnail = media.and_then(|media| {
            media
                .preview_image_url
                .as_deref()
                .or(media.url.as_deref())
        });
        let duration = format_millis_duration(
            media.and_then(|media| media.duration_ms).unwrap_or(0),
        );

        Some(
            VideoRecord::new(
                ProviderId::Twitter,
                id,
                text.clone(),
                format!("https://twitter.com/i/status/{id}"),
            )
            .with_description(Some(text.as_str()))
            .with_thumbnail(thumbnail)
            .with_published_at(self.created_at.as_deref())
            .with_creator(format!("@{author}"))
            .with_view_count(view_count)
            .with_duration(duration),
        )
    }
}
