use std::sync::Arc;

use serde::Deserialize;

use super::{execute_checked, parse_or_warn};
use crate::config::YoutubeConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::video_source::{
    FetchFuture, SourceDescriptor, SourceError, VideoQuery, VideoSource,
};
use crate::{format_iso_duration, parse_view_count, ProviderId, VideoRecord};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
/// "Autos & Vehicles".
const VIDEO_CATEGORY_ID: &str = "2";
const MAX_PAGE_SIZE: usize = 50;

/// YouTube Data API v3 adapter: a search call for candidate IDs followed by
/// a details call for snippet, statistics and duration.
#[derive(Clone)]
pub struct YoutubeAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    request_timeout_ms: u64,
}

impl YoutubeAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &YoutubeConfig) -> Self {
        Self {
            http_client,
            api_key: config.api_key.clone(),
            request_timeout_ms: 10_000,
        }
    }

    pub fn with_api_key(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self::new(
            http_client,
            &YoutubeConfig {
                api_key: Some(api_key.into()),
            },
        )
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    async fn search(&self, query: &VideoQuery) -> Result<Vec<VideoRecord>, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SourceError::configuration("youtube api key is not configured"))?;

        let search_request = HttpRequest::get(SEARCH_URL)
            .with_query("part", "snippet")
            .with_query(
                "maxResults",
                query.max_results.min(MAX_PAGE_SIZE).to_string(),
            )
            .with_query("q", query.query.as_str())
            .with_query("type", "video")
            .with_query("videoCategoryId", VIDEO_CATEGORY_ID)
            .with_query("key", api_key)
            .with_timeout_ms(self.request_timeout_ms);

        let response = execute_checked(
            &self.http_client,
            ProviderId::Youtube,
            search_request,
            "youtube search failed",
        )
        .await?;

        let Some(search) = parse_or_warn::<SearchResponse>(
            ProviderId::Youtube,
            &response.body,
            "search response",
        ) else {
            return Ok(Vec::new());
        };

        let ids = search
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| item.id.and_then(|id| id.video_id))
            .filter(|id| !id.is_empty())
            .collect::<Vec<_>>();

        if ids.is_empty() {
            tracing::debug!(query = %query.query, "youtube search returned no video ids");
            return Ok(Vec::new());
        }

        let details_request = HttpRequest::get(VIDEOS_URL)
            .with_query("part", "snippet,statistics,contentDetails")
            .with_query("id", ids.join(","))
            .with_query("key", api_key)
            .with_timeout_ms(self.request_timeout_ms);

        let response = execute_checked(
            &self.http_client,
            ProviderId::Youtube,
            details_request,
            "youtube video details failed",
        )
        .await?;

        let Some(details) = parse_or_warn::<VideosResponse>(
            ProviderId::Youtube,
            &response.body,
            "videos response",
        ) else {
            return Ok(Vec::new());
        };

        let records = details
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(VideoItem::into_record)
            .collect::<Vec<_>>();

        tracing::debug!(count = records.len(), "youtube videos normalized");
        Ok(records)
    }
}

impl VideoSource for YoutubeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Youtube
    }

    fn describe(&self) -> SourceDescriptor {
        SourceDescriptor {
            id: ProviderId::Youtube,
            configured: self.api_key.is_some(),
            auth: "api_key",
            live: true,
        }
    }

    fn fetch_videos<'a>(&'a self, query: VideoQuery) -> FetchFuture<'a> {
        Box::pin(async move { self.search(&query).await })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    items: Option<Vec<VideoItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: Option<String>,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
    published_at: Option<String>,
    channel_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    #[serde(rename = "default")]
    standard: Option<Thumbnail>,
}

impl Thumbnails {
    fn best_url(&self) -> Option<&str> {
        [&self.high, &self.medium, &self.standard]
            .into_iter()
            .flatten()
            .filter_map(|thumbnail| thumbnail.url.as_deref())
            .find(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl VideoItem {
    fn into_record(self) -> Option<VideoRecord> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let video_url = format!("https://www.youtube.com/watch?v={id}");
        let title = self.snippet.title.clone().unwrap_or_default();
        let view_count = self
            .statistics
            .view_count
            .as_deref()
            .map(parse_view_count)
            .unwrap_or(0);
        let like_count = self.statistics.like_count.as_deref().map(parse_view_count);
        let duration = format_iso_duration(
            self.content_details.duration.as_deref().unwrap_or_default(),
        );

        Some(
            VideoRecord::new(ProviderId::Youtube, id, title, video_url)
                .with_description(self.snippet.description.as_deref())
                .with_thumbnail(self.snippet.thumbnails.best_url())
                .with_published_at(self.snippet.published_at.as_deref())
                .with_creator(self.snippet.channel_title.unwrap_or_default())
                .with_view_count(view_count)
                .with_like_count(like_count)
                .with_duration(duration),
        )
    }
}
