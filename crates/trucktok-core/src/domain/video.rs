use serde::Serialize;

use super::format::{format_view_count, is_canonical_duration, DEFAULT_DURATION};
use crate::ProviderId;

/// Thumbnail used when a provider omits one.
pub const PLACEHOLDER_THUMBNAIL_URL: &str = "https://picsum.photos/400/300";

/// Canonical, provider-agnostic video metadata.
///
/// Fields are private so the derived pairs stay consistent: `views` is always
/// the rendering of `view_count`, and `description` falls back to `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    id: String,
    title: String,
    description: String,
    thumbnail_url: String,
    published_at: String,
    creator: String,
    views: String,
    view_count: String,
    duration: String,
    video_url: String,
    platform: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    like_count: Option<String>,
}

impl VideoRecord {
    /// Starts a record with every optional field at its documented default.
    pub fn new(
        platform: ProviderId,
        id: impl Into<String>,
        title: impl Into<String>,
        video_url: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            description: title.clone(),
            title,
            thumbnail_url: String::from(PLACEHOLDER_THUMBNAIL_URL),
            published_at: String::new(),
            creator: String::new(),
            views: format_view_count(0),
            view_count: String::from("0"),
            duration: String::from(DEFAULT_DURATION),
            video_url: video_url.into(),
            platform,
            like_count: None,
        }
    }

    /// Blank descriptions keep the title.
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        if let Some(description) = description.filter(|value| !value.trim().is_empty()) {
            self.description = description.to_owned();
        }
        self
    }

    /// Blank or missing thumbnails keep the placeholder.
    pub fn with_thumbnail(mut self, thumbnail_url: Option<&str>) -> Self {
        if let Some(url) = thumbnail_url.filter(|value| !value.trim().is_empty()) {
            self.thumbnail_url = url.to_owned();
        }
        self
    }

    pub fn with_published_at(mut self, published_at: Option<&str>) -> Self {
        self.published_at = published_at.unwrap_or_default().to_owned();
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Sets both the raw and the rendered count from one number.
    pub fn with_view_count(mut self, count: u64) -> Self {
        self.view_count = count.to_string();
        self.views = format_view_count(count);
        self
    }

    /// Accepts an already formatted duration; anything off-shape becomes `0:00`.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        let duration = duration.into();
        self.duration = if is_canonical_duration(&duration) {
            duration
        } else {
            String::from(DEFAULT_DURATION)
        };
        self
    }

    pub fn with_like_count(mut self, like_count: Option<u64>) -> Self {
        self.like_count = like_count.map(|count| count.to_string());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn thumbnail_url(&self) -> &str {
        &self.thumbnail_url
    }

    pub fn published_at(&self) -> &str {
        &self.published_at
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn views(&self) -> &str {
        &self.views
    }

    pub fn view_count(&self) -> &str {
        &self.view_count
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub const fn platform(&self) -> ProviderId {
        self.platform
    }

    pub fn like_count(&self) -> Option<&str> {
        self.like_count.as_deref()
    }
}
