use crate::video_source::{FetchFuture, SourceDescriptor, VideoQuery, VideoSource};
use crate::{ProviderId, VideoRecord};

/// Placeholder TikTok adapter. It never touches the network and always
/// returns the same catalog, cut to the requested size.
#[derive(Debug, Clone, Default)]
pub struct TiktokAdapter;

impl TiktokAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl VideoSource for TiktokAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Tiktok
    }

    fn describe(&self) -> SourceDescriptor {
        SourceDescriptor {
            id: ProviderId::Tiktok,
            configured: true,
            auth: "none",
            live: false,
        }
    }

    fn fetch_videos<'a>(&'a self, query: VideoQuery) -> FetchFuture<'a> {
        Box::pin(async move {
            tracing::debug!(query = %query.query, "serving static tiktok catalog");
            Ok(catalog().into_iter().take(query.max_results).collect())
        })
    }
}

fn catalog() -> Vec<VideoRecord> {
    vec![VideoRecord::new(
        ProviderId::Tiktok,
        "tiktok1",
        "Amazing Custom Truck Build #trucks",
        "https://www.tiktok.com/@truckbuilder/video/1",
    )
    .with_thumbnail(Some("https://picsum.photos/400/600"))
    .with_creator("@truckbuilder")
    .with_view_count(1_200_000)
    .with_duration("0:30")]
}
