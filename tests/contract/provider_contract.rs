use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use trucktok_core::{
    format_view_count, HttpClient, HttpError, HttpRequest, HttpResponse, ProviderId,
    TiktokAdapter, TwitterAdapter, TwitterAuth, VideoQuery, VideoSource, YoutubeAdapter,
};

const YOUTUBE_SEARCH: &str = r#"{"items":[{"id":{"videoId":"yt1"}},{"id":{"videoId":"yt2"}}]}"#;
const YOUTUBE_VIDEOS: &str = r#"{"items":[
    {"id":"yt1","snippet":{"title":"Cummins swap","description":"","channelTitle":"Shop",
     "publishedAt":"2024-01-01T00:00:00Z","thumbnails":{"high":{"url":"https://i.ytimg.com/yt1.jpg"}}},
     "statistics":{"viewCount":"987654","likeCount":"12"},"contentDetails":{"duration":"PT12M5S"}},
    {"id":"yt2","snippet":{"title":"Overnight build"},"statistics":{"viewCount":"not-a-number"},
     "contentDetails":{"duration":"garbage"}}
]}"#;
const TWITTER_SEARCH: &str = r#"{
    "data":[
        {"id":"t1","text":"Lowered C10","author_id":"1","public_metrics":{"view_count":15320},
         "attachments":{"media_keys":["m1"]},"created_at":"2024-02-02T00:00:00.000Z"},
        {"id":"t2","text":"No media at all","author_id":"2"}
    ],
    "includes":{"media":[{"media_key":"m1","preview_image_url":"https://pbs.twimg.com/m1.jpg","duration_ms":3725000}],
                "users":[{"id":"1","username":"c10club"}]}
}"#;

/// Answers by endpoint so every adapter can share one fixture transport.
#[derive(Debug, Default)]
struct FixtureHttpClient;

impl HttpClient for FixtureHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let body = if request.url.ends_with("/youtube/v3/search") {
            Some(YOUTUBE_SEARCH)
        } else if request.url.ends_with("/youtube/v3/videos") {
            Some(YOUTUBE_VIDEOS)
        } else if request.url.ends_with("/tweets/search/recent") {
            Some(TWITTER_SEARCH)
        } else {
            None
        };
        let response = match body {
            Some(body) => Ok(HttpResponse::ok_json(body)),
            None => Ok(HttpResponse::new(404, "unknown fixture")),
        };
        Box::pin(async move { response })
    }
}

fn sources() -> Vec<Arc<dyn VideoSource>> {
    let http_client: Arc<dyn HttpClient> = Arc::new(FixtureHttpClient);
    vec![
        Arc::new(YoutubeAdapter::with_api_key(
            Arc::clone(&http_client),
            "fixture-key",
        )),
        Arc::new(TwitterAdapter::with_auth(
            Arc::clone(&http_client),
            TwitterAuth::StaticToken {
                bearer_token: String::from("fixture-token"),
            },
        )),
        Arc::new(TiktokAdapter::new()),
    ]
}

fn is_canonical_duration(value: &str) -> bool {
    let parts = value.split(':').collect::<Vec<_>>();
    (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
        && parts.last().map(|last| last.len() == 2).unwrap_or(false)
}

#[test]
fn every_adapter_produces_complete_canonical_records() {
    let query = VideoQuery::new("custom trucks", 12).expect("valid query");

    for source in sources() {
        let provider = source.id();
        let videos = block_on(source.fetch_videos(query.clone()))
            .unwrap_or_else(|error| panic!("provider '{provider}' fetch failed: {error}"));
        assert!(!videos.is_empty(), "provider '{provider}': no records");

        for video in &videos {
            assert_eq!(video.platform(), provider, "provider '{provider}': platform tag");
            assert!(!video.id().is_empty(), "provider '{provider}': id");
            assert!(
                video.view_count().chars().all(|ch| ch.is_ascii_digit()),
                "provider '{provider}': viewCount '{}' is not digits",
                video.view_count()
            );
            let raw = video.view_count().parse::<u64>().expect("digits parse");
            assert_eq!(
                video.views(),
                format_view_count(raw),
                "provider '{provider}': views out of sync"
            );
            assert!(
                is_canonical_duration(video.duration()),
                "provider '{provider}': duration '{}'",
                video.duration()
            );
            assert!(video.thumbnail_url().starts_with("https://"));
            assert!(video.video_url().starts_with("https://"));
            assert!(!video.description().is_empty() || video.title().is_empty());

            let value = serde_json::to_value(video).expect("record serializes");
            for field in [
                "id",
                "title",
                "description",
                "thumbnailUrl",
                "publishedAt",
                "creator",
                "views",
                "viewCount",
                "duration",
                "videoUrl",
                "platform",
            ] {
                assert!(
                    value.get(field).is_some(),
                    "provider '{provider}': field '{field}' missing"
                );
            }
            assert_eq!(value["platform"], provider.as_str());
        }
    }
}

#[test]
fn adapters_degrade_missing_upstream_values_to_defaults() {
    let query = VideoQuery::new("custom trucks", 12).expect("valid query");
    let sources = sources();

    let youtube = block_on(sources[0].fetch_videos(query.clone())).expect("youtube fixture");
    assert_eq!(youtube[0].duration(), "12:05");
    assert_eq!(youtube[0].views(), "987.7K");
    assert_eq!(youtube[1].views(), "0");
    assert_eq!(youtube[1].duration(), "0:00");
    assert_eq!(youtube[1].description(), "Overnight build");

    let twitter = block_on(sources[1].fetch_videos(query)).expect("twitter fixture");
    assert_eq!(twitter[0].duration(), "62:05");
    assert_eq!(twitter[0].views(), "15.3K");
    assert_eq!(twitter[0].creator(), "@c10club");
    assert_eq!(twitter[1].duration(), "0:00");
    assert_eq!(twitter[1].view_count(), "0");
}

#[test]
fn descriptors_report_each_provider_once() {
    let descriptors = sources()
        .iter()
        .map(|source| source.describe())
        .collect::<Vec<_>>();

    let ids = descriptors.iter().map(|d| d.id).collect::<Vec<_>>();
    assert_eq!(ids, ProviderId::ALL.to_vec());
    assert!(descriptors.iter().all(|d| d.configured));
    assert_eq!(descriptors[1].auth, "bearer");
}

fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    let waker = noop_waker();
    let mut context = Context::from_waker(&waker);
    let mut future = std::pin::pin!(future);

    loop {
        match future.as_mut().poll(&mut context) {
            Poll::Ready(output) => return output,
            Poll::Pending => std::thread::yield_now(),
        }
    }
}

fn noop_waker() -> Waker {
    // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

fn noop_raw_waker() -> RawWaker {
    RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
}

unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
    noop_raw_waker()
}

unsafe fn noop_raw_waker_wake(_: *const ()) {}

unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

unsafe fn noop_raw_waker_drop(_: *const ()) {}

static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
    noop_raw_waker_clone,
    noop_raw_waker_wake,
    noop_raw_waker_wake_by_ref,
    noop_raw_waker_drop,
);
