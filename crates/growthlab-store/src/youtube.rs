//! Import saved YouTube Data API `videos.list` responses

use anyhow::Context;
use chrono::{DateTime, Utc};
use growthlab_core::VideoRecord;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

static DURATION_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Default, Deserialize)]
struct VideosPage {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Pages(Vec<VideosPage>),
    Page(VideosPage),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<Value>,
    like_count: Option<Value>,
    comment_count: Option<Value>,
}

/// Seconds in an ISO-8601 duration such as `PT1H2M3S` or `P1DT2H`.
/// Calendar years and months are rejected.
pub fn parse_duration(text: &str) -> Option<u64> {
    let re = DURATION_RE.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
        )
        .unwrap()
    });
    let caps = re.captures(text.trim())?;
    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let seconds = part(1) * 604_800.0 + part(2) * 86_400.0 + part(3) * 3_600.0 + part(4) * 60.0
        + part(5);
    Some(seconds as u64)
}

/// API counts arrive as strings; missing or malformed values count as zero
fn lenient_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

impl VideoItem {
    fn into_record(self, imported_at: DateTime<Utc>) -> anyhow::Result<VideoRecord> {
        let published_at = match self.snippet.published_at.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("video {}: bad publishedAt {raw:?}", self.id))?
                .with_timezone(&Utc),
            None => imported_at,
        };

        let duration_seconds = match self.content_details.duration.as_deref() {
            Some(raw) => parse_duration(raw).unwrap_or_else(|| {
                warn!(video = %self.id, duration = raw, "Unparseable duration, using 0");
                0
            }),
            None => 0,
        };

        Ok(VideoRecord {
            views: lenient_count(self.statistics.view_count.as_ref()),
            likes: lenient_count(self.statistics.like_count.as_ref()),
            comments: lenient_count(self.statistics.comment_count.as_ref()),
            id: self.id,
            title: self.snippet.title,
            published_at,
            duration_seconds,
        })
    }
}

/// Parse one `videos.list` page or an array of pages into records, in
/// payload order. Videos without a publish time get `imported_at`.
pub fn parse_videos_payload(json: &str, imported_at: DateTime<Utc>) -> anyhow::Result<Vec<VideoRecord>> {
    let payload: Payload = serde_json::from_str(json).context("not a videos.list payload")?;
    let pages = match payload {
        Payload::Pages(pages) => pages,
        Payload::Page(page) => vec![page],
    };
    pages
        .into_iter()
        .flat_map(|page| page.items)
        .map(|item| item.into_record(imported_at))
        .collect()
}
