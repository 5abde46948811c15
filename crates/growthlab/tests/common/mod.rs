#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use growthlab_core::{ChannelIdentity, PerformanceRecord, VideoRecord};
use growthlab_topics::{EmbedError, Embedder};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn sample_channel() -> ChannelIdentity {
    ChannelIdentity {
        channel_id: "UCfixture01".to_string(),
        title: "Bread & Bikes".to_string(),
        thumbnail_url: "https://example.com/thumb.jpg".to_string(),
    }
}

/// Maps each title to a fixed unit vector by its first word, so clustering
/// is exact and needs no model download
pub struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts
            .iter()
            .map(|t| match t.split_whitespace().next() {
                Some("Bread") => vec![1.0, 0.0, 0.0],
                Some("Bike") => vec![0.0, 1.0, 0.0],
                _ => vec![0.0, 0.0, 1.0],
            })
            .collect())
    }
}

/// Two content families with varied packaging, newest first
pub fn catalog(n: usize) -> Vec<VideoRecord> {
    (0..n)
        .map(|i| {
            let bread = i % 2 == 0;
            let question = i % 3 == 0;
            let title = match (bread, question) {
                (true, true) => format!("Bread hydration explained, part {}?", i),
                (true, false) => format!("Bread scoring for beginners {}", i),
                (false, true) => format!("Bike chain wear: replace at {}%?", i),
                (false, false) => format!("Bike fitting basics [{}]", i),
            };
            let base_views = if bread { 4_000 } else { 2_500 };
            let views = base_views + (i as u64 * 137) % 1_900 + if question { 1_200 } else { 0 };
            VideoRecord {
                id: format!("vid{:03}", i),
                title,
                published_at: now() - Duration::days(2 + 3 * i as i64) - Duration::hours((i * 5 % 24) as i64),
                duration_seconds: 300 + (i as u64 * 83) % 900,
                views,
                likes: views / 25,
                comments: views / 180,
            }
        })
        .collect()
}

/// Rows already normalized, newest first, with the given relative performance
/// listed oldest first
pub fn topic_rows(title: &str, rel_oldest_first: &[f64]) -> Vec<PerformanceRecord<VideoRecord>> {
    let n = rel_oldest_first.len();
    rel_oldest_first
        .iter()
        .enumerate()
        .rev()
        .map(|(i, &rp)| PerformanceRecord {
            video: VideoRecord {
                id: format!("t{}", i),
                title: format!("{} #{}", title, i),
                published_at: now() - Duration::days((n - i) as i64 * 7),
                duration_seconds: 600,
                views: (rp * 1_000.0) as u64,
                likes: 10,
                comments: 1,
            },
            views_per_day: rp * 100.0,
            relative_performance: rp,
        })
        .collect()
}
