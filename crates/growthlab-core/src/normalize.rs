//! Recency-bounded views-per-day, channel baseline and relative performance

use crate::stats::median_by_index;
use crate::types::Upload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The channel's typical recent views-per-day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Baseline {
    /// Median of the baseline window
    Measured(f64),
    /// Window was empty
    Fallback,
}

impl Baseline {
    pub const FALLBACK_VALUE: f64 = 1.0;

    pub fn value(&self) -> f64 {
        match self {
            Baseline::Measured(v) => *v,
            Baseline::Fallback => Self::FALLBACK_VALUE,
        }
    }

    pub fn relative(&self, views_per_day: f64) -> f64 {
        let base = self.value();
        if base == 0.0 {
            0.0
        } else {
            views_per_day / base
        }
    }
}

/// A record carrying its recency-normalized performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord<T> {
    pub video: T,
    pub views_per_day: f64,
    pub relative_performance: f64,
}

impl<T: Upload> Upload for PerformanceRecord<T> {
    fn id(&self) -> &str {
        self.video.id()
    }

    fn title(&self) -> &str {
        self.video.title()
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.video.published_at()
    }

    fn views(&self) -> u64 {
        self.video.views()
    }
}

#[derive(Debug, Clone)]
pub struct Normalized<T> {
    /// Most recent first
    pub records: Vec<PerformanceRecord<T>>,
    pub baseline: Baseline,
}

/// Views divided by the video's age in whole days, bounded to `[1, cap]` so old
/// uploads are compared on early-life velocity. `None` disables the cap.
pub fn views_per_day(
    views: u64,
    published_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cap_days: Option<u32>,
) -> f64 {
    let age_days = (now - published_at).num_days().max(1);
    let window = match cap_days {
        Some(cap) => age_days.min(i64::from(cap.max(1))),
        None => age_days,
    };
    views as f64 / window as f64
}

pub fn normalize<T: Upload>(
    records: Vec<T>,
    baseline_window: usize,
    now: DateTime<Utc>,
    cap_days: Option<u32>,
) -> Normalized<T> {
    let mut rated: Vec<(T, f64)> = records
        .into_iter()
        .map(|r| {
            let vpd = views_per_day(r.views(), r.published_at(), now, cap_days);
            (r, vpd)
        })
        .collect();

    rated.sort_by_key(|(r, _)| std::cmp::Reverse(r.published_at()));

    let window: Vec<f64> = rated
        .iter()
        .take(baseline_window)
        .map(|(_, vpd)| *vpd)
        .collect();
    let baseline = match median_by_index(&window) {
        Some(v) => Baseline::Measured(v),
        None => Baseline::Fallback,
    };

    let records = rated
        .into_iter()
        .map(|(video, vpd)| PerformanceRecord {
            video,
            views_per_day: vpd,
            relative_performance: baseline.relative(vpd),
        })
        .collect();

    Normalized { records, baseline }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VideoRecord;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn video(id: &str, days_ago: i64, views: u64) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: format!("video {}", id),
            published_at: now() - Duration::days(days_ago),
            duration_seconds: 60,
            views,
            likes: 0,
            comments: 0,
        }
    }

    #[test]
    fn test_views_per_day_capped_window() {
        let published = now() - Duration::days(100);
        assert_eq!(views_per_day(1400, published, now(), Some(14)), 100.0);
        assert_eq!(views_per_day(1400, published, now(), None), 14.0);
    }

    #[test]
    fn test_views_per_day_minimum_one_day() {
        let published = now() - Duration::hours(3);
        assert_eq!(views_per_day(50, published, now(), Some(14)), 50.0);
        // Published "in the future" still counts as one day
        let future = now() + Duration::days(2);
        assert_eq!(views_per_day(50, future, now(), Some(14)), 50.0);
    }

    #[test]
    fn test_baseline_median_of_three() {
        // Ages of 20+ days cap at 14, so vpd = views / 14
        let records = vec![
            video("a", 30, 140),
            video("b", 20, 420),
            video("c", 25, 280),
        ];
        let out = normalize(records, 3, now(), Some(14));
        assert_eq!(out.baseline, Baseline::Measured(20.0));
        let ids: Vec<&str> = out.records.iter().map(|r| r.video.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        let rel: Vec<f64> = out.records.iter().map(|r| r.relative_performance).collect();
        assert_eq!(rel, vec![1.5, 1.0, 0.5]);
    }

    #[test]
    fn test_baseline_window_of_two_takes_index_one() {
        let records = vec![video("a", 20, 140), video("b", 21, 420)];
        let out = normalize(records, 2, now(), Some(14));
        assert_eq!(out.baseline.value(), 30.0);
    }

    #[test]
    fn test_baseline_window_of_one() {
        let records = vec![video("old", 40, 1400), video("new", 20, 280)];
        let out = normalize(records, 1, now(), Some(14));
        assert_eq!(out.baseline.value(), 20.0);
    }

    #[test]
    fn test_empty_input_falls_back() {
        let out = normalize(Vec::<VideoRecord>::new(), 20, now(), Some(14));
        assert_eq!(out.baseline, Baseline::Fallback);
        assert_eq!(out.baseline.value(), 1.0);
        assert!(out.records.is_empty());
    }

    #[test]
    fn test_zero_window_falls_back() {
        let out = normalize(vec![video("a", 20, 140)], 0, now(), Some(14));
        assert_eq!(out.baseline, Baseline::Fallback);
        assert_eq!(out.records[0].relative_performance, 10.0);
    }

    #[test]
    fn test_zero_baseline_gives_zero_relative() {
        let records = vec![video("a", 20, 0), video("b", 21, 0), video("c", 22, 280)];
        let out = normalize(records, 2, now(), Some(14));
        assert_eq!(out.baseline.value(), 0.0);
        assert!(out.records.iter().all(|r| r.relative_performance == 0.0));
    }

    #[test]
    fn test_baseline_follows_median_index_not_any_views() {
        let one_viewed = vec![video("a", 20, 0), video("b", 21, 0), video("c", 22, 70)];
        assert_eq!(normalize(one_viewed, 3, now(), Some(14)).baseline.value(), 0.0);

        let two_viewed = vec![video("a", 20, 0), video("b", 21, 70), video("c", 22, 140)];
        assert_eq!(normalize(two_viewed, 3, now(), Some(14)).baseline.value(), 5.0);
    }

    #[test]
    fn test_relative_is_exact_ratio() {
        let records = vec![
            video("a", 3, 977),
            video("b", 9, 12345),
            video("c", 50, 31),
            video("d", 1, 7),
        ];
        let out = normalize(records, 4, now(), Some(14));
        let base = out.baseline.value();
        assert!(base > 0.0);
        for r in &out.records {
            assert_eq!(r.relative_performance, r.views_per_day / base);
        }
    }
}
