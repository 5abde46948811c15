//! Per-topic performance summaries, catch-all merging and ranking

use growthlab_core::stats::{index_slope, mean, median, pstdev};
use growthlab_core::{PerformanceRecord, TopicConfig, TopicSummary, Upload};

pub const MISC_TOPIC_ID: i64 = -1;
pub const MISC_LABEL: &str = "Misc / One-offs";

const MISC_CONFIDENCE: f64 = 0.3;
const MISC_EXAMPLES: usize = 5;
const TOP_EXAMPLES: usize = 3;

/// Shortest title (first wins ties), truncated to `max_chars` characters
pub fn label_topic<'a>(titles: impl IntoIterator<Item = &'a str>, max_chars: usize) -> String {
    let mut best: Option<&str> = None;
    for title in titles {
        let shorter = match best {
            Some(current) => title.chars().count() < current.chars().count(),
            None => true,
        };
        if shorter {
            best = Some(title);
        }
    }
    match best {
        Some(title) => title.chars().take(max_chars).collect(),
        None => "Misc".to_string(),
    }
}

pub fn is_fatigued(momentum: f64, n_videos: usize, cfg: &TopicConfig) -> bool {
    momentum < -cfg.fatigue_drop && n_videos >= cfg.fatigue_min_videos
}

/// Summarize one topic's members, ordered oldest first internally
pub fn summarize_topic<T: Upload>(
    topic_id: i64,
    label: String,
    members: &[&PerformanceRecord<T>],
    cfg: &TopicConfig,
) -> TopicSummary {
    let mut items: Vec<&PerformanceRecord<T>> = members.to_vec();
    items.sort_by_key(|r| r.published_at());

    let n = items.len();
    let rel: Vec<f64> = items.iter().map(|r| r.relative_performance).collect();
    let vpd: Vec<f64> = items.iter().map(|r| r.views_per_day).collect();

    let k = (n / 2).clamp(1, 3).min(n);
    let older = &rel[..k];
    let recent = &rel[n - k..];
    let older_avg = mean(older);
    let recent_avg = mean(recent);
    let momentum = recent_avg - older_avg;
    let volatility = pstdev(&rel);

    let hit_rate = if n == 0 {
        0.0
    } else {
        rel.iter().filter(|&&r| r >= 1.0).count() as f64 / n as f64
    };

    TopicSummary {
        topic_id,
        label,
        n_videos: n,
        avg_relative_performance: mean(&rel),
        median_relative_performance: median(&rel),
        avg_views_per_day: mean(&vpd),
        volatility,
        hit_rate,
        best_recent: recent.iter().copied().reduce(f64::max).unwrap_or(0.0),
        worst_recent: recent.iter().copied().reduce(f64::min).unwrap_or(0.0),
        recent_avg_relative_performance: recent_avg,
        older_avg_relative_performance: older_avg,
        momentum,
        trend_slope: index_slope(&rel),
        fatigue: is_fatigued(momentum, n, cfg),
        confidence: (n as f64 / 10.0).min(1.0) * (-volatility).exp(),
        top_examples: items
            .iter()
            .take(TOP_EXAMPLES)
            .map(|r| r.title().to_string())
            .collect(),
    }
}

/// Fold topics smaller than `min_topic_size` into one catch-all summary.
/// Returns the kept topics (catch-all last) and the ids that were merged.
pub fn merge_singletons(
    summaries: Vec<TopicSummary>,
    cfg: &TopicConfig,
) -> (Vec<TopicSummary>, Vec<i64>) {
    let (mut kept, small): (Vec<_>, Vec<_>) = summaries
        .into_iter()
        .partition(|t| t.n_videos >= cfg.min_topic_size);
    if small.is_empty() {
        return (kept, Vec::new());
    }

    let rel: Vec<f64> = small.iter().map(|t| t.avg_relative_performance).collect();
    let vpd: Vec<f64> = small.iter().map(|t| t.avg_views_per_day).collect();
    let merged_ids = small.iter().map(|t| t.topic_id).collect();

    kept.push(TopicSummary {
        topic_id: MISC_TOPIC_ID,
        label: MISC_LABEL.to_string(),
        n_videos: small.iter().map(|t| t.n_videos).sum(),
        avg_relative_performance: mean(&rel),
        median_relative_performance: median(&rel),
        avg_views_per_day: mean(&vpd),
        volatility: pstdev(&rel),
        hit_rate: 0.0,
        best_recent: rel.iter().copied().fold(f64::MIN, f64::max),
        worst_recent: rel.iter().copied().fold(f64::MAX, f64::min),
        recent_avg_relative_performance: 0.0,
        older_avg_relative_performance: 0.0,
        momentum: 0.0,
        trend_slope: 0.0,
        fatigue: false,
        confidence: MISC_CONFIDENCE,
        top_examples: small
            .into_iter()
            .flat_map(|t| t.top_examples)
            .take(MISC_EXAMPLES)
            .collect(),
    });
    (kept, merged_ids)
}

/// 0.6·momentum + 0.3 when momentum is positive + 0.1·ln(1 + n)
pub fn topic_score(topic: &TopicSummary) -> f64 {
    let recency_boost = if topic.momentum > 0.0 { 1.0 } else { 0.0 };
    0.6 * topic.momentum + 0.3 * recency_boost + 0.1 * (topic.n_videos as f64).ln_1p()
}

/// Highest score first; equal scores keep their order
pub fn rank_topics(mut topics: Vec<TopicSummary>) -> Vec<TopicSummary> {
    topics.sort_by(|a, b| topic_score(b).total_cmp(&topic_score(a)));
    topics
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use growthlab_core::VideoRecord;

    fn record(i: i64, title: &str, rp: f64) -> PerformanceRecord<VideoRecord> {
        PerformanceRecord {
            video: VideoRecord {
                id: format!("v{i}"),
                title: title.to_string(),
                published_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
                    + Duration::days(i),
                duration_seconds: 300,
                views: 1000,
                likes: 10,
                comments: 1,
            },
            views_per_day: rp * 100.0,
            relative_performance: rp,
        }
    }

    fn topic(id: i64, n: usize, rel: f64, momentum: f64) -> TopicSummary {
        TopicSummary {
            topic_id: id,
            label: format!("t{id}"),
            n_videos: n,
            avg_relative_performance: rel,
            median_relative_performance: rel,
            avg_views_per_day: rel * 10.0,
            volatility: 0.1,
            hit_rate: 1.0,
            best_recent: rel,
            worst_recent: rel,
            recent_avg_relative_performance: rel,
            older_avg_relative_performance: rel,
            momentum,
            trend_slope: 0.0,
            fatigue: false,
            confidence: 0.5,
            top_examples: vec![format!("title {id}")],
        }
    }

    #[test]
    fn test_label_shortest_title() {
        assert_eq!(label_topic(["Long title here", "Short", "Tiny!"], 60), "Short");
        assert_eq!(label_topic(std::iter::empty(), 60), "Misc");
        assert_eq!(label_topic(["ééééé"], 3), "ééé");
    }

    #[test]
    fn test_summary_momentum_and_windows() {
        // published oldest → newest: 1.0, 1.0, 0.5, 0.5, 0.5, 0.5
        let rows: Vec<_> = [1.0, 1.0, 0.5, 0.5, 0.5, 0.5]
            .iter()
            .enumerate()
            .map(|(i, &rp)| record(i as i64, &format!("Bread {i}"), rp))
            .collect();
        // hand the members over newest first
        let members: Vec<&_> = rows.iter().rev().collect();
        let t = summarize_topic(0, "Bread".into(), &members, &TopicConfig::default());

        assert_eq!(t.n_videos, 6);
        assert!((t.older_avg_relative_performance - 2.5 / 3.0).abs() < 1e-12);
        assert_eq!(t.recent_avg_relative_performance, 0.5);
        assert!(t.momentum < -0.15);
        assert!(t.fatigue);
        assert!((t.hit_rate - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(t.best_recent, 0.5);
        assert_eq!(t.worst_recent, 0.5);
        assert!(t.trend_slope < 0.0);
        assert_eq!(t.top_examples, vec!["Bread 0", "Bread 1", "Bread 2"]);
    }

    #[test]
    fn test_near_duplicate_topic_is_stable() {
        let rows: Vec<_> = (0..5)
            .map(|i| record(i, "How to bake sourdough", 1.0))
            .collect();
        let members: Vec<&_> = rows.iter().collect();
        let t = summarize_topic(0, "How to bake sourdough".into(), &members, &TopicConfig::default());
        assert_eq!(t.momentum, 0.0);
        assert_eq!(t.volatility, 0.0);
        assert!(!t.fatigue);
        assert_eq!(t.hit_rate, 1.0);
        assert!((t.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_member_topic() {
        let rows = vec![record(0, "Solo", 2.0)];
        let members: Vec<&_> = rows.iter().collect();
        let t = summarize_topic(4, "Solo".into(), &members, &TopicConfig::default());
        assert_eq!(t.older_avg_relative_performance, 2.0);
        assert_eq!(t.recent_avg_relative_performance, 2.0);
        assert_eq!(t.momentum, 0.0);
        assert_eq!(t.volatility, 0.0);
        assert!((t.confidence - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_fatigue_threshold() {
        let cfg = TopicConfig::default();
        assert!(!is_fatigued(-0.15, 4, &cfg));
        assert!(is_fatigued(-0.16, 4, &cfg));
        assert!(!is_fatigued(-0.5, 3, &cfg));
    }

    #[test]
    fn test_merge_singletons() {
        let summaries = vec![
            topic(0, 4, 1.2, 0.0),
            topic(1, 1, 2.0, 0.0),
            topic(2, 1, 0.5, 0.0),
        ];
        let (kept, merged) = merge_singletons(summaries, &TopicConfig::default());
        assert_eq!(merged, vec![1, 2]);
        assert_eq!(kept.len(), 2);

        let misc = &kept[1];
        assert_eq!(misc.topic_id, MISC_TOPIC_ID);
        assert_eq!(misc.label, MISC_LABEL);
        assert_eq!(misc.n_videos, 2);
        assert_eq!(misc.avg_relative_performance, 1.25);
        assert_eq!(misc.median_relative_performance, 1.25);
        assert_eq!(misc.volatility, 0.75);
        assert_eq!(misc.best_recent, 2.0);
        assert_eq!(misc.worst_recent, 0.5);
        assert_eq!(misc.confidence, 0.3);
        assert_eq!(misc.hit_rate, 0.0);
        assert_eq!(misc.top_examples, vec!["title 1", "title 2"]);
    }

    #[test]
    fn test_merge_without_singletons() {
        let (kept, merged) = merge_singletons(vec![topic(0, 3, 1.0, 0.0)], &TopicConfig::default());
        assert_eq!(kept.len(), 1);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_rank_topics() {
        let ranked = rank_topics(vec![
            topic(0, 10, 1.0, -0.1),
            topic(1, 3, 1.0, 0.3),
            topic(2, 3, 1.0, 0.0),
        ]);
        let ids: Vec<i64> = ranked.iter().map(|t| t.topic_id).collect();
        assert_eq!(ids, vec![1, 0, 2]);
        assert!((topic_score(&ranked[0]) - (0.18 + 0.3 + 0.1 * 4f64.ln())).abs() < 1e-12);
    }
}
