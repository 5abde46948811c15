//! Result types returned to collaborators and persisted as JSON

use crate::types::ChannelIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub channel_id: String,
    /// Videos requested from the source
    pub n_videos: usize,
    /// Videos the source actually returned
    #[serde(default)]
    pub videos_fetched: usize,
    pub baseline_window: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub videos_analyzed: usize,
    pub baseline_views_per_day: f64,
    pub median_relative_performance: f64,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub views_per_day: f64,
    pub relative_performance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub fn of(effect_percent: f64) -> Self {
        if effect_percent >= 0.0 {
            Direction::Increase
        } else {
            Direction::Decrease
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEffect {
    pub feature: String,
    pub effect_percent: f64,
    pub unit_change: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    /// Map a mean cross-validated R² onto a label
    pub fn from_r2(r2_mean: f64) -> Self {
        if r2_mean >= 0.30 {
            Confidence::High
        } else if r2_mean >= 0.10 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
    #[serde(default)]
    pub expected_impact_percent: Option<f64>,
    #[serde(default)]
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub model: String,
    pub target: String,
    pub cv_r2_mean: f64,
    pub cv_r2_std: f64,
    pub n_train: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub video_id: String,
    pub topic_id: i64,
    pub topic_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic_id: i64,
    pub label: String,
    pub n_videos: usize,

    pub avg_relative_performance: f64,
    pub median_relative_performance: f64,
    pub avg_views_per_day: f64,
    pub volatility: f64,

    /// Share of videos at or above baseline
    #[serde(default)]
    pub hit_rate: f64,
    #[serde(default)]
    pub best_recent: f64,
    #[serde(default)]
    pub worst_recent: f64,

    #[serde(default)]
    pub recent_avg_relative_performance: f64,
    #[serde(default)]
    pub older_avg_relative_performance: f64,
    #[serde(default)]
    pub momentum: f64,
    #[serde(default)]
    pub trend_slope: f64,
    #[serde(default)]
    pub fatigue: bool,
    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub top_examples: Vec<String>,
}

/// Full analysis result for one channel run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub meta: MetaInfo,
    pub channel: ChannelIdentity,
    pub kpis: Kpis,

    #[serde(default)]
    pub trends: Vec<TrendPoint>,
    #[serde(default)]
    pub drivers: Vec<DriverEffect>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub model_metrics: Option<ModelMetrics>,

    #[serde(default)]
    pub topics: Vec<TopicSummary>,
    #[serde(default)]
    pub topic_assignments: Vec<TopicAssignment>,
    #[serde(default)]
    pub topic_insights: Vec<String>,
}
