//! Configuration for an analysis run

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feature columns the driver model reads by default
pub const DEFAULT_FEATURES: &[&str] = &[
    "duration_seconds",
    "title_length_chars",
    "title_word_count",
    "has_number",
    "has_question",
    "has_brackets",
    "caps_ratio",
    "emoji_count",
    "publish_hour",
    "publish_day_of_week",
    "is_weekend",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Upper bound on the age window used for views-per-day (None = uncapped)
    pub velocity_cap_days: Option<u32>,
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self {
            velocity_cap_days: Some(14),
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Driver model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Feature columns, in fit order
    pub features: Vec<String>,

    /// L2 regularization strength
    pub alpha: f64,

    /// Upper bound on CV folds (actual = min(this, rows))
    pub cv_folds: usize,

    /// Seed for the fold shuffle
    pub seed: u64,

    /// Rows with relative_performance > 0 needed to fit
    pub min_rows: usize,

    /// Below this many input rows a stability warning is added
    pub stable_rows: usize,

    /// Drivers kept in the output
    pub top_drivers: usize,

    pub max_recommendations: usize,

    /// Mean CV R² below this adds a weak-drivers warning
    pub weak_r2: f64,

    /// relative_performance above this adds an outlier warning
    pub spike_threshold: f64,
}

impl ModelConfig {
    pub fn new() -> Self {
        Self {
            features: DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect(),
            alpha: 1.0,
            cv_folds: 5,
            seed: 42,
            min_rows: 5,
            stable_rows: 8,
            top_drivers: 8,
            max_recommendations: 3,
            weak_r2: 0.05,
            spike_threshold: 10.0,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Topic engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfig {
    pub min_cluster_size: usize,
    pub min_samples: usize,

    /// Let the whole catalog form one cluster when nothing splits
    pub allow_single_cluster: bool,

    /// Topics smaller than this merge into the catch-all bucket
    pub min_topic_size: usize,

    pub label_max_chars: usize,

    /// Momentum below the negative of this (with enough videos) flags fatigue
    pub fatigue_drop: f64,
    pub fatigue_min_videos: usize,

    /// Momentum above this counts as improving
    pub improving_momentum: f64,

    pub stable_momentum: f64,
    pub stable_volatility: f64,
}

impl TopicConfig {
    pub fn new() -> Self {
        Self {
            min_cluster_size: 3,
            min_samples: 2,
            allow_single_cluster: false,
            min_topic_size: 2,
            label_max_chars: 60,
            fatigue_drop: 0.15,
            fatigue_min_videos: 4,
            improving_momentum: 0.15,
            stable_momentum: 0.05,
            stable_volatility: 0.3,
        }
    }
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Most recent videos included in the trend series
    pub trend_points: usize,
}

impl ReportConfig {
    pub fn new() -> Self {
        Self { trend_points: 30 }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub normalizer: NormalizerConfig,
    pub model: ModelConfig,
    pub topics: TopicConfig,
    pub report: ReportConfig,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; omitted fields keep their defaults
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
