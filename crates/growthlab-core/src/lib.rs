//! Core record types, feature engineering and performance normalization

mod config;
mod features;
mod issue;
mod normalize;
mod report;
pub mod stats;
mod types;

pub use config::{AnalysisConfig, ModelConfig, NormalizerConfig, ReportConfig, TopicConfig};
pub use features::{
    numeric_rates, time_features, title_features, EngagementRates, FeaturedVideo, TimeFeatures,
    TitleFeatures,
};
pub use issue::{AnalysisIssue, ConfigError};
pub use normalize::{normalize, Baseline, Normalized, PerformanceRecord};
pub use report::{
    AnalyticsReport, Confidence, Direction, DriverEffect, Kpis, MetaInfo, ModelMetrics,
    Recommendation, TopicAssignment, TopicSummary, TrendPoint,
};
pub use types::{ChannelIdentity, Upload, VideoRecord};

/// A featured video after normalization; the row type the model and topics consume
pub type AnalyzedVideo = PerformanceRecord<FeaturedVideo>;
