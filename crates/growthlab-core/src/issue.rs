//! Degradation reasons and configuration errors

use thiserror::Error;

/// Why a stage produced a degraded result. The `Display` text is surfaced to
/// users verbatim as a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisIssue {
    #[error("Not enough valid rows after filtering ({valid} with relative_performance > 0, need {required}).")]
    InsufficientData { valid: usize, required: usize },

    #[error("Missing feature columns: {0:?}")]
    MissingFeature(Vec<String>),

    #[error("Target has near-zero variance; cannot learn meaningful drivers.")]
    DegenerateTarget,

    #[error("No videos available for analysis.")]
    EmptyInput,

    #[error("Topic embedding unavailable: {0}")]
    Embedding(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("channel id must be at least {min} characters, got {actual:?}")]
    ChannelId { min: usize, actual: String },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: usize,
        max: usize,
        value: usize,
    },
}
