use growthlab_core::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_N_VIDEOS: usize = 50;
pub const DEFAULT_BASELINE_WINDOW: usize = 20;

const MIN_CHANNEL_ID_CHARS: usize = 3;
const N_VIDEOS_RANGE: (usize, usize) = (1, 200);
const BASELINE_WINDOW_RANGE: (usize, usize) = (5, 100);

/// What to analyze for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub channel_id: String,
    #[serde(default = "default_n_videos")]
    pub n_videos: usize,
    #[serde(default = "default_baseline_window")]
    pub baseline_window: usize,
}

fn default_n_videos() -> usize {
    DEFAULT_N_VIDEOS
}

fn default_baseline_window() -> usize {
    DEFAULT_BASELINE_WINDOW
}

impl AnalysisRequest {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            n_videos: DEFAULT_N_VIDEOS,
            baseline_window: DEFAULT_BASELINE_WINDOW,
        }
    }

    pub fn with_n_videos(mut self, n_videos: usize) -> Self {
        self.n_videos = n_videos;
        self
    }

    pub fn with_baseline_window(mut self, baseline_window: usize) -> Self {
        self.baseline_window = baseline_window;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_id.trim().chars().count() < MIN_CHANNEL_ID_CHARS {
            return Err(ConfigError::ChannelId {
                min: MIN_CHANNEL_ID_CHARS,
                actual: self.channel_id.clone(),
            });
        }
        check_range("n_videos", self.n_videos, N_VIDEOS_RANGE)?;
        check_range("baseline_window", self.baseline_window, BASELINE_WINDOW_RANGE)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: usize,
    (min, max): (usize, usize),
) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}
