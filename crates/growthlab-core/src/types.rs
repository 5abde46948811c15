//! Raw record types handed to the pipeline by its sources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uploaded video as delivered by a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(alias = "video_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Any RFC 3339 offset is accepted and converted to UTC on deserialize
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
}

/// Channel identity carried into the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub channel_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

impl ChannelIdentity {
    pub fn unnamed(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            title: String::new(),
            thumbnail_url: String::new(),
        }
    }
}

/// Minimal view of an upload shared by every pipeline stage
pub trait Upload {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn published_at(&self) -> DateTime<Utc>;
    fn views(&self) -> u64;
}

impl Upload for VideoRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    fn views(&self) -> u64 {
        self.views
    }
}
