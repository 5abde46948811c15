use growthlab_core::{AnalyticsReport, ChannelIdentity, VideoRecord};
use std::path::PathBuf;

/// Where channel metadata and uploads come from
pub trait VideoSource {
    fn channel_identity(&self, channel_id: &str) -> anyhow::Result<ChannelIdentity>;

    /// Up to `n` uploads, most recent first when the source knows the order
    fn fetch_videos(&self, channel_id: &str, n: usize) -> anyhow::Result<Vec<VideoRecord>>;
}

/// Where finished reports go
pub trait ReportSink {
    fn save(&self, report: &AnalyticsReport) -> anyhow::Result<PathBuf>;
}
