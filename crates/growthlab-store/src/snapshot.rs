use crate::io::{read_json, write_json_pretty};
use anyhow::{bail, Context};
use growthlab_core::{ChannelIdentity, VideoRecord};
use growthlab_pipeline::VideoSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A channel's identity and uploads captured at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub channel: ChannelIdentity,
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

impl Snapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        read_json(path).with_context(|| format!("failed to read snapshot {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        write_json_pretty(path, self)
            .with_context(|| format!("failed to write snapshot {}", path.display()))
    }
}

/// Serves one snapshot file as a `VideoSource`
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_for(&self, channel_id: &str) -> anyhow::Result<Snapshot> {
        let snapshot = Snapshot::load(&self.path)?;
        if snapshot.channel.channel_id != channel_id {
            bail!(
                "snapshot {} holds channel {}, not {}",
                self.path.display(),
                snapshot.channel.channel_id,
                channel_id
            );
        }
        Ok(snapshot)
    }
}

impl VideoSource for SnapshotSource {
    fn channel_identity(&self, channel_id: &str) -> anyhow::Result<ChannelIdentity> {
        Ok(self.load_for(channel_id)?.channel)
    }

    fn fetch_videos(&self, channel_id: &str, n: usize) -> anyhow::Result<Vec<VideoRecord>> {
        let mut videos = self.load_for(channel_id)?.videos;
        videos.truncate(n);
        debug!(path = %self.path.display(), videos = videos.len(), "Loaded snapshot videos");
        Ok(videos)
    }
}
