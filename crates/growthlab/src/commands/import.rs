use anyhow::Context;
use chrono::Utc;
use growthlab_core::ChannelIdentity;
use growthlab_store::youtube::parse_videos_payload;
use growthlab_store::{Paths, Snapshot};
use std::path::Path;
use tracing::info;

pub fn run(
    channel_id: &str,
    payload: &Path,
    title: Option<&str>,
    data_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let paths = Paths::resolve(data_dir)?;
    paths.ensure_dirs()?;

    let snapshot = build_snapshot(channel_id, payload, title)?;
    let target = paths.snapshot_path(channel_id);
    snapshot.save(&target)?;

    info!(videos = snapshot.videos.len(), path = %target.display(), "Imported snapshot");
    println!(
        "Imported {} videos for {} into {}",
        snapshot.videos.len(),
        channel_id,
        target.display()
    );
    Ok(())
}

fn build_snapshot(channel_id: &str, payload: &Path, title: Option<&str>) -> anyhow::Result<Snapshot> {
    let content = std::fs::read_to_string(payload)
        .with_context(|| format!("failed to read payload {}", payload.display()))?;
    let mut videos = parse_videos_payload(&content, Utc::now())
        .with_context(|| format!("failed to parse payload {}", payload.display()))?;
    videos.sort_by_key(|v| std::cmp::Reverse(v.published_at));

    let mut channel = ChannelIdentity::unnamed(channel_id);
    if let Some(title) = title {
        channel.title = title.to_string();
    }
    Ok(Snapshot { channel, videos })
}
