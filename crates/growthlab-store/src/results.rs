use crate::io::{read_json, write_json_pretty};
use anyhow::Context;
use growthlab_core::AnalyticsReport;
use growthlab_pipeline::ReportSink;
use std::path::{Path, PathBuf};
use tracing::debug;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Saved reports, one JSON file per run: `<channel_id>_<timestamp>.json`
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, report: &AnalyticsReport) -> PathBuf {
        let stamp = report.meta.generated_at.format(TIMESTAMP_FORMAT);
        self.dir
            .join(format!("{}_{}.json", report.meta.channel_id, stamp))
    }

    pub fn load(&self, path: &Path) -> anyhow::Result<AnalyticsReport> {
        read_json(path).with_context(|| format!("failed to read report {}", path.display()))
    }

    /// Saved report files, newest first; optionally only one channel's
    pub fn list(&self, channel_id: Option<&str>) -> anyhow::Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list {}", self.dir.display()))?;
        let mut found: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some((channel, stamp)) = split_name(&path) else {
                continue;
            };
            if channel_id.is_some_and(|wanted| wanted != channel) {
                continue;
            }
            found.push((stamp, path));
        }

        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }
}

impl ReportSink for ResultStore {
    fn save(&self, report: &AnalyticsReport) -> anyhow::Result<PathBuf> {
        let path = self.path_for(report);
        write_json_pretty(&path, report)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        debug!(path = %path.display(), "Wrote report");
        Ok(path)
    }
}

/// `<channel>_<YYYYmmddTHHMMSSZ>.json` into its two parts
fn split_name(path: &Path) -> Option<(String, String)> {
    let stem = path.file_stem()?.to_str()?;
    let (channel, stamp) = stem.rsplit_once('_')?;
    chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    Some((channel.to_string(), stamp.to_string()))
}
