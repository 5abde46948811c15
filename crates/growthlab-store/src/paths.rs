//! Data directory layout

use std::path::{Path, PathBuf};

const APP_DIR: &str = "growthlab";

/// Resolves where snapshots and reports live
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
}

impl Paths {
    /// `<platform data dir>/growthlab`
    pub fn new() -> std::io::Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found")
        })?;
        Ok(Self::with_root(base.join(APP_DIR)))
    }

    pub fn with_root(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Explicit override, falling back to the platform default
    pub fn resolve(override_dir: Option<&Path>) -> std::io::Result<Self> {
        match override_dir {
            Some(dir) => Ok(Self::with_root(dir)),
            None => Self::new(),
        }
    }

    /// Saved analysis reports
    pub fn results_dir(&self) -> PathBuf {
        self.data_dir.join("results")
    }

    /// Imported channel snapshots
    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn snapshot_path(&self, channel_id: &str) -> PathBuf {
        self.raw_dir().join(format!("{channel_id}.json"))
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.results_dir())?;
        std::fs::create_dir_all(self.raw_dir())?;
        Ok(())
    }
}
