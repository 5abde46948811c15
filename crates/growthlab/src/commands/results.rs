use super::analyze::render_summary;
use growthlab_store::{Paths, ResultStore};
use std::path::{Path, PathBuf};

pub fn run(channel: Option<&str>, show: bool, data_dir: Option<&Path>) -> anyhow::Result<()> {
    let paths = Paths::resolve(data_dir)?;
    let store = ResultStore::new(paths.results_dir());
    let saved = store.list(channel)?;
    println!("{}", build_listing(&saved));

    if show {
        if let Some(newest) = saved.first() {
            let report = store.load(newest)?;
            println!("\n{}", render_summary(&report));
        }
    }
    Ok(())
}

fn build_listing(saved: &[PathBuf]) -> String {
    if saved.is_empty() {
        return "No saved results.".to_string();
    }
    let mut lines = vec![format!("Saved results ({})", saved.len())];
    for path in saved {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        lines.push(format!("  {}", name));
    }
    lines.join("\n")
}
