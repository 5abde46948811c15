use crate::cli::AnalyzeArgs;
use anyhow::Context;
use growthlab_core::{AnalysisConfig, AnalyticsReport};
use growthlab_pipeline::{AnalysisRequest, ChannelAnalyzer};
use growthlab_store::{Paths, ResultStore, SnapshotSource};

pub fn run(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let paths = Paths::resolve(args.data_dir.as_deref())?;
    paths.ensure_dirs()?;

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let request = AnalysisRequest::new(args.channel_id.as_str())
        .with_n_videos(args.n_videos)
        .with_baseline_window(args.baseline_window);
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| paths.snapshot_path(&args.channel_id));

    // Model load happens before the snapshot is read
    let embedder = args.embedder.load();
    let source = SnapshotSource::new(input);
    let sink = ResultStore::new(paths.results_dir());
    let analyzer = ChannelAnalyzer::new(config, embedder);
    let (report, saved) = analyzer.run(&request, &source, &sink)?;

    if args.print {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_summary(&report));
        println!("\nSaved to {}", saved.display());
    }
    Ok(())
}

pub fn render_summary(report: &AnalyticsReport) -> String {
    let mut sections = Vec::new();

    let name = if report.channel.title.is_empty() {
        report.meta.channel_id.as_str()
    } else {
        report.channel.title.as_str()
    };
    sections.push(format!(
        "Channel Analysis: {}\n==================\n\
         Videos analyzed: {} (requested {}, fetched {})\n\
         Baseline views/day: {:.1}\n\
         Median relative performance: {:.2}\n\
         Avg engagement rate: {:.2}%",
        name,
        report.kpis.videos_analyzed,
        report.meta.n_videos,
        report.meta.videos_fetched,
        report.kpis.baseline_views_per_day,
        report.kpis.median_relative_performance,
        report.kpis.avg_engagement_rate * 100.0
    ));

    if !report.drivers.is_empty() {
        let lines: Vec<String> = report
            .drivers
            .iter()
            .map(|d| format!("  {:<22} {:>+8.2}%  ({})", d.feature, d.effect_percent, d.unit_change))
            .collect();
        let fit = report
            .model_metrics
            .as_ref()
            .map(|m| format!(" (CV R² {:.2} ± {:.2})", m.cv_r2_mean, m.cv_r2_std))
            .unwrap_or_default();
        sections.push(format!("\nDrivers{}\n-------\n{}", fit, lines.join("\n")));
    }

    if !report.recommendations.is_empty() {
        let lines: Vec<String> = report
            .recommendations
            .iter()
            .map(|r| format!("  - {}: {}", r.title, r.detail))
            .collect();
        sections.push(format!("\nRecommendations\n---------------\n{}", lines.join("\n")));
    }

    if !report.topics.is_empty() {
        let lines: Vec<String> = report
            .topics
            .iter()
            .map(|t| {
                format!(
                    "  [{:>2}] {} ({} videos, avg {:.2}, momentum {:+.2}{})",
                    t.topic_id,
                    t.label,
                    t.n_videos,
                    t.avg_relative_performance,
                    t.momentum,
                    if t.fatigue { ", fatigued" } else { "" }
                )
            })
            .collect();
        sections.push(format!("\nTopics\n------\n{}", lines.join("\n")));
    }

    if !report.topic_insights.is_empty() {
        let lines: Vec<String> = report
            .topic_insights
            .iter()
            .map(|i| format!("  - {}", i))
            .collect();
        sections.push(format!("\nInsights\n--------\n{}", lines.join("\n")));
    }

    if !report.warnings.is_empty() {
        let lines: Vec<String> = report.warnings.iter().map(|w| format!("  ! {}", w)).collect();
        sections.push(format!("\nWarnings\n--------\n{}", lines.join("\n")));
    }

    sections.join("\n")
}
