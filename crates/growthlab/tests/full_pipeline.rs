mod common;

use common::{catalog, now, sample_channel, KeywordEmbedder};
use growthlab_core::{AnalysisConfig, AnalyticsReport};
use growthlab_pipeline::{AnalysisRequest, ChannelAnalyzer, VideoSource};
use growthlab_store::youtube::parse_videos_payload;
use growthlab_store::{Paths, ResultStore, Snapshot, SnapshotSource};
use growthlab_topics::LexicalEmbedder;

fn analyzer() -> ChannelAnalyzer {
    ChannelAnalyzer::new(AnalysisConfig::default(), Box::new(KeywordEmbedder))
}

#[test]
fn test_snapshot_to_saved_report() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::with_root(dir.path());
    paths.ensure_dirs().unwrap();

    let channel = sample_channel();
    Snapshot {
        channel: channel.clone(),
        videos: catalog(30),
    }
    .save(&paths.snapshot_path(&channel.channel_id))
    .unwrap();

    let request = AnalysisRequest::new(channel.channel_id.as_str()).with_n_videos(24);
    let source = SnapshotSource::new(paths.snapshot_path(&channel.channel_id));
    let store = ResultStore::new(paths.results_dir());

    let (report, saved) = analyzer().run(&request, &source, &store).unwrap();

    // Run metadata and KPIs
    assert_eq!(report.channel, channel);
    assert_eq!(report.meta.videos_fetched, 24);
    assert_eq!(report.kpis.videos_analyzed, 24);
    assert!(report.kpis.baseline_views_per_day > 0.0);
    assert!(report.kpis.avg_engagement_rate > 0.0);
    assert_eq!(report.trends.len(), 24);

    // Driver model fitted on every row
    assert_eq!(report.drivers.len(), 8);
    assert!(!report.recommendations.is_empty());
    assert!(report.recommendations.len() <= 3);
    let metrics = report.model_metrics.as_ref().unwrap();
    assert_eq!(metrics.n_train, 24);
    assert!(!report.warnings.iter().any(|w| w.contains("Too few videos")));

    // Two title families, no leftovers
    assert_eq!(report.topics.len(), 2);
    assert_eq!(report.topic_assignments.len(), 24);
    assert!(report.topic_assignments.iter().all(|a| a.topic_id >= 0));
    let bread: Vec<_> = report
        .topic_assignments
        .iter()
        .filter(|a| a.topic_label.starts_with("Bread"))
        .collect();
    assert_eq!(bread.len(), 12);

    // Persisted and listed
    assert_eq!(store.list(None).unwrap(), vec![saved.clone()]);
    let loaded: AnalyticsReport = store.load(&saved).unwrap();
    assert_eq!(loaded, report);
}

#[test]
fn test_report_json_roundtrip() {
    let request = AnalysisRequest::new("UCfixture01");
    let report = analyzer().analyze(&request, sample_channel(), catalog(16), now());

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: AnalyticsReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["meta"]["generated_at"].is_string());
    assert!(value["drivers"][0]["direction"].is_string());
    assert!(value["topics"].is_array());
}

#[test]
fn test_analysis_is_repeatable() {
    let request = AnalysisRequest::new("UCfixture01");
    let a = analyzer().analyze(&request, sample_channel(), catalog(20), now());
    let b = analyzer().analyze(&request, sample_channel(), catalog(20), now());
    assert_eq!(a, b);
}

#[test]
fn test_import_then_analyze() {
    let payload = r#"[
        {"items": [
            {"id": "a1", "snippet": {"title": "Bread crumb shots", "publishedAt": "2025-05-30T18:00:00Z"},
             "contentDetails": {"duration": "PT8M20S"},
             "statistics": {"viewCount": "1200", "likeCount": "60", "commentCount": "4"}},
            {"id": "a2", "snippet": {"title": "Bread lamination?", "publishedAt": "2025-05-20T18:00:00Z"},
             "contentDetails": {"duration": "PT11M"},
             "statistics": {"viewCount": "2400", "likeCount": "90", "commentCount": "12"}}
        ]},
        {"items": [
            {"id": "a3", "snippet": {"title": "Bike saddle height", "publishedAt": "2025-05-10T18:00:00Z"},
             "contentDetails": {"duration": "PT1H2M3S"},
             "statistics": {"viewCount": "900"}}
        ]}
    ]"#;
    let videos = parse_videos_payload(payload, now()).unwrap();
    assert_eq!(videos.len(), 3);
    assert_eq!(videos[2].duration_seconds, 3723);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.json");
    Snapshot {
        channel: sample_channel(),
        videos,
    }
    .save(&path)
    .unwrap();

    let source = SnapshotSource::new(&path);
    let fetched = source.fetch_videos("UCfixture01", 50).unwrap();
    let request = AnalysisRequest::new("UCfixture01").with_baseline_window(5);
    let report = ChannelAnalyzer::new(AnalysisConfig::default(), Box::new(LexicalEmbedder::default()))
        .analyze(&request, sample_channel(), fetched, now());

    assert_eq!(report.kpis.videos_analyzed, 3);
    assert!(report.drivers.is_empty());
    assert!(report.warnings.iter().any(|w| w.contains("Too few videos")));
    assert_eq!(report.topic_assignments.len(), 3);
}

#[test]
fn test_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"report": {"trend_points": 5}, "model": {"top_drivers": 3}}"#).unwrap();
    let config = AnalysisConfig::load(&path).unwrap();

    let request = AnalysisRequest::new("UCfixture01");
    let report = ChannelAnalyzer::new(config, Box::new(KeywordEmbedder))
        .analyze(&request, sample_channel(), catalog(20), now());
    assert_eq!(report.trends.len(), 5);
    assert_eq!(report.drivers.len(), 3);
}
