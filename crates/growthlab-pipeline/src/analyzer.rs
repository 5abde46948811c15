use crate::request::AnalysisRequest;
use crate::source::{ReportSink, VideoSource};
use chrono::{DateTime, Utc};
use growthlab_core::stats::{mean, median_by_index, round_to};
use growthlab_core::{
    normalize, AnalysisConfig, AnalysisIssue, AnalyticsReport, AnalyzedVideo, Baseline,
    ChannelIdentity, FeaturedVideo, Kpis, MetaInfo, Normalized, TrendPoint, VideoRecord,
};
use growthlab_model::DriverModel;
use growthlab_topics::{Embedder, TopicEngine};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Runs the full analysis for one channel. Holds the configured driver model
/// and topic engine so repeated runs reuse them.
pub struct ChannelAnalyzer {
    config: AnalysisConfig,
    drivers: DriverModel,
    topics: TopicEngine,
}

impl ChannelAnalyzer {
    pub fn new(config: AnalysisConfig, embedder: Box<dyn Embedder>) -> Self {
        let drivers = DriverModel::new(config.model.clone());
        let topics = TopicEngine::new(config.topics.clone(), embedder);
        Self {
            config,
            drivers,
            topics,
        }
    }

    /// Fetch, analyze and persist. Only request validation and the
    /// collaborators can fail; the analysis itself degrades into warnings.
    pub fn run(
        &self,
        request: &AnalysisRequest,
        source: &dyn VideoSource,
        sink: &dyn ReportSink,
    ) -> anyhow::Result<(AnalyticsReport, PathBuf)> {
        request.validate()?;

        let channel = source.channel_identity(&request.channel_id)?;
        let mut videos = source.fetch_videos(&request.channel_id, request.n_videos)?;
        videos.truncate(request.n_videos);

        let report = self.analyze(request, channel, videos, Utc::now());
        let path = sink.save(&report)?;
        info!(path = %path.display(), "Saved report");
        Ok((report, path))
    }

    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        channel: ChannelIdentity,
        records: Vec<VideoRecord>,
        now: DateTime<Utc>,
    ) -> AnalyticsReport {
        let videos_fetched = records.len();
        info!(
            channel = %request.channel_id,
            videos = videos_fetched,
            baseline_window = request.baseline_window,
            "Starting channel analysis"
        );

        let featured: Vec<FeaturedVideo> =
            records.into_iter().map(FeaturedVideo::from_record).collect();
        let Normalized {
            records: rows,
            baseline,
        } = normalize(
            featured,
            request.baseline_window,
            now,
            self.config.normalizer.velocity_cap_days,
        );
        debug!(
            baseline = baseline.value(),
            fallback = matches!(baseline, Baseline::Fallback),
            "Computed baseline"
        );

        let model = self.drivers.train_and_explain(&rows);
        let topics = self.topics.analyze(&rows);

        let mut warnings = Vec::new();
        if rows.is_empty() {
            let issue = AnalysisIssue::EmptyInput;
            warn!(%issue, channel = %request.channel_id, "Source returned no videos");
            warnings.push(issue.to_string());
        }
        warnings.extend(model.warnings().iter().cloned());
        warnings.extend(topics.warnings);

        let report = AnalyticsReport {
            meta: MetaInfo {
                channel_id: request.channel_id.clone(),
                n_videos: request.n_videos,
                videos_fetched,
                baseline_window: request.baseline_window,
                generated_at: now,
            },
            channel,
            kpis: kpis(&rows, baseline),
            trends: trends(&rows, self.config.report.trend_points),
            drivers: model.drivers().to_vec(),
            recommendations: model.recommendations().to_vec(),
            warnings,
            model_metrics: model.metrics().cloned(),
            topics: topics.topics,
            topic_assignments: topics.assignments,
            topic_insights: topics.insights,
        };

        info!(
            videos = report.kpis.videos_analyzed,
            drivers = report.drivers.len(),
            topics = report.topics.len(),
            warnings = report.warnings.len(),
            "Channel analysis complete"
        );
        report
    }
}

fn kpis(rows: &[AnalyzedVideo], baseline: Baseline) -> Kpis {
    let rel: Vec<f64> = rows.iter().map(|r| r.relative_performance).collect();
    let engagement: Vec<f64> = rows.iter().map(|r| r.video.rates.engagement_rate).collect();
    Kpis {
        videos_analyzed: rows.len(),
        baseline_views_per_day: baseline.value(),
        median_relative_performance: median_by_index(&rel).unwrap_or(0.0),
        avg_engagement_rate: mean(&engagement),
    }
}

/// Most recent `limit` rows, rates rounded for display
fn trends(rows: &[AnalyzedVideo], limit: usize) -> Vec<TrendPoint> {
    rows.iter()
        .take(limit)
        .map(|r| TrendPoint {
            published_at: r.video.record.published_at,
            views: r.video.record.views,
            views_per_day: round_to(r.views_per_day, 3),
            relative_performance: round_to(r.relative_performance, 3),
        })
        .collect()
}
