use crate::embed::{EmbedError, Embedder};
use crate::hdbscan::{Hdbscan, NOISE};
use crate::insights::build_insights;
use crate::summary::{
    label_topic, merge_singletons, rank_topics, summarize_topic, MISC_LABEL, MISC_TOPIC_ID,
};
use growthlab_core::{AnalysisIssue, PerformanceRecord, TopicAssignment, TopicConfig, TopicSummary, Upload};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicAnalysis {
    /// One per input row, in input order
    pub assignments: Vec<TopicAssignment>,
    /// Ranked by topic score, best first
    pub topics: Vec<TopicSummary>,
    pub insights: Vec<String>,
    pub warnings: Vec<String>,
}

impl TopicAnalysis {
    fn degraded(issue: AnalysisIssue) -> Self {
        warn!(%issue, "Topic analysis skipped");
        Self {
            warnings: vec![issue.to_string()],
            ..Self::default()
        }
    }
}

/// Map raw cluster labels to dense topic ids. Each noise point becomes its
/// own topic numbered after the largest cluster; the result is then
/// renumbered 0.. in ascending order of the provisional ids.
pub fn resolve_topic_ids(raw: &[i64]) -> Vec<i64> {
    let mut next = raw.iter().copied().max().filter(|&m| m >= 0).map_or(0, |m| m + 1);
    let provisional: Vec<i64> = raw
        .iter()
        .map(|&label| {
            if label == NOISE {
                next += 1;
                next - 1
            } else {
                label
            }
        })
        .collect();

    let dense: HashMap<i64, i64> = provisional
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, id)| (id, i as i64))
        .collect();
    provisional.iter().map(|id| dense[id]).collect()
}

pub struct TopicEngine {
    config: TopicConfig,
    embedder: Box<dyn Embedder>,
}

impl TopicEngine {
    pub fn new(config: TopicConfig, embedder: Box<dyn Embedder>) -> Self {
        Self { config, embedder }
    }

    /// Cluster titles into topics and summarize each topic's performance.
    /// Embedding failures yield an empty analysis with a warning.
    pub fn analyze<T: Upload>(&self, rows: &[PerformanceRecord<T>]) -> TopicAnalysis {
        if rows.is_empty() {
            return TopicAnalysis::default();
        }

        let titles: Vec<String> = rows.iter().map(|r| r.title().to_string()).collect();
        let vectors = match self.embedder.embed(&titles) {
            Ok(v) if v.len() == rows.len() => v,
            Ok(v) => {
                return TopicAnalysis::degraded(AnalysisIssue::Embedding(
                    EmbedError::CountMismatch {
                        expected: rows.len(),
                        got: v.len(),
                    }
                    .to_string(),
                ))
            }
            Err(e) => return TopicAnalysis::degraded(AnalysisIssue::Embedding(e.to_string())),
        };

        let raw = Hdbscan::from(&self.config).fit_predict(&vectors);
        let noise = raw.iter().filter(|&&l| l == NOISE).count();
        let topic_ids = resolve_topic_ids(&raw);
        debug!(rows = rows.len(), noise, "Clustered titles");

        // groups in first-appearance order
        let mut order: Vec<i64> = Vec::new();
        let mut groups: HashMap<i64, Vec<&PerformanceRecord<T>>> = HashMap::new();
        for (row, &tid) in rows.iter().zip(&topic_ids) {
            groups
                .entry(tid)
                .or_insert_with(|| {
                    order.push(tid);
                    Vec::new()
                })
                .push(row);
        }

        let labels: HashMap<i64, String> = order
            .iter()
            .map(|tid| {
                let titles = groups[tid].iter().map(|r| r.title());
                (*tid, label_topic(titles, self.config.label_max_chars))
            })
            .collect();

        let summaries: Vec<TopicSummary> = order
            .iter()
            .map(|tid| summarize_topic(*tid, labels[tid].clone(), &groups[tid], &self.config))
            .collect();
        let (topics, merged) = merge_singletons(summaries, &self.config);

        let assignments = rows
            .iter()
            .zip(&topic_ids)
            .map(|(row, tid)| {
                let (topic_id, topic_label) = if merged.contains(tid) {
                    (MISC_TOPIC_ID, MISC_LABEL.to_string())
                } else {
                    (*tid, labels[tid].clone())
                };
                TopicAssignment {
                    video_id: row.id().to_string(),
                    topic_id,
                    topic_label,
                }
            })
            .collect();

        let topics = rank_topics(topics);
        let insights = build_insights(&topics, &self.config);
        info!(
            topics = topics.len(),
            merged = merged.len(),
            "Topic analysis complete"
        );

        TopicAnalysis {
            assignments,
            topics,
            insights,
            warnings: Vec::new(),
        }
    }
}
