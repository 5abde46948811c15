//! Topic discovery over video titles: embeddings, HDBSCAN and topic momentum

mod embed;
mod engine;
mod hdbscan;
mod insights;
mod summary;

pub use embed::{l2_normalize, EmbedError, Embedder, LexicalEmbedder, SemanticEmbedder};
pub use engine::{resolve_topic_ids, TopicAnalysis, TopicEngine};
pub use hdbscan::Hdbscan;
pub use insights::build_insights;
pub use summary::{
    is_fatigued, label_topic, merge_singletons, rank_topics, summarize_topic, topic_score,
    MISC_LABEL, MISC_TOPIC_ID,
};
