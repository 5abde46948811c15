use growthlab_core::{TopicConfig, TopicSummary};

/// Plain-language notes over ranked topics: the first improving topic, the
/// first fatigued topic, then a count of stable ones
pub fn build_insights(topics: &[TopicSummary], cfg: &TopicConfig) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(t) = topics.iter().find(|t| t.momentum > cfg.improving_momentum) {
        insights.push(format!(
            "Topic '{}' is improving lately (+{:.2} vs older videos).",
            t.label, t.momentum
        ));
    }

    if let Some(t) = topics.iter().find(|t| t.fatigue) {
        insights.push(format!(
            "Topic '{}' shows signs of fatigue ({:.2} decline recently).",
            t.label, t.momentum
        ));
    }

    let stable = topics
        .iter()
        .filter(|t| t.momentum.abs() < cfg.stable_momentum && t.volatility < cfg.stable_volatility)
        .count();
    if stable > 0 {
        insights.push(format!("{stable} topic(s) are stable and predictable."));
    }

    insights
}
