//! Templated recommendations from ranked drivers

use growthlab_core::{Confidence, DriverEffect, Recommendation};

struct Template {
    feature: &'static str,
    title: &'static str,
    detail: &'static str,
}

static TEMPLATES: &[Template] = &[
    Template {
        feature: "title_word_count",
        title: "Adjust title length",
        detail: "Reducing title word count (e.g., by ~5 words) is associated with a change in relative performance in your recent uploads.",
    },
    Template {
        feature: "title_length_chars",
        title: "Refine title length",
        detail: "Changing title length (characters) shows an association with relative performance in your recent uploads.",
    },
    Template {
        feature: "has_number",
        title: "Use numbers strategically",
        detail: "Titles containing numbers show an association with different performance; test using numbers on some uploads.",
    },
    Template {
        feature: "publish_hour",
        title: "Experiment with upload time",
        detail: "Upload hour shows an association with performance; try shifting upload time slightly and compare outcomes.",
    },
    Template {
        feature: "duration_seconds",
        title: "Tune video length",
        detail: "Video duration shows an association with performance; try small length adjustments and track impact.",
    },
    Template {
        feature: "caps_ratio",
        title: "Adjust capitalization style",
        detail: "Title capitalization intensity (caps ratio) shows an association with performance; test slightly more/less emphasis.",
    },
    Template {
        feature: "has_question",
        title: "Use question marks carefully",
        detail: "Question marks in titles show an association with performance; test fewer/more question-style titles.",
    },
    Template {
        feature: "is_weekend",
        title: "Test weekday vs weekend uploads",
        detail: "Weekend publishing shows an association with performance; test shifting some uploads to weekdays.",
    },
    Template {
        feature: "has_brackets",
        title: "Try bracketed hooks",
        detail: "Bracketed phrases (e.g., [NEW], (Guide)) show an association with performance; test this packaging style.",
    },
];

fn template_for(feature: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.feature == feature)
}

/// Walk drivers in rank order, emitting at most `limit` templated suggestions.
/// Falls back to naming the top driver when none has a template.
pub fn make_recommendations(
    ranked: &[DriverEffect],
    r2_mean: f64,
    limit: usize,
) -> Vec<Recommendation> {
    let confidence = Confidence::from_r2(r2_mean);

    let mut recs: Vec<Recommendation> = ranked
        .iter()
        .filter_map(|d| {
            template_for(&d.feature).map(|t| Recommendation {
                title: t.title.to_string(),
                detail: t.detail.to_string(),
                expected_impact_percent: Some(d.effect_percent),
                confidence,
            })
        })
        .take(limit)
        .collect();

    if recs.is_empty() {
        if let Some(top) = ranked.first() {
            recs.push(Recommendation {
                title: "Focus on top driver".to_string(),
                detail: format!(
                    "The feature '{}' shows the strongest association in your recent data.",
                    top.feature
                ),
                expected_impact_percent: Some(top.effect_percent),
                confidence,
            });
        }
    }

    recs
}
