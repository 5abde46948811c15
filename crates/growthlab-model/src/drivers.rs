//! Ridge model over engineered features, converted to per-unit percent effects

use crate::cv::{cross_val_r2, KFold};
use crate::recommend::make_recommendations;
use crate::ridge::Ridge;
use crate::scaler::StandardScaler;
use growthlab_core::stats::round_to;
use growthlab_core::{
    AnalysisIssue, AnalyzedVideo, Direction, DriverEffect, ModelConfig, ModelMetrics,
    Recommendation,
};
use tracing::{debug, info, warn};

const MODEL_NAME: &str = "Ridge + StandardScaler";
const TARGET_NAME: &str = "log(relative_performance)";

const WARN_FEW_VIDEOS: &str = "Too few videos for stable modeling. Driver effects may be unreliable.";
const WARN_SPIKES: &str =
    "Target has extreme spikes (relative_performance > 10). Effects may be dominated by outliers.";
const WARN_UNBOUNDED: &str =
    "Some driver effects were unbounded (feature barely varies) and were left out:";
const WARN_WEAK_R2: &str = "Low CV R²: drivers may be weak/noisy for this channel’s recent videos.";

/// The user-facing delta each driver effect is reported for
pub fn unit_change(feature: &str) -> (f64, &'static str) {
    match feature {
        "duration_seconds" => (60.0, "+60s"),
        "title_length_chars" => (-15.0, "-15 chars"),
        "title_word_count" => (-5.0, "-5 words"),
        "caps_ratio" => (0.10, "+0.10"),
        "emoji_count" => (1.0, "+1"),
        "publish_hour" => (2.0, "+2 hours"),
        "publish_day_of_week" => (1.0, "+1 day"),
        "has_number" | "has_question" | "has_brackets" | "is_weekend" => (1.0, "+1 (false→true)"),
        _ => (1.0, "+1"),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedDrivers {
    pub drivers: Vec<DriverEffect>,
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<String>,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    Fitted(FittedDrivers),
    /// A guard tripped; no drivers, explanatory warnings only
    Degraded {
        issue: AnalysisIssue,
        warnings: Vec<String>,
    },
}

impl ModelOutput {
    pub fn drivers(&self) -> &[DriverEffect] {
        match self {
            ModelOutput::Fitted(f) => &f.drivers,
            ModelOutput::Degraded { .. } => &[],
        }
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            ModelOutput::Fitted(f) => &f.recommendations,
            ModelOutput::Degraded { .. } => &[],
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            ModelOutput::Fitted(f) => &f.warnings,
            ModelOutput::Degraded { warnings, .. } => warnings,
        }
    }

    pub fn metrics(&self) -> Option<&ModelMetrics> {
        match self {
            ModelOutput::Fitted(f) => Some(&f.metrics),
            ModelOutput::Degraded { .. } => None,
        }
    }

    pub fn issue(&self) -> Option<&AnalysisIssue> {
        match self {
            ModelOutput::Fitted(_) => None,
            ModelOutput::Degraded { issue, .. } => Some(issue),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriverModel {
    config: ModelConfig,
}

impl DriverModel {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Fit on log(relative_performance) and explain the coefficients.
    /// Never fails: guard conditions come back as `ModelOutput::Degraded`.
    pub fn train_and_explain(&self, rows: &[AnalyzedVideo]) -> ModelOutput {
        let cfg = &self.config;
        let mut warnings = Vec::new();
        if rows.len() < cfg.stable_rows {
            warnings.push(WARN_FEW_VIDEOS.to_string());
        }

        let valid: Vec<&AnalyzedVideo> = rows
            .iter()
            .filter(|r| r.relative_performance.is_finite() && r.relative_performance > 0.0)
            .collect();
        let insufficient = AnalysisIssue::InsufficientData {
            valid: valid.len(),
            required: cfg.min_rows,
        };
        if valid.is_empty() {
            return degrade(insufficient, warnings);
        }

        let y: Vec<f64> = valid.iter().map(|r| r.relative_performance.ln()).collect();
        if valid.len() >= 2 && is_near_constant(&y) {
            return degrade(AnalysisIssue::DegenerateTarget, warnings);
        }
        if valid.len() < cfg.min_rows {
            return degrade(insufficient, warnings);
        }

        let missing: Vec<String> = cfg
            .features
            .iter()
            .filter(|f| valid.iter().any(|r| r.video.feature(f).is_none()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return degrade(AnalysisIssue::MissingFeature(missing), warnings);
        }

        let x: Vec<Vec<f64>> = valid
            .iter()
            .map(|r| {
                cfg.features
                    .iter()
                    .map(|f| r.video.feature(f).unwrap_or(0.0))
                    .collect()
            })
            .collect();

        let scaler = StandardScaler::fit(&x);
        let xs = scaler.transform(&x);
        let model = Ridge::fit(&xs, &y, cfg.alpha);

        let k = cfg.cv_folds.min(valid.len());
        let cv = cross_val_r2(&xs, &y, cfg.alpha, &KFold::new(k, cfg.seed));
        debug!(
            folds = k,
            scored = cv.folds_scored,
            r2_mean = cv.mean,
            r2_std = cv.std,
            "Cross-validated driver model"
        );

        let mut effects: Vec<(DriverEffect, f64)> = Vec::new();
        let mut unbounded: Vec<&str> = Vec::new();
        for ((feature, coef), scale) in cfg
            .features
            .iter()
            .zip(&model.coefficients)
            .zip(&scaler.scales)
        {
            let (delta, label) = unit_change(feature);
            let Some(effect) = effect_percent(*coef, delta, *scale) else {
                unbounded.push(feature);
                continue;
            };
            effects.push((
                DriverEffect {
                    feature: feature.clone(),
                    effect_percent: round_to(effect, 2),
                    unit_change: label.to_string(),
                    direction: Direction::of(effect),
                },
                effect.abs(),
            ));
        }
        if !unbounded.is_empty() {
            warn!(features = ?unbounded, "Dropping non-finite driver effects");
            warnings.push(format!("{} {}.", WARN_UNBOUNDED, unbounded.join(", ")));
        }
        effects.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let ranked: Vec<DriverEffect> = effects.into_iter().map(|(d, _)| d).collect();

        let recommendations = make_recommendations(&ranked, cv.mean, cfg.max_recommendations);

        let max_rp = valid
            .iter()
            .map(|r| r.relative_performance)
            .fold(f64::MIN, f64::max);
        if max_rp > cfg.spike_threshold {
            warnings.push(WARN_SPIKES.to_string());
        }
        if cv.mean < cfg.weak_r2 {
            warnings.push(WARN_WEAK_R2.to_string());
        }

        let metrics = ModelMetrics {
            model: MODEL_NAME.to_string(),
            target: TARGET_NAME.to_string(),
            cv_r2_mean: round_to(cv.mean, 3),
            cv_r2_std: round_to(cv.std, 3),
            n_train: valid.len(),
        };
        info!(
            n_train = metrics.n_train,
            cv_r2_mean = metrics.cv_r2_mean,
            top = ranked.first().map(|d| d.feature.as_str()).unwrap_or(""),
            "Driver model fitted"
        );

        let mut drivers = ranked;
        drivers.truncate(cfg.top_drivers);

        ModelOutput::Fitted(FittedDrivers {
            drivers,
            recommendations,
            warnings,
            metrics,
        })
    }
}

impl Default for DriverModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

fn degrade(issue: AnalysisIssue, mut warnings: Vec<String>) -> ModelOutput {
    warn!(%issue, "Driver model skipped");
    warnings.push(issue.to_string());
    ModelOutput::Degraded { issue, warnings }
}

/// Percent change in relative performance for a `delta` change of a feature
/// whose standardized coefficient is `coef`. `None` when it overflows.
fn effect_percent(coef: f64, delta: f64, scale: f64) -> Option<f64> {
    let effect = ((coef * (delta / scale)).exp() - 1.0) * 100.0;
    effect.is_finite().then_some(effect)
}

/// Every value within `1e-8 + 1e-5·|first|` of the first one
fn is_near_constant(values: &[f64]) -> bool {
    let Some(&first) = values.first() else {
        return true;
    };
    let tolerance = 1e-8 + 1e-5 * first.abs();
    values.iter().all(|v| (v - first).abs() <= tolerance)
}
