//! The five component scorers.
//!
//! Each scorer is a pure function `DerivedMetrics -> [0, 1]`; category
//! alignment additionally reads the file's manually curated categories.
//! Every return value is clamped before leaving this module, so downstream
//! code never re-validates ranges.

use crate::config::ConvergenceConfig;
use crate::metrics::DerivedMetrics;
use consolidator_protocol::similarity::categories_match;
use serde::{Deserialize, Serialize};

/// The five normalized component scores feeding the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub confidence: f64,
    pub stability: f64,
    pub type_consistency: f64,
    pub category_alignment: f64,
    pub improvement: f64,
}

/// Compute all five components for one file.
///
/// `manual_categories` comes from the knowledge store; an empty list means
/// the file has no curation yet and must score a neutral 0.5 on alignment.
pub fn score_components(
    metrics: &DerivedMetrics,
    manual_categories: &[String],
    config: &ConvergenceConfig,
) -> ComponentScores {
    ComponentScores {
        confidence: confidence_score(metrics, config),
        stability: stability_score(metrics, config),
        type_consistency: type_consistency_score(metrics),
        category_alignment: category_alignment_score(metrics, manual_categories),
        improvement: improvement_score(metrics),
    }
}

/// Blend of latest-vs-threshold (0.7) and mean-vs-threshold (0.3) ratios,
/// each capped at 1.
fn confidence_score(metrics: &DerivedMetrics, config: &ConvergenceConfig) -> f64 {
    let threshold = config.min_confidence.max(f64::EPSILON);
    let latest_ratio = (metrics.latest_confidence / threshold).min(1.0);
    let mean_ratio = (metrics.mean_confidence / threshold).min(1.0);
    (0.7 * latest_ratio + 0.3 * mean_ratio).clamp(0.0, 1.0)
}

/// Low recent variance (0.5), low overall variance (0.3), and an upward
/// movement fraction (0.2). Recent variance is judged against
/// `max_variance`, overall against twice that.
fn stability_score(metrics: &DerivedMetrics, config: &ConvergenceConfig) -> f64 {
    let max_variance = config.max_variance.max(f64::EPSILON);
    let recent_term = (1.0 - metrics.recent_variance / max_variance).clamp(0.0, 1.0);
    let overall_term = (1.0 - metrics.overall_variance / (2.0 * max_variance)).clamp(0.0, 1.0);
    let trend = improvement_trend(&metrics.deltas);
    (0.5 * recent_term + 0.3 * overall_term + 0.2 * trend).clamp(0.0, 1.0)
}

/// Fraction of per-step deltas that did not lose confidence.
fn improvement_trend(deltas: &[f64]) -> f64 {
    if deltas.is_empty() {
        return 0.5;
    }
    deltas.iter().filter(|d| **d >= 0.0).count() as f64 / deltas.len() as f64
}

/// Modal-label agreement, recent window weighted higher than the whole
/// history: late-iteration agreement matters more than early noise.
fn type_consistency_score(metrics: &DerivedMetrics) -> f64 {
    let overall = metrics.dominant_count as f64 / metrics.iteration_count as f64;
    let recent = metrics.recent_dominant_count as f64 / metrics.window_len as f64;
    (0.4 * overall + 0.6 * recent).clamp(0.0, 1.0)
}

/// Overlap between suggested and manually curated categories, recent
/// window weighted 0.7 against 0.3 for the overall average.
///
/// Returns exactly 0.5 when the file has no manual categories: absence of
/// curation neither penalizes nor rewards convergence.
fn category_alignment_score(metrics: &DerivedMetrics, manual: &[String]) -> f64 {
    if manual.is_empty() {
        return 0.5;
    }

    let overlaps: Vec<f64> = metrics
        .iterations
        .iter()
        .map(|it| {
            let matched = it
                .categories
                .iter()
                .filter(|s| manual.iter().any(|m| categories_match(s, m)))
                .count();
            let denom = it.categories.len().max(manual.len());
            matched as f64 / denom as f64
        })
        .collect();

    let recent = &overlaps[overlaps.len() - metrics.window_len..];
    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
    let overall_avg = overlaps.iter().sum::<f64>() / overlaps.len() as f64;

    (0.7 * recent_avg + 0.3 * overall_avg).clamp(0.0, 1.0)
}

/// Least-squares slope over the delta sequence (0.4) blended with the
/// fraction of strictly positive deltas (0.6). Neutral 0.5 below two
/// deltas: one step is not a trend.
fn improvement_score(metrics: &DerivedMetrics) -> f64 {
    let deltas = &metrics.deltas;
    if deltas.len() < 2 {
        return 0.5;
    }

    let slope = least_squares_slope(deltas);
    let trend_component = (0.5 + 10.0 * slope).clamp(0.0, 1.0);
    let positive_fraction = deltas.iter().filter(|d| **d > 0.0).count() as f64 / deltas.len() as f64;

    (0.4 * trend_component + 0.6 * positive_fraction).clamp(0.0, 1.0)
}

/// Slope of the best-fit line through `(index, value)` points.
fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}
