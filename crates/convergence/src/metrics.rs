use crate::config::ConvergenceConfig;
use crate::error::{ConvergenceError, Result};
use consolidator_protocol::AnalysisIteration;
use std::collections::HashMap;

/// Statistics derived from one file's analysis history.
///
/// Pure function of the input history: no hidden state, safe to recompute
/// and unit test in isolation. The iterations are kept as a sorted copy so
/// the scorers can walk per-iteration labels and categories.
#[derive(Debug, Clone)]
pub struct DerivedMetrics {
    /// History sorted by timestamp ascending.
    pub iterations: Vec<AnalysisIteration>,

    pub iteration_count: usize,
    pub latest_confidence: f64,
    pub mean_confidence: f64,

    /// Population variance of all confidences.
    pub overall_variance: f64,

    /// Population variance over the last `window_len` iterations.
    pub recent_variance: f64,

    /// Per-step confidence deltas, `confidence[i] - confidence[i-1]`.
    pub deltas: Vec<f64>,

    /// Modal label over the whole history and how often it occurs.
    pub dominant_label: String,
    pub dominant_count: usize,

    /// Modal label over the last `window_len` iterations.
    pub recent_dominant_label: String,
    pub recent_dominant_count: usize,

    /// Effective stability window, `min(config.stability_window, count)`.
    pub window_len: usize,
}

impl DerivedMetrics {
    /// Derive metrics from a history, failing with
    /// [`ConvergenceError::InsufficientHistory`] below the configured
    /// minimum iteration count.
    pub fn extract(history: &[AnalysisIteration], config: &ConvergenceConfig) -> Result<Self> {
        if history.len() < config.min_iterations {
            return Err(ConvergenceError::InsufficientHistory {
                required: config.min_iterations,
                actual: history.len(),
            });
        }

        // The engine appends chronologically, but re-sort defensively.
        // Stable sort keeps insertion order for equal timestamps.
        let mut iterations = history.to_vec();
        iterations.sort_by_key(|it| it.timestamp_ms);

        let count = iterations.len();
        let confidences: Vec<f64> = iterations.iter().map(|it| it.confidence).collect();

        let mean = confidences.iter().sum::<f64>() / count as f64;
        let overall_variance = population_variance(&confidences, mean);

        let window_len = config.stability_window.min(count);
        let recent = &confidences[count - window_len..];
        let recent_mean = recent.iter().sum::<f64>() / window_len as f64;
        let recent_variance = population_variance(recent, recent_mean);

        let deltas: Vec<f64> = confidences.windows(2).map(|w| w[1] - w[0]).collect();

        let (dominant_label, dominant_count) = modal_label(&iterations);
        let (recent_dominant_label, recent_dominant_count) =
            modal_label(&iterations[count - window_len..]);

        Ok(Self {
            latest_confidence: confidences[count - 1],
            mean_confidence: mean,
            overall_variance,
            recent_variance,
            deltas,
            dominant_label,
            dominant_count,
            recent_dominant_label,
            recent_dominant_count,
            window_len,
            iteration_count: count,
            iterations,
        })
    }

    /// Timestamp of the newest iteration.
    pub fn latest_timestamp_ms(&self) -> u64 {
        self.iterations.last().map(|it| it.timestamp_ms).unwrap_or(0)
    }
}

fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Most frequent label; ties broken by earliest first occurrence.
fn modal_label(iterations: &[AnalysisIteration]) -> (String, usize) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();

    for (idx, it) in iterations.iter().enumerate() {
        *counts.entry(it.label.as_str()).or_insert(0) += 1;
        first_seen.entry(it.label.as_str()).or_insert(idx);
    }

    counts
        .into_iter()
        .min_by_key(|(label, count)| (std::cmp::Reverse(*count), first_seen[label]))
        .map(|(label, count)| (label.to_string(), count))
        .unwrap_or_default()
}
