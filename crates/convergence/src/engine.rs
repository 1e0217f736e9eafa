use crate::cache::{CacheStats, ConvergenceCache};
use crate::config::ConvergenceConfig;
use crate::error::Result;
use crate::judge::{judge, ConvergenceResult};
use crate::metrics::DerivedMetrics;
use crate::scorers::score_components;
use crate::weights::Weights;
use consolidator_protocol::{AnalysisIteration, CategoryProvider};
use std::sync::Arc;

/// Convergence evaluation facade: cache → metrics → scorers → judge.
///
/// All collaborators are injected at construction. The engine itself is
/// `Send + Sync`; the cache is its only mutable state.
pub struct ConvergenceEngine {
    config: ConvergenceConfig,
    weights: Weights,
    cache: ConvergenceCache,
    categories: Arc<dyn CategoryProvider>,
}

impl ConvergenceEngine {
    pub fn new(
        config: ConvergenceConfig,
        weights: Weights,
        categories: Arc<dyn CategoryProvider>,
    ) -> Self {
        let cache = ConvergenceCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            config,
            weights,
            cache,
            categories,
        }
    }

    /// Engine with default config and weights.
    pub fn with_defaults(categories: Arc<dyn CategoryProvider>) -> Self {
        Self::new(ConvergenceConfig::default(), Weights::default(), categories)
    }

    /// Evaluate one file's history with the engine's configured weights.
    ///
    /// A cache hit for the exact history snapshot short-circuits the whole
    /// pipeline. Fails with `InsufficientHistory` below the configured
    /// minimum iteration count: callers must treat that as "not yet
    /// evaluable", not as a user-facing error.
    pub fn evaluate(
        &self,
        file_id: &str,
        history: &[AnalysisIteration],
    ) -> Result<ConvergenceResult> {
        let count = history.len();
        let last_timestamp_ms = history.iter().map(|it| it.timestamp_ms).max().unwrap_or(0);

        if let Some(hit) = self.cache.get(file_id, count, last_timestamp_ms) {
            log::debug!("convergence cache hit: file={file_id} iterations={count}");
            return Ok(hit);
        }

        let result = self.evaluate_with_weights(file_id, history, &self.weights)?;
        self.cache
            .insert(file_id, count, last_timestamp_ms, result.clone());
        log::debug!(
            "evaluated file={file_id} iterations={count} composite={:.3} converged={}",
            result.composite_score,
            result.is_converged
        );
        Ok(result)
    }

    /// Evaluate with caller-supplied weights, bypassing the cache.
    ///
    /// The cache key does not encode weights, so per-call overrides must
    /// not share entries with the engine's configured weights.
    pub fn evaluate_with_weights(
        &self,
        file_id: &str,
        history: &[AnalysisIteration],
        weights: &Weights,
    ) -> Result<ConvergenceResult> {
        let metrics = DerivedMetrics::extract(history, &self.config)?;
        let manual = self.categories.manual_categories(file_id);
        let components = score_components(&metrics, &manual, &self.config);
        Ok(judge(
            components,
            weights,
            metrics.iteration_count,
            metrics.latest_timestamp_ms(),
        ))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }
}
