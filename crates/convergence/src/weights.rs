use crate::error::{ConvergenceError, Result};
use crate::scorers::ComponentScores;
use serde::{Deserialize, Serialize};

/// Immutable composite-score weights, guaranteed to sum to 1.
///
/// Built through the validating constructor: negative components and
/// zero-sum inputs are rejected, any other positive sum is re-normalized.
/// There is no way to mutate a `Weights` after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    confidence: f64,
    stability: f64,
    type_consistency: f64,
    category_alignment: f64,
    improvement: f64,
}

impl Weights {
    pub fn new(
        confidence: f64,
        stability: f64,
        type_consistency: f64,
        category_alignment: f64,
        improvement: f64,
    ) -> Result<Self> {
        let components = [
            confidence,
            stability,
            type_consistency,
            category_alignment,
            improvement,
        ];
        if components.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConvergenceError::InvalidWeights(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        let sum: f64 = components.iter().sum();
        if sum <= 0.0 {
            return Err(ConvergenceError::InvalidWeights(
                "weights must sum to a positive value".to_string(),
            ));
        }
        if (sum - 1.0).abs() > f64::EPSILON {
            log::debug!("re-normalizing weights with sum {sum:.4}");
        }
        Ok(Self {
            confidence: confidence / sum,
            stability: stability / sum,
            type_consistency: type_consistency / sum,
            category_alignment: category_alignment / sum,
            improvement: improvement / sum,
        })
    }

    /// Weighted composite of the five component scores, clamped to [0, 1].
    pub fn composite(&self, scores: &ComponentScores) -> f64 {
        let composite = self.confidence * scores.confidence
            + self.stability * scores.stability
            + self.type_consistency * scores.type_consistency
            + self.category_alignment * scores.category_alignment
            + self.improvement * scores.improvement;
        composite.clamp(0.0, 1.0)
    }
}

impl Default for Weights {
    /// Calibrated default split: confidence 0.30, stability 0.25,
    /// type consistency 0.20, category alignment 0.15, improvement 0.10.
    fn default() -> Self {
        Self {
            confidence: 0.30,
            stability: 0.25,
            type_consistency: 0.20,
            category_alignment: 0.15,
            improvement: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_scores(value: f64) -> ComponentScores {
        ComponentScores {
            confidence: value,
            stability: value,
            type_consistency: value,
            category_alignment: value,
            improvement: value,
        }
    }

    #[test]
    fn renormalizes_to_unit_sum() {
        let w = Weights::new(3.0, 2.5, 2.0, 1.5, 1.0).unwrap();
        assert_eq!(w, Weights::default());
    }

    #[test]
    fn rejects_negative_components() {
        assert!(Weights::new(0.5, -0.1, 0.2, 0.2, 0.2).is_err());
    }

    #[test]
    fn rejects_zero_sum() {
        assert!(Weights::new(0.0, 0.0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn composite_of_uniform_scores_is_that_score() {
        let w = Weights::default();
        let composite = w.composite(&uniform_scores(0.6));
        assert!((composite - 0.6).abs() < 1e-12);
    }
}
