//! Convergence classification.
//!
//! A pure two-state decision: the history either has or has not converged.
//! There is no persistent automaton: every call re-evaluates from the
//! component scores alone.

use crate::scorers::ComponentScores;
use crate::weights::Weights;
use serde::{Deserialize, Serialize};

/// Calibrated gate thresholds. Preserve exactly; do not retune without
/// new calibration data.
pub const GATE_CONFIDENCE: f64 = 0.70;
pub const GATE_STABILITY: f64 = 0.50;
pub const GATE_TYPE_CONSISTENCY: f64 = 0.60;
pub const GATE_COMPOSITE: f64 = 0.75;

/// Composite score at which convergence is declared outright.
pub const CONVERGED_COMPOSITE: f64 = 0.85;

/// The "high-quality" shortcut: strong individual signals override a
/// merely-adequate composite.
pub const HIGH_QUALITY_CONFIDENCE: f64 = 0.85;
pub const HIGH_QUALITY_STABILITY: f64 = 0.70;
pub const HIGH_QUALITY_TYPE_CONSISTENCY: f64 = 0.80;

/// Schema-export eligibility, intentionally stricter than convergence.
pub const SCHEMA_READY_CONFIDENCE: f64 = 0.85;
pub const SCHEMA_READY_TYPE_CONSISTENCY: f64 = 0.80;
pub const SCHEMA_READY_MIN_ITERATIONS: usize = 2;

/// The judged state of one file's analysis history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceResult {
    pub is_converged: bool,
    pub composite_score: f64,
    pub components: ComponentScores,

    /// Eligible for downstream structured-data export. Stricter than
    /// `is_converged`.
    pub schema_ready: bool,

    /// Ordered human-readable diagnostics. Informational only: carries no
    /// control-flow significance.
    pub recommendations: Vec<String>,

    /// Timestamp of the newest iteration the result was computed from.
    /// Deliberately not wall-clock time, so identical histories produce
    /// identical results.
    pub timestamp_ms: u64,
}

/// Classify a set of component scores.
pub fn judge(
    components: ComponentScores,
    weights: &Weights,
    iteration_count: usize,
    timestamp_ms: u64,
) -> ConvergenceResult {
    let composite_score = weights.composite(&components);

    let gates_pass = components.confidence >= GATE_CONFIDENCE
        && components.stability >= GATE_STABILITY
        && components.type_consistency >= GATE_TYPE_CONSISTENCY
        && composite_score >= GATE_COMPOSITE;

    let high_quality = components.confidence >= HIGH_QUALITY_CONFIDENCE
        && components.stability >= HIGH_QUALITY_STABILITY
        && components.type_consistency >= HIGH_QUALITY_TYPE_CONSISTENCY;

    let is_converged = gates_pass && (composite_score >= CONVERGED_COMPOSITE || high_quality);

    let schema_ready = components.confidence >= SCHEMA_READY_CONFIDENCE
        && components.type_consistency >= SCHEMA_READY_TYPE_CONSISTENCY
        && iteration_count >= SCHEMA_READY_MIN_ITERATIONS;

    let recommendations =
        build_recommendations(&components, composite_score, is_converged, schema_ready);

    ConvergenceResult {
        is_converged,
        composite_score,
        components,
        schema_ready,
        recommendations,
        timestamp_ms,
    }
}

/// Deterministic, ordered diagnostics: one line per failed gate, then the
/// overall verdict.
fn build_recommendations(
    components: &ComponentScores,
    composite_score: f64,
    is_converged: bool,
    schema_ready: bool,
) -> Vec<String> {
    let mut out = Vec::new();

    if components.confidence < GATE_CONFIDENCE {
        out.push(format!(
            "confidence {:.2} below {GATE_CONFIDENCE:.2}; run additional analysis passes",
            components.confidence
        ));
    }
    if components.stability < GATE_STABILITY {
        out.push(format!(
            "stability {:.2} below {GATE_STABILITY:.2}; confidence is still fluctuating",
            components.stability
        ));
    }
    if components.type_consistency < GATE_TYPE_CONSISTENCY {
        out.push(format!(
            "type consistency {:.2} below {GATE_TYPE_CONSISTENCY:.2}; label has not settled",
            components.type_consistency
        ));
    }
    if composite_score < GATE_COMPOSITE {
        out.push(format!(
            "composite {composite_score:.2} below {GATE_COMPOSITE:.2}"
        ));
    }

    if is_converged {
        out.push("classification stable; latest result can be trusted".to_string());
    } else if out.is_empty() {
        out.push(format!(
            "gates passed but composite {composite_score:.2} below {CONVERGED_COMPOSITE:.2}; \
             one or two more passes should settle it"
        ));
    }

    if schema_ready {
        out.push("eligible for structured schema export".to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(
        confidence: f64,
        stability: f64,
        type_consistency: f64,
        category_alignment: f64,
        improvement: f64,
    ) -> ComponentScores {
        ComponentScores {
            confidence,
            stability,
            type_consistency,
            category_alignment,
            improvement,
        }
    }

    #[test]
    fn strong_scores_converge() {
        let result = judge(scores(0.95, 0.9, 1.0, 1.0, 0.8), &Weights::default(), 3, 42);
        assert!(result.is_converged);
        assert!(result.composite_score >= CONVERGED_COMPOSITE);
        assert!(result.schema_ready);
        assert_eq!(result.timestamp_ms, 42);
    }

    #[test]
    fn confidence_gate_blocks_regardless_of_rest() {
        let result = judge(scores(0.69, 1.0, 1.0, 1.0, 1.0), &Weights::default(), 5, 0);
        assert!(!result.is_converged);
        assert!(result.recommendations[0].contains("confidence"));
    }

    #[test]
    fn high_quality_shortcut_overrides_adequate_composite() {
        // Composite lands between 0.75 and 0.85, but the individual
        // signals clear the high-quality bars.
        let components = scores(0.86, 0.72, 0.82, 0.75, 0.7);
        let composite = Weights::default().composite(&components);
        assert!(composite >= GATE_COMPOSITE && composite < CONVERGED_COMPOSITE);

        let result = judge(components, &Weights::default(), 3, 0);
        assert!(result.is_converged);
    }

    #[test]
    fn adequate_composite_without_quality_stays_unconverged() {
        // Same composite band, but stability below the high-quality bar.
        let components = scores(0.84, 0.69, 0.82, 0.7, 0.7);
        let composite = Weights::default().composite(&components);
        assert!(composite >= GATE_COMPOSITE && composite < CONVERGED_COMPOSITE);

        let result = judge(components, &Weights::default(), 3, 0);
        assert!(!result.is_converged);
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn schema_ready_is_stricter_than_convergence() {
        // Converges via composite, but confidence misses the schema bar.
        let result = judge(scores(0.84, 0.95, 0.95, 0.95, 0.9), &Weights::default(), 3, 0);
        assert!(result.is_converged);
        assert!(!result.schema_ready);

        // Not enough iterations despite strong components.
        let result = judge(scores(0.95, 0.9, 0.9, 0.9, 0.9), &Weights::default(), 1, 0);
        assert!(!result.schema_ready);
    }
}
