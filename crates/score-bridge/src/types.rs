use serde::{Deserialize, Serialize};

/// Normalization method applied to a raw similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Straight rescale across the calibrated [min, max] range.
    Linear,
    /// Piecewise map anchored at the calibrated median (median -> 50).
    Percentile,
}

/// How an external identifier was matched to an internal file id.
///
/// Kept on every lookup result so downstream consumers can audit
/// low-confidence fuzzy matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Verbatim identifier hit.
    Exact,
    /// Hit via a case-normalized, basename, or extension-stripped variant.
    NormalizedCaseInsensitive,
    /// Best Jaccard character-set similarity above the fuzzy threshold.
    FuzzyJaccard,
    /// Best normalized edit-distance similarity above the fuzzy threshold.
    FuzzyEditDistance,
    /// No mapping found; the score is a default, not a measurement.
    None,
}

/// A raw similarity score rescaled into the 0–100 confidence domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedConfidence {
    /// Confidence in [0, 100].
    pub score: u8,
    /// The collaborator's raw score this was derived from.
    pub raw_score: f64,
    pub method: Method,
    pub match_kind: MatchKind,
}

impl NormalizedConfidence {
    /// The degraded default returned for unmapped identifiers.
    pub fn unmatched() -> Self {
        Self {
            score: 0,
            raw_score: 0.0,
            method: Method::Linear,
            match_kind: MatchKind::None,
        }
    }
}

/// A successfully resolved identity, returned by the strict lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub internal_id: String,
    pub raw_score: f64,
    pub match_kind: MatchKind,
}
