use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for convergence evaluation.
///
/// The numeric defaults are calibrated against production data; override
/// them only with new calibration data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// Minimum number of iterations before a history becomes evaluable.
    pub min_iterations: usize,

    /// Number of most-recent iterations used for "recent" variance and
    /// consistency calculations.
    pub stability_window: usize,

    /// Confidence threshold the confidence scorer measures against.
    pub min_confidence: f64,

    /// Variance considered fully unstable by the stability scorer.
    pub max_variance: f64,

    /// Maximum number of cached convergence results.
    pub cache_capacity: usize,

    /// How long a cached result stays valid.
    #[serde(with = "ttl_secs")]
    pub cache_ttl: Duration,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            min_iterations: 2,
            stability_window: 3,
            min_confidence: 0.85,
            max_variance: 0.05,
            cache_capacity: 100,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Serialize the TTL as plain seconds so JSON profiles stay readable.
mod ttl_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_calibration() {
        let cfg = ConvergenceConfig::default();
        assert_eq!(cfg.min_iterations, 2);
        assert_eq!(cfg.stability_window, 3);
        assert_eq!(cfg.min_confidence, 0.85);
        assert_eq!(cfg.max_variance, 0.05);
        assert_eq!(cfg.cache_capacity, 100);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn loads_from_json_profile() {
        let cfg: ConvergenceConfig = serde_json::from_str(
            r#"{
                "min_iterations": 3,
                "stability_window": 5,
                "min_confidence": 0.9,
                "max_variance": 0.1,
                "cache_capacity": 10,
                "cache_ttl": 60
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.min_iterations, 3);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(60));
    }
}
