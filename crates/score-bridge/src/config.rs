use crate::types::Method;
use serde::{Deserialize, Serialize};

/// Empirically calibrated range of raw similarity scores.
///
/// Measured over the production collection's score distribution; the
/// defaults are calibration data, not business logic, and can be
/// overridden when the collection is re-profiled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRange {
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl Default for CalibrationRange {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 45.0,
            median: 21.5,
        }
    }
}

impl CalibrationRange {
    /// Whether the range is usable: `min < median < max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.median.is_finite()
            && self.min < self.median
            && self.median < self.max
    }
}

/// Configuration for the score bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub calibration: CalibrationRange,

    /// Method used by `lookup_confidence` when the caller does not pick
    /// one explicitly.
    pub default_method: Method,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            calibration: CalibrationRange::default(),
            default_method: Method::Linear,
        }
    }
}
