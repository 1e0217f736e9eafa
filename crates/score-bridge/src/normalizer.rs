use crate::config::CalibrationRange;
use crate::types::Method;

/// Rescale a raw similarity score into the 0–100 confidence domain.
///
/// Linear maps the calibrated [min, max] span directly; Percentile anchors
/// the calibrated median at exactly 50 and maps each half of the
/// distribution separately. Output is clamped before rounding, so the
/// result is always a valid confidence even for raw scores outside the
/// calibrated range.
pub fn normalize(raw: f64, method: Method, range: &CalibrationRange) -> u8 {
    if !raw.is_finite() {
        return 0;
    }

    let pct = match method {
        Method::Linear => {
            let span = (range.max - range.min).max(f64::EPSILON);
            100.0 * (raw - range.min) / span
        }
        Method::Percentile => {
            if raw <= range.median {
                (raw / range.median.max(f64::EPSILON)) * 50.0
            } else {
                let span = (range.max - range.median).max(f64::EPSILON);
                50.0 + (raw - range.median) / span * 50.0
            }
        }
    };

    pct.clamp(0.0, 100.0).round() as u8
}
