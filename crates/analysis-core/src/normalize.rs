//! Metric normalization onto a [0, 1] "goodness" scale.
//!
//! Ranges are fixed per metric. A missing reading maps to the neutral 0.5 so
//! that one absent fact never drags a domain score to an extreme.

/// Closed range a raw metric is mapped across
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn normalize(&self, value: Option<f64>) -> f64 {
        normalize(value, self.min, self.max)
    }
}

pub const PE_RANGE: MetricRange = MetricRange::new(0.0, 100.0);
pub const PB_RANGE: MetricRange = MetricRange::new(0.0, 10.0);
pub const ROE_RANGE: MetricRange = MetricRange::new(0.0, 0.3);
/// Scored inverted: lower leverage is better.
pub const DEBT_TO_EQUITY_RANGE: MetricRange = MetricRange::new(0.0, 2.0);
pub const FREE_CASH_FLOW_RANGE: MetricRange = MetricRange::new(0.0, 1e9);

/// Neutral score used for any missing or undefined reading.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Map `value` linearly from `[min, max]` onto `[0, 1]`, clamping outside values.
///
/// `None` and non-finite values give `NEUTRAL_SCORE`. A degenerate range
/// (`max <= min`) also gives `NEUTRAL_SCORE`.
pub fn normalize(value: Option<f64>, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && max > min => clamp_unit((v - min) / (max - min)),
        _ => NEUTRAL_SCORE,
    }
}

/// Clamp to [0, 1]. NaN collapses to the neutral score.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        NEUTRAL_SCORE
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Round to 4 decimal places (output boundary only).
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

pub fn round4_opt(value: Option<f64>) -> Option<f64> {
    value.map(round4)
}

/// Mean of a slice, `None` when empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_missing_value_is_neutral() {
        assert_eq!(normalize(None, 0.0, 100.0), 0.5);
        assert_eq!(normalize(None, -5.0, 5.0), 0.5);
        assert_eq!(PE_RANGE.normalize(None), 0.5);
    }

    #[test]
    fn test_linear_mapping() {
        assert_abs_diff_eq!(normalize(Some(25.0), 0.0, 100.0), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(ROE_RANGE.normalize(Some(0.15)), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(FREE_CASH_FLOW_RANGE.normalize(Some(2.5e8)), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        assert_eq!(normalize(Some(-10.0), 0.0, 100.0), 0.0);
        assert_eq!(normalize(Some(250.0), 0.0, 100.0), 1.0);
        assert_eq!(PB_RANGE.normalize(Some(12.0)), 1.0);
    }

    #[test]
    fn test_non_finite_and_degenerate_inputs() {
        assert_eq!(normalize(Some(f64::NAN), 0.0, 1.0), 0.5);
        assert_eq!(normalize(Some(f64::INFINITY), 0.0, 1.0), 0.5);
        assert_eq!(normalize(Some(3.0), 1.0, 1.0), 0.5);
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.65251), 0.6525);
        assert_eq!(round4(0.12345678), 0.1235);
        assert_eq!(round4_opt(None), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }
}
