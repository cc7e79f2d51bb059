//! Descriptive statistics over consumption series
//!
//! Every function here is total: empty or degenerate input produces zero
//! (or the neutral classification) rather than NaN.

use crate::safe_div;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Direction of a series over its history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    /// Only produced by callers that cannot classify a series
    Volatile,
}

/// Outcome of the seasonality check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seasonality {
    Detected,
    NotDetected,
    InsufficientData,
}

/// Relative half-to-half change below which a series counts as stable
pub const STABLE_TREND_THRESHOLD: f64 = 0.1;

/// Coefficient of variation above which a series counts as seasonal
pub const SEASONALITY_CV_THRESHOLD: f64 = 0.3;

/// Arithmetic mean, 0 for an empty series
pub fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let m = series.iter().mean();
    if m.is_finite() {
        m
    } else {
        0.0
    }
}

/// Population variance (divides by n), 0 for fewer than two points
pub fn variance(series: &[f64]) -> f64 {
    if series.len() < 2 {
        return 0.0;
    }
    let v = series.iter().population_variance();
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Population standard deviation
pub fn std_dev(series: &[f64]) -> f64 {
    variance(series).sqrt()
}

/// Standard deviation relative to the mean, 0 when the mean is 0
pub fn coefficient_of_variation(series: &[f64]) -> f64 {
    safe_div(std_dev(series), mean(series))
}

/// Classify the direction of a series by comparing the means of its halves.
///
/// The first half holds `n / 2` points. Series shorter than three points are
/// always [`Trend::Stable`]; this function never returns [`Trend::Volatile`].
pub fn trend(series: &[f64]) -> Trend {
    if series.len() < 3 {
        return Trend::Stable;
    }

    let (first, second) = series.split_at(series.len() / 2);
    let difference = mean(second) - mean(first);
    let overall = mean(series);

    if difference.abs() < STABLE_TREND_THRESHOLD * overall.abs() {
        Trend::Stable
    } else if difference > 0.0 {
        Trend::Increasing
    } else if difference < 0.0 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Detect seasonality from the coefficient of variation
pub fn seasonality(series: &[f64]) -> Seasonality {
    if series.len() < 4 {
        return Seasonality::InsufficientData;
    }

    if coefficient_of_variation(series) > SEASONALITY_CV_THRESHOLD {
        Seasonality::Detected
    } else {
        Seasonality::NotDetected
    }
}

/// First-order differences, length n - 1
pub fn differences(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Overlapping windows of `size` consecutive points
pub fn pattern_windows(series: &[f64], size: usize) -> Vec<&[f64]> {
    if size == 0 || series.len() < size {
        return Vec::new();
    }
    series.windows(size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_mean_and_variance() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0);
        assert_relative_eq!(variance(&data), 4.0);
        assert_relative_eq!(std_dev(&data), 2.0);
    }

    #[test]
    fn test_degenerate_inputs_resolve_to_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[42.0]), 0.0);
        assert_eq!(coefficient_of_variation(&[]), 0.0);
    }

    #[rstest]
    #[case(&[10.0, 10.0, 20.0, 20.0], Trend::Increasing)]
    #[case(&[20.0, 20.0, 10.0, 10.0], Trend::Decreasing)]
    #[case(&[100.0, 102.0, 98.0, 101.0], Trend::Stable)]
    #[case(&[10.0, 50.0], Trend::Stable)]
    fn test_trend(#[case] data: &[f64], #[case] expected: Trend) {
        assert_eq!(trend(data), expected);
    }

    #[test]
    fn test_trend_uses_floor_split() {
        // first half = [10], second half = [10, 40]; mean 25 vs 10
        assert_eq!(trend(&[10.0, 10.0, 40.0]), Trend::Increasing);
    }

    #[rstest]
    #[case(&[], Seasonality::InsufficientData)]
    #[case(&[1.0, 100.0, 1.0], Seasonality::InsufficientData)]
    #[case(&[100.0, 101.0, 99.0, 100.0], Seasonality::NotDetected)]
    #[case(&[10.0, 100.0, 10.0, 100.0], Seasonality::Detected)]
    fn test_seasonality(#[case] data: &[f64], #[case] expected: Seasonality) {
        assert_eq!(seasonality(data), expected);
    }

    #[test]
    fn test_differences() {
        assert_eq!(differences(&[1.0, 4.0, 9.0]), vec![3.0, 5.0]);
        assert!(differences(&[1.0]).is_empty());
    }

    #[test]
    fn test_pattern_windows() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let windows = pattern_windows(&data, 3);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1], &[2.0, 3.0, 4.0]);
        assert!(pattern_windows(&data, 5).is_empty());
        assert!(pattern_windows(&data, 0).is_empty());
    }
}
