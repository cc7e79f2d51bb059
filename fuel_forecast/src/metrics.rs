//! Metrics for evaluating forecast performance

use crate::error::{ForecastError, Result};
use crate::utils::holdout_split;
use consumption_math::saturate;
use consumption_math::statistics::mean;
use serde::{Deserialize, Serialize};

/// Minimum cleaned points before accuracy is estimated
pub const MIN_POINTS_FOR_ACCURACY: usize = 3;

/// How far a forecast can be trusted, derived from MAPE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reliability {
    High,
    Medium,
    Low,
}

impl Reliability {
    /// High below 20%, Medium below 40%, Low otherwise
    pub fn from_mape(mape: f64) -> Self {
        if mape < 20.0 {
            Reliability::High
        } else if mape < 40.0 {
            Reliability::Medium
        } else {
            Reliability::Low
        }
    }
}

/// Error metrics for a forecast measured against actual values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyReport {
    /// Mean Absolute Error
    pub mean_absolute_error: f64,
    /// Mean Absolute Percentage Error, in percent
    pub mean_absolute_percent_error: f64,
    /// Root Mean Squared Error
    pub root_mean_square_error: f64,
    pub reliability: Reliability,
}

/// Calculate accuracy metrics for a forecast vs actual values.
///
/// Points whose actual value is zero are left out of the MAPE average.
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<AccuracyReport> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let errors: Vec<f64> = forecast
        .iter()
        .zip(actual.iter())
        .map(|(&f, &a)| saturate(a - f))
        .collect();

    let absolute: Vec<f64> = errors.iter().map(|e| e.abs()).collect();
    let mae = mean(&absolute);

    // Squares are taken relative to the largest error so they cannot overflow
    let largest = absolute.iter().fold(0.0_f64, |acc, e| acc.max(*e));
    let rmse = if largest > 0.0 {
        let relative: Vec<f64> = absolute.iter().map(|e| (e / largest).powi(2)).collect();
        saturate(largest * mean(&relative).sqrt())
    } else {
        0.0
    };

    let percentage_errors: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, e)| saturate((e.abs() / a.abs()) * 100.0))
        .collect();
    let mape = mean(&percentage_errors);

    Ok(AccuracyReport {
        mean_absolute_error: mae,
        mean_absolute_percent_error: mape,
        root_mean_square_error: rmse,
        reliability: Reliability::from_mape(mape),
    })
}

/// Estimate how forecastable a cleaned series is.
///
/// The tail of the series (`holdout_ratio`, rounded up, at least one point)
/// is predicted by the flat mean of the remaining head. Returns `None` when
/// fewer than [`MIN_POINTS_FOR_ACCURACY`] points are available.
pub fn estimate_accuracy(cleaned: &[f64], holdout_ratio: f64) -> Option<AccuracyReport> {
    if cleaned.len() < MIN_POINTS_FOR_ACCURACY {
        return None;
    }

    let (train, validation) = holdout_split(cleaned, holdout_ratio);
    let baseline = vec![mean(train); validation.len()];

    forecast_accuracy(&baseline, validation).ok()
}

impl std::fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:         {:.4}", self.mean_absolute_error)?;
        writeln!(f, "  MAPE:        {:.4}%", self.mean_absolute_percent_error)?;
        writeln!(f, "  RMSE:        {:.4}", self.root_mean_square_error)?;
        writeln!(f, "  Reliability: {:?}", self.reliability)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Reliability::High)]
    #[case(19.99, Reliability::High)]
    #[case(20.0, Reliability::Medium)]
    #[case(39.99, Reliability::Medium)]
    #[case(40.0, Reliability::Low)]
    #[case(250.0, Reliability::Low)]
    fn test_reliability_boundaries(#[case] mape: f64, #[case] expected: Reliability) {
        assert_eq!(Reliability::from_mape(mape), expected);
    }

    #[test]
    fn test_forecast_accuracy() {
        let actual = [10.0, 20.0, 30.0, 40.0, 50.0];
        let predicted = [12.0, 18.0, 33.0, 37.0, 52.0];

        let report = forecast_accuracy(&predicted, &actual).unwrap();
        assert_relative_eq!(report.mean_absolute_error, 2.4, epsilon = 1e-9);
        assert_relative_eq!(report.root_mean_square_error, (6.0f64).sqrt(), epsilon = 1e-9);
        // (20 + 10 + 10 + 7.5 + 4) / 5
        assert_relative_eq!(report.mean_absolute_percent_error, 10.3, epsilon = 1e-9);
        assert_eq!(report.reliability, Reliability::High);
    }

    #[test]
    fn test_zero_actuals_skipped_in_mape() {
        let report = forecast_accuracy(&[5.0, 15.0], &[0.0, 10.0]).unwrap();
        assert_relative_eq!(report.mean_absolute_percent_error, 50.0, epsilon = 1e-9);
        assert_relative_eq!(report.mean_absolute_error, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forecast_accuracy_length_mismatch() {
        assert!(forecast_accuracy(&[1.0], &[1.0, 2.0]).is_err());
        assert!(forecast_accuracy(&[], &[]).is_err());
    }

    #[test]
    fn test_estimate_accuracy_requires_three_points() {
        assert!(estimate_accuracy(&[], 0.3).is_none());
        assert!(estimate_accuracy(&[10.0, 20.0], 0.3).is_none());
        assert!(estimate_accuracy(&[10.0, 20.0, 30.0], 0.3).is_some());
    }

    #[test]
    fn test_estimate_accuracy_uses_training_mean() {
        // head [10, 20] -> baseline 15, tail [30]
        let report = estimate_accuracy(&[10.0, 20.0, 30.0], 0.3).unwrap();
        assert_relative_eq!(report.mean_absolute_error, 15.0, epsilon = 1e-9);
        assert_relative_eq!(report.mean_absolute_percent_error, 50.0, epsilon = 1e-9);
        assert_eq!(report.reliability, Reliability::Low);

        let flat = estimate_accuracy(&[100.0; 10], 0.3).unwrap();
        assert_eq!(flat.mean_absolute_error, 0.0);
        assert_eq!(flat.reliability, Reliability::High);
    }

    #[test]
    fn test_huge_errors_stay_finite() {
        let report = forecast_accuracy(&[0.0, 0.0], &[f64::MAX, f64::MAX * 0.5]).unwrap();
        assert!(report.root_mean_square_error.is_finite());
        assert!(report.mean_absolute_error.is_finite());
        assert_relative_eq!(report.mean_absolute_error, f64::MAX * 0.75, max_relative = 1e-12);
        assert_relative_eq!(
            report.root_mean_square_error,
            f64::MAX * (1.25f64 / 2.0).sqrt(),
            max_relative = 1e-12
        );
    }
}
