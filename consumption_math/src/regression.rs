//! Ordinary least squares regression of value against period index

use crate::statistics::mean;
use crate::{safe_div, saturate};
use serde::{Deserialize, Serialize};

/// Fitted straight line `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change per period
    pub slope: f64,
    /// Value at index 0
    pub intercept: f64,
    /// Coefficient of determination, clamped to be non-negative
    pub r_squared: f64,
    /// Number of points the line was fitted on
    pub observations: usize,
}

impl LinearFit {
    /// Fit a line through `series` using indices `0..n` as the regressor.
    ///
    /// Fewer than two points yield a flat line through the first value
    /// (or zero) with an R² of 0.
    pub fn fit(series: &[f64]) -> Self {
        let n = series.len();
        if n < 2 {
            return Self {
                slope: 0.0,
                intercept: series.first().copied().unwrap_or(0.0),
                r_squared: 0.0,
                observations: n,
            };
        }

        // Fit on values scaled into [-2, 2] so the sums of squares stay finite
        let scale = power_of_two_scale(series);
        let scaled: Vec<f64> = series.iter().map(|y| y / scale).collect();

        let x_mean = (n - 1) as f64 / 2.0;
        let y_mean = mean(&scaled);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, &y) in scaled.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        let slope = safe_div(numerator, denominator);
        let intercept = y_mean - slope * x_mean;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for (i, &y) in scaled.iter().enumerate() {
            let predicted = slope * i as f64 + intercept;
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - predicted).powi(2);
        }

        let r_squared = if ss_total.abs() < f64::EPSILON {
            0.0
        } else {
            (1.0 - ss_residual / ss_total).max(0.0)
        };

        Self {
            slope: saturate(slope * scale),
            intercept: saturate(intercept * scale),
            r_squared,
            observations: n,
        }
    }

    /// Value of the fitted line at an arbitrary index
    pub fn value_at(&self, index: f64) -> f64 {
        saturate(self.slope * index + self.intercept)
    }
}

/// Power of two bringing the largest magnitude in `series` to at most 2.
/// Dividing by a power of two is exact, so ordinary inputs fit unchanged.
fn power_of_two_scale(series: &[f64]) -> f64 {
    let largest = series.iter().fold(0.0_f64, |acc, y| acc.max(y.abs()));
    if !largest.is_finite() || largest <= 1.0 {
        return 1.0;
    }
    let exponent = largest.log2().ceil().min(1023.0) as i32;
    2.0_f64.powi(exponent)
}
