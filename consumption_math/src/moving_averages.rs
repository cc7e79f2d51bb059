//! Moving average calculation implementations
//!
//! Contains:
//! - Simple (trailing) Moving Average
//! - Centered Moving Average used for trend extraction

use crate::statistics::mean;
use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);

        // Remove oldest value if we have more than period values
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        // Incremental mean; a running sum overflows near f64::MAX
        let window: Vec<f64> = self.values.iter().copied().collect();
        Ok(mean(&window))
    }

    /// Values currently inside the window, oldest first
    pub fn window(&self) -> impl Iterator<Item = &f64> {
        self.values.iter()
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }
}

/// Centered moving average of odd-or-even `window`, one value per input point.
///
/// Points too close to either end for a full window take the value of the
/// nearest fully-covered point. A window larger than the series, or a series
/// with no fully-covered point, degrades to the plain mean.
pub fn centered_moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    let window = window.clamp(1, n);
    let half = window / 2;
    // For even windows the extra point is taken from the left side
    let left = half;
    let right = window - 1 - half;

    if left + right >= n {
        return vec![mean(series); n];
    }

    let first_full = left;
    let last_full = n - 1 - right;

    (0..n)
        .map(|i| {
            let center = i.clamp(first_full, last_full);
            mean(&series[center - left..=center + right])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_err());

        sma.update(2.0);
        sma.update(4.0);
        assert!(sma.value().is_err());

        sma.update(6.0);
        assert_eq!(sma.value().unwrap(), 4.0); // (2 + 4 + 6) / 3 = 4

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value().unwrap(), 6.0); // (4 + 6 + 8) / 3 = 6
        assert_eq!(sma.window().count(), 3);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(SimpleMovingAverage::new(0).is_err());
    }

    #[test]
    fn test_centered_moving_average_replicates_edges() {
        let cma = centered_moving_average(&[10.0, 20.0, 30.0, 10.0, 20.0, 30.0], 3);
        assert_eq!(cma.len(), 6);
        for value in &cma {
            assert_relative_eq!(*value, 20.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_centered_moving_average_follows_line() {
        let cma = centered_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(cma, vec![2.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn test_means_do_not_overflow_near_max() {
        let huge = [f64::MAX, f64::MAX * 0.9, f64::MAX];

        let mut sma = SimpleMovingAverage::new(3).unwrap();
        for value in huge {
            sma.update(value);
        }
        let average = sma.value().unwrap();
        assert!(average.is_finite());
        assert_relative_eq!(average, f64::MAX * (2.9 / 3.0), max_relative = 1e-12);

        let cma = centered_moving_average(&huge, 3);
        assert!(cma.iter().all(|v| v.is_finite() && *v > f64::MAX * 0.9));
        assert!(centered_moving_average(&huge, 5).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_centered_moving_average_small_inputs() {
        assert!(centered_moving_average(&[], 3).is_empty());
        assert_eq!(centered_moving_average(&[4.0], 3), vec![4.0]);
        assert_eq!(centered_moving_average(&[2.0, 4.0], 1), vec![2.0, 4.0]);
    }
}
