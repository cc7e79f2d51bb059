//! Exponential smoothing implementations
//!
//! Contains:
//! - Simple Exponential Smoothing
//! - Double Exponential Smoothing (Holt's Method)

use crate::{MathError, Result};

fn check_factor(name: &str, value: f64) -> Result<()> {
    if value <= 0.0 || value >= 1.0 || !value.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "{} must be between 0 and 1 (exclusive)",
            name
        )));
    }
    Ok(())
}

/// Simple Exponential Smoothing implementation
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
    values_seen: usize,
}

impl ExponentialSmoothing {
    /// Create a new Exponential Smoothing with the specified alpha (smoothing factor)
    pub fn new(alpha: f64) -> Result<Self> {
        check_factor("Alpha", alpha)?;

        Ok(Self {
            alpha,
            level: None,
            values_seen: 0,
        })
    }

    /// Feed every value of `series` in order
    pub fn fit(mut self, series: &[f64]) -> Self {
        for &value in series {
            self.update(value);
        }
        self
    }

    /// Update the smoothed level with a new value
    pub fn update(&mut self, value: f64) {
        self.values_seen += 1;

        self.level = Some(match self.level {
            // First value seeds the level
            None => value,
            Some(current) => self.alpha * value + (1.0 - self.alpha) * current,
        });
    }

    /// Get the current smoothed level
    pub fn level(&self) -> Result<f64> {
        self.level.ok_or_else(|| {
            MathError::InsufficientData("No data available for exponential smoothing".to_string())
        })
    }

    /// Number of values consumed so far
    pub fn values_seen(&self) -> usize {
        self.values_seen
    }

    /// Get the current alpha value
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

/// Double Exponential Smoothing (Holt's Method) implementation
#[derive(Debug, Clone)]
pub struct DoubleExponentialSmoothing {
    alpha: f64,
    beta: f64,
    state: Option<(f64, f64)>,
    values_seen: usize,
}

impl DoubleExponentialSmoothing {
    /// Create a new Double Exponential Smoothing with the specified parameters
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        check_factor("Alpha", alpha)?;
        check_factor("Beta", beta)?;

        Ok(Self {
            alpha,
            beta,
            state: None,
            values_seen: 0,
        })
    }

    /// Feed every value of `series` in order
    pub fn fit(mut self, series: &[f64]) -> Self {
        for &value in series {
            self.update(value);
        }
        self
    }

    /// Update level and trend with a new value
    pub fn update(&mut self, value: f64) {
        self.values_seen += 1;

        self.state = Some(match self.state {
            // First value seeds the level with a flat trend
            None => (value, 0.0),
            Some((prev_level, prev_trend)) => {
                let level = self.alpha * value + (1.0 - self.alpha) * (prev_level + prev_trend);
                let trend = self.beta * (level - prev_level) + (1.0 - self.beta) * prev_trend;
                (level, trend)
            }
        });
    }

    /// Forecast `h` steps ahead
    pub fn forecast(&self, h: usize) -> Result<f64> {
        if self.values_seen < 2 {
            return Err(MathError::InsufficientData(
                "Holt's method needs at least 2 observations".to_string(),
            ));
        }
        let (level, trend) = self.components()?;
        Ok(level + h as f64 * trend)
    }

    /// Current `(level, trend)` pair
    pub fn components(&self) -> Result<(f64, f64)> {
        self.state.ok_or_else(|| {
            MathError::InsufficientData(
                "No data available for double exponential smoothing".to_string(),
            )
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}
