//! # Consumption Math
//!
//! Mathematical building blocks for forecasting monthly consumption series.
//! This crate provides the statistical primitives, least-squares regression,
//! exponential smoothers and moving averages used by the forecasting models.

use thiserror::Error;

pub mod moving_averages;
pub mod regression;
pub mod smoothing;
pub mod statistics;

pub use statistics::{Seasonality, Trend};

/// Errors that can occur in consumption calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for consumption math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Divide, resolving degenerate denominators to zero instead of NaN or infinity.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < f64::EPSILON || !denominator.is_finite() {
        0.0
    } else {
        let quotient = numerator / denominator;
        if quotient.is_finite() {
            quotient
        } else {
            0.0
        }
    }
}

/// Replace infinities with the largest finite value of the same sign and NaN
/// with zero, so overflowing arithmetic saturates instead of escaping.
pub fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}
