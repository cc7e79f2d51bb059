//! Error types for the fuel_forecast crate

use consumption_math::MathError;
use thiserror::Error;

/// Custom error types for the fuel_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data loading or parsing
    #[error("Data error: {0}")]
    DataError(String),

    /// Caller supplied an argument outside its contract
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Method name that does not map to any forecaster
    #[error("Unknown forecasting method: {0}")]
    UnknownMethod(String),

    /// Engine configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON (de)serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<chrono::ParseError> for ForecastError {
    fn from(err: chrono::ParseError) -> Self {
        ForecastError::DataError(format!("Invalid date: {}", err))
    }
}
