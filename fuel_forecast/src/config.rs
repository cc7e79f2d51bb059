//! Engine configuration
//!
//! Every field has a default, so a partial JSON document only overrides the
//! keys it names:
//!
//! ```
//! use fuel_forecast::config::{EngineConfig, EnsembleWeighting};
//!
//! let config = EngineConfig::from_json_str(r#"{ "ensemble_weighting": "accuracy" }"#).unwrap();
//! assert_eq!(config.ensemble_weighting, EnsembleWeighting::Accuracy);
//! assert_eq!(config.alpha, 0.3);
//! ```

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which smoother backs [`Method::Exponential`](crate::Method::Exponential)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExponentialVariant {
    /// Flat forecast from the smoothed level
    #[default]
    Single,
    /// Holt's trend-adjusted smoothing
    Double,
}

/// Extra term added to each ARIMA forecast step, bounded to 5% of the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Perturbation {
    /// Moving-average term driven by the last in-sample residual
    #[default]
    Deterministic,
    /// Uniform jitter from a seeded generator; reproducible per seed
    Seeded { seed: u64 },
}

/// How the ensemble weights its component forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleWeighting {
    #[default]
    Equal,
    /// Inverse holdout error of each component
    Accuracy,
}

/// Tunable parameters of the forecasting engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Level smoothing factor
    pub alpha: f64,
    /// Trend smoothing factor for Holt's method
    pub beta: f64,
    /// Share of the history held out for accuracy estimation
    pub holdout_ratio: f64,
    /// Largest horizon a caller may request
    pub max_horizon: usize,
    pub exponential_variant: ExponentialVariant,
    pub perturbation: Perturbation,
    pub ensemble_weighting: EnsembleWeighting,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            holdout_ratio: 0.3,
            max_horizon: 120,
            exponential_variant: ExponentialVariant::Single,
            perturbation: Perturbation::Deterministic,
            ensemble_weighting: EnsembleWeighting::Equal,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check that every parameter is inside its valid range
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ForecastError::ConfigError(format!(
                    "{} must be between 0 and 1 (exclusive), got {}",
                    name, value
                )));
            }
        }

        if !(self.holdout_ratio > 0.0 && self.holdout_ratio < 1.0) {
            return Err(ForecastError::ConfigError(format!(
                "holdout_ratio must be between 0 and 1 (exclusive), got {}",
                self.holdout_ratio
            )));
        }

        if self.max_horizon == 0 {
            return Err(ForecastError::ConfigError(
                "max_horizon must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
