//! Forecasting models for monthly consumption series
//!
//! Each model follows the same two-stage shape: a [`ForecastModel`] holds the
//! method parameters and is trained on a cleaned series, producing a
//! [`TrainedForecastModel`] that can forecast any horizon. Models refuse to
//! train on fewer points than [`ForecastModel::min_observations`];
//! [`forecast_or_fallback`] turns that into the shared degenerate forecast.

use crate::config::{EngineConfig, ExponentialVariant};
use crate::error::{ForecastError, Result};
use consumption_math::saturate;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::{debug, warn};

pub mod arima;
pub mod exponential_smoothing;
pub mod linear;
pub mod moving_average;
pub mod pattern;
pub mod seasonal;

use arima::ArimaModel;
use exponential_smoothing::{ExponentialSmoothing, HoltSmoothing};
use linear::LinearTrend;
use moving_average::MovingAverage;
use pattern::PatternModel;
use seasonal::SeasonalDecomposition;

/// Confidence used for every step of a fallback forecast
pub const FALLBACK_CONFIDENCE: f64 = 50.0;

/// Fitted parameters a model reports alongside its forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "camelCase")]
pub enum ModelDetails {
    #[serde(rename_all = "camelCase")]
    MovingAverage { window: usize },
    #[serde(rename_all = "camelCase")]
    ExponentialSmoothing { level: f64, trend: Option<f64> },
    #[serde(rename_all = "camelCase")]
    LinearRegression {
        slope: f64,
        intercept: f64,
        r_squared: f64,
    },
    #[serde(rename_all = "camelCase")]
    Arima {
        ar_coefficient: f64,
        ma_coefficient: f64,
        order: usize,
    },
    #[serde(rename_all = "camelCase")]
    PatternWeighted { window: usize, average_weight: f64 },
    #[serde(rename_all = "camelCase")]
    SeasonalDecomposition { trend_slope: f64, cycle_length: usize },
}

/// Output of a single model for one horizon
#[derive(Debug, Clone, PartialEq)]
pub struct ModelForecast {
    /// Forecasted values, one per horizon step
    pub values: Vec<f64>,
    /// Confidence percentage per horizon step
    pub confidence: Vec<f64>,
    /// Fitted parameters, absent for fallback forecasts
    pub details: Option<ModelDetails>,
    /// Whether the model lacked data and produced the degenerate forecast
    pub fallback: bool,
}

impl ModelForecast {
    /// Create a forecast from values and matching confidences.
    ///
    /// Values that overflowed saturate at `f64::MAX`; NaN becomes zero.
    pub fn new(values: Vec<f64>, confidence: Vec<f64>, horizon: usize) -> Result<Self> {
        if values.len() != horizon || confidence.len() != horizon {
            return Err(ForecastError::InvalidParameter(format!(
                "Values length ({}) and confidence length ({}) must match horizon ({})",
                values.len(),
                confidence.len(),
                horizon
            )));
        }

        Ok(Self {
            values: values.into_iter().map(saturate).collect(),
            confidence,
            details: None,
            fallback: false,
        })
    }

    /// Attach fitted parameters
    pub fn with_details(mut self, details: ModelDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// The degenerate forecast: last observation (or zero) repeated with flat confidence
    pub fn fallback(cleaned: &[f64], horizon: usize) -> Self {
        let last = cleaned.last().copied().unwrap_or(0.0);
        Self {
            values: vec![last; horizon],
            confidence: vec![FALLBACK_CONFIDENCE; horizon],
            details: None,
            fallback: true,
        }
    }

    pub fn horizon(&self) -> usize {
        self.values.len()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> Result<ModelForecast>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a cleaned series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a cleaned series
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Fewest cleaned points the model can be trained on
    fn min_observations(&self) -> usize;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Shared check used by every model's `train`
pub(crate) fn ensure_observations(name: &str, series: &[f64], needed: usize) -> Result<()> {
    if series.len() < needed {
        return Err(ForecastError::DataError(format!(
            "Insufficient data for {}. Need at least {} observations, have {}.",
            name,
            needed,
            series.len()
        )));
    }
    Ok(())
}

/// Train `model` and forecast, or return the fallback forecast when the
/// series is shorter than the model's minimum.
pub fn forecast_or_fallback<M: ForecastModel>(
    model: &M,
    cleaned: &[f64],
    horizon: usize,
) -> Result<ModelForecast> {
    if cleaned.len() < model.min_observations() {
        warn!(
            model = model.name(),
            observations = cleaned.len(),
            required = model.min_observations(),
            "insufficient history, using fallback forecast"
        );
        return Ok(ModelForecast::fallback(cleaned, horizon));
    }

    let trained = model.train(cleaned)?;
    let forecast = trained.forecast(horizon)?;
    debug!(model = trained.name(), horizon, details = ?forecast.details, "model fitted");
    Ok(forecast)
}

/// Every concrete forecaster the engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    MovingAverage,
    SingleExponential,
    DoubleExponential,
    Linear,
    Arima,
    Pattern,
    Seasonal,
}

impl ModelKind {
    /// Smoother selected by the configured variant
    pub fn exponential(variant: ExponentialVariant) -> Self {
        match variant {
            ExponentialVariant::Single => ModelKind::SingleExponential,
            ExponentialVariant::Double => ModelKind::DoubleExponential,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::MovingAverage => "moving_average",
            ModelKind::SingleExponential => "exponential",
            ModelKind::DoubleExponential => "double_exponential",
            ModelKind::Linear => "linear",
            ModelKind::Arima => "arima",
            ModelKind::Pattern => "neural-network",
            ModelKind::Seasonal => "seasonal",
        }
    }

    /// Run this forecaster on a cleaned series
    pub fn run(self, cleaned: &[f64], horizon: usize, config: &EngineConfig) -> Result<ModelForecast> {
        match self {
            ModelKind::MovingAverage => forecast_or_fallback(&MovingAverage::default(), cleaned, horizon),
            ModelKind::SingleExponential => {
                forecast_or_fallback(&ExponentialSmoothing::new(config.alpha)?, cleaned, horizon)
            }
            ModelKind::DoubleExponential => {
                forecast_or_fallback(&HoltSmoothing::new(config.alpha, config.beta)?, cleaned, horizon)
            }
            ModelKind::Linear => forecast_or_fallback(&LinearTrend::default(), cleaned, horizon),
            ModelKind::Arima => forecast_or_fallback(&ArimaModel::new(config.perturbation), cleaned, horizon),
            ModelKind::Pattern => forecast_or_fallback(&PatternModel::default(), cleaned, horizon),
            ModelKind::Seasonal => forecast_or_fallback(&SeasonalDecomposition::default(), cleaned, horizon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_model_forecast_length_validation() {
        assert!(ModelForecast::new(vec![1.0, 2.0], vec![50.0, 50.0], 2).is_ok());
        assert!(ModelForecast::new(vec![1.0], vec![50.0, 50.0], 2).is_err());
        assert!(ModelForecast::new(vec![1.0, 2.0], vec![50.0], 2).is_err());
    }

    #[test]
    fn test_model_forecast_saturates_values() {
        let forecast =
            ModelForecast::new(vec![f64::INFINITY, f64::NAN, 3.0], vec![50.0; 3], 3).unwrap();
        assert_eq!(forecast.values, vec![f64::MAX, 0.0, 3.0]);
    }

    #[test]
    fn test_fallback_shape() {
        let fallback = ModelForecast::fallback(&[4.0, 9.0], 3);
        assert_eq!(fallback.values, vec![9.0; 3]);
        assert_eq!(fallback.confidence, vec![FALLBACK_CONFIDENCE; 3]);
        assert!(fallback.fallback);
        assert!(fallback.details.is_none());

        let empty = ModelForecast::fallback(&[], 2);
        assert_eq!(empty.values, vec![0.0, 0.0]);
    }

    #[rstest]
    #[case(ModelKind::MovingAverage, 1)]
    #[case(ModelKind::SingleExponential, 1)]
    #[case(ModelKind::DoubleExponential, 2)]
    #[case(ModelKind::Linear, 2)]
    #[case(ModelKind::Pattern, 3)]
    #[case(ModelKind::Arima, 4)]
    #[case(ModelKind::Seasonal, 4)]
    fn test_minimums_trigger_fallback(#[case] kind: ModelKind, #[case] minimum: usize) {
        let config = EngineConfig::default();
        let short: Vec<f64> = (1..minimum).map(|i| i as f64 * 10.0).collect();

        let forecast = kind.run(&short, 4, &config).unwrap();
        assert!(forecast.fallback, "{:?} should fall back with {} points", kind, short.len());
        let expected = short.last().copied().unwrap_or(0.0);
        assert_eq!(forecast.values, vec![expected; 4]);
        assert_eq!(forecast.confidence, vec![FALLBACK_CONFIDENCE; 4]);

        let enough: Vec<f64> = (1..=minimum).map(|i| i as f64 * 10.0).collect();
        let forecast = kind.run(&enough, 4, &config).unwrap();
        assert!(!forecast.fallback, "{:?} should fit with {} points", kind, enough.len());
        assert_eq!(forecast.values.len(), 4);
        assert_eq!(forecast.confidence.len(), 4);
    }
}
