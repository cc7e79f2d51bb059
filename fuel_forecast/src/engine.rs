//! Forecast engine: method dispatch and result assembly

use crate::config::EngineConfig;
use crate::data::clean_series;
use crate::ensemble::{self, EnsembleSummary};
use crate::error::{ForecastError, Result};
use crate::metrics::{estimate_accuracy, AccuracyReport};
use crate::models::{ModelDetails, ModelForecast, ModelKind};
use crate::recommendations::{self, Recommendation};
use consumption_math::saturate;
use consumption_math::statistics::{seasonality, trend, Seasonality, Trend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info_span};

/// Forecasting method requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "moving_average", alias = "moving-average")]
    MovingAverage,
    #[serde(rename = "exponential")]
    Exponential,
    #[serde(rename = "linear")]
    Linear,
    #[serde(rename = "arima")]
    Arima,
    #[serde(rename = "neural-network", alias = "neural_network", alias = "neural")]
    Neural,
    #[serde(rename = "seasonal")]
    Seasonal,
    #[serde(rename = "ml-ensemble", alias = "ml_ensemble", alias = "ensemble")]
    Ensemble,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::MovingAverage,
        Method::Exponential,
        Method::Linear,
        Method::Arima,
        Method::Neural,
        Method::Seasonal,
        Method::Ensemble,
    ];

    /// Canonical method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::MovingAverage => "moving_average",
            Method::Exponential => "exponential",
            Method::Linear => "linear",
            Method::Arima => "arima",
            Method::Neural => "neural-network",
            Method::Seasonal => "seasonal",
            Method::Ensemble => "ml-ensemble",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "moving_average" => Ok(Method::MovingAverage),
            "exponential" => Ok(Method::Exponential),
            "linear" => Ok(Method::Linear),
            "arima" => Ok(Method::Arima),
            "neural_network" | "neural" => Ok(Method::Neural),
            "seasonal" => Ok(Method::Seasonal),
            "ml_ensemble" | "ensemble" => Ok(Method::Ensemble),
            _ => Err(ForecastError::UnknownMethod(s.to_string())),
        }
    }
}

/// Method and horizon as received from the API layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub method: Method,
    pub horizon: usize,
}

/// Descriptive information about a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetadata {
    pub method: Method,
    /// Number of cleaned observations the forecast was built from
    pub data_points: usize,
    pub seasonality: Seasonality,
    pub trend: Trend,
    pub recommendations: Vec<Recommendation>,
    /// Fitted parameters of single-model forecasts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDetails>,
    /// Member breakdown of ensemble forecasts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ensemble: Option<EnsembleSummary>,
}

/// Complete forecast returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Forecasted values, one per horizon step, never negative
    pub values: Vec<f64>,
    /// Confidence percentage per horizon step
    pub confidence: Vec<f64>,
    /// Accuracy of the history's holdout backtest, when there is enough history
    pub accuracy: Option<AccuracyReport>,
    pub metadata: ForecastMetadata,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Whether the method lacked history and produced the degenerate forecast
    pub fn is_fallback(&self) -> bool {
        self.metadata
            .recommendations
            .contains(&Recommendation::InsufficientHistory)
    }

    /// Serialize the result for the API layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Stateless forecasting engine; safe to share between threads
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
}

impl ForecastEngine {
    /// Create an engine after validating `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute a request received from the API layer
    pub fn run(&self, series: &[f64], request: &ForecastRequest) -> Result<ForecastResult> {
        self.forecast(series, request.horizon, request.method)
    }

    /// Forecast `horizon` months of `series` with `method`.
    ///
    /// Non-positive observations are discarded first. Insufficient history
    /// never fails; it yields a fallback forecast instead. Only a horizon of
    /// zero or above the configured maximum is rejected.
    pub fn forecast(&self, series: &[f64], horizon: usize, method: Method) -> Result<ForecastResult> {
        self.check_horizon(horizon)?;

        let span = info_span!("forecast", %method, horizon);
        let _guard = span.enter();

        let cleaned = clean_series(series);
        debug!(raw = series.len(), cleaned = cleaned.len(), "series prepared");

        let accuracy = estimate_accuracy(&cleaned, self.config.holdout_ratio);

        let result = match self.model_kind(method) {
            None => self.forecast_ensemble(&cleaned, horizon, accuracy)?,
            Some(kind) => {
                let forecast = kind.run(&cleaned, horizon, &self.config)?;
                if forecast.fallback {
                    fallback_result(method, &cleaned, forecast, accuracy)
                } else {
                    let recommendations = recommendations::generate(&cleaned, &forecast.values);
                    assemble(
                        method,
                        &cleaned,
                        forecast.values,
                        forecast.confidence,
                        accuracy,
                        recommendations,
                        forecast.details,
                        None,
                    )
                }
            }
        };

        debug!(
            trend = ?result.metadata.trend,
            seasonality = ?result.metadata.seasonality,
            recommendations = ?result.metadata.recommendations,
            "forecast complete"
        );
        Ok(result)
    }

    fn check_horizon(&self, horizon: usize) -> Result<()> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be positive".to_string(),
            ));
        }
        if horizon > self.config.max_horizon {
            return Err(ForecastError::InvalidParameter(format!(
                "Horizon {} exceeds the maximum of {}",
                horizon, self.config.max_horizon
            )));
        }
        Ok(())
    }

    /// Single model backing `method`; `None` for the ensemble
    fn model_kind(&self, method: Method) -> Option<ModelKind> {
        match method {
            Method::MovingAverage => Some(ModelKind::MovingAverage),
            Method::Exponential => Some(ModelKind::exponential(self.config.exponential_variant)),
            Method::Linear => Some(ModelKind::Linear),
            Method::Arima => Some(ModelKind::Arima),
            Method::Neural => Some(ModelKind::Pattern),
            Method::Seasonal => Some(ModelKind::Seasonal),
            Method::Ensemble => None,
        }
    }

    fn forecast_ensemble(
        &self,
        cleaned: &[f64],
        horizon: usize,
        accuracy: Option<AccuracyReport>,
    ) -> Result<ForecastResult> {
        if cleaned.len() < ensemble::MIN_OBSERVATIONS {
            return Ok(fallback_result(
                Method::Ensemble,
                cleaned,
                ModelForecast::fallback(cleaned, horizon),
                accuracy,
            ));
        }

        let combined = ensemble::combine(cleaned, horizon, &self.config)?;
        let mut flags = recommendations::generate(cleaned, &combined.values);
        flags.extend(combined.flags);

        Ok(assemble(
            Method::Ensemble,
            cleaned,
            combined.values,
            combined.confidence,
            accuracy,
            flags,
            None,
            Some(combined.summary),
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn assemble(
    method: Method,
    cleaned: &[f64],
    values: Vec<f64>,
    confidence: Vec<f64>,
    accuracy: Option<AccuracyReport>,
    recommendations: Vec<Recommendation>,
    model: Option<ModelDetails>,
    ensemble: Option<EnsembleSummary>,
) -> ForecastResult {
    ForecastResult {
        values: values.into_iter().map(|v| saturate(v).max(0.0)).collect(),
        confidence,
        accuracy,
        metadata: ForecastMetadata {
            method,
            data_points: cleaned.len(),
            seasonality: seasonality(cleaned),
            trend: trend(cleaned),
            recommendations,
            model,
            ensemble,
        },
    }
}

fn fallback_result(
    method: Method,
    cleaned: &[f64],
    fallback: ModelForecast,
    accuracy: Option<AccuracyReport>,
) -> ForecastResult {
    ForecastResult {
        values: fallback.values,
        confidence: fallback.confidence,
        accuracy,
        metadata: ForecastMetadata {
            method,
            data_points: cleaned.len(),
            seasonality: Seasonality::InsufficientData,
            trend: Trend::Volatile,
            recommendations: vec![Recommendation::InsufficientHistory],
            model: None,
            ensemble: None,
        },
    }
}

/// Forecast with a default-configured engine
pub fn forecast(series: &[f64], horizon: usize, method: Method) -> Result<ForecastResult> {
    ForecastEngine::default().forecast(series, horizon, method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("moving_average", Method::MovingAverage)]
    #[case("moving-average", Method::MovingAverage)]
    #[case("exponential", Method::Exponential)]
    #[case("linear", Method::Linear)]
    #[case("ARIMA", Method::Arima)]
    #[case("neural-network", Method::Neural)]
    #[case("seasonal", Method::Seasonal)]
    #[case("ml-ensemble", Method::Ensemble)]
    fn test_method_parsing(#[case] name: &str, #[case] expected: Method) {
        assert_eq!(name.parse::<Method>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_method() {
        assert!(matches!(
            "prophet".parse::<Method>(),
            Err(ForecastError::UnknownMethod(name)) if name == "prophet"
        ));
    }

    #[test]
    fn test_method_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_request_deserializes_canonical_names() {
        let request: ForecastRequest =
            serde_json::from_str(r#"{ "method": "neural-network", "horizon": 6 }"#).unwrap();
        assert_eq!(request.method, Method::Neural);
        assert_eq!(request.horizon, 6);
    }

    #[test]
    fn test_only_single_methods_map_to_a_model() {
        let engine = ForecastEngine::default();
        assert_eq!(engine.model_kind(Method::Ensemble), None);
        assert_eq!(engine.model_kind(Method::Neural), Some(ModelKind::Pattern));
        assert_eq!(
            engine.model_kind(Method::Exponential),
            Some(ModelKind::SingleExponential)
        );
    }

    #[test]
    fn test_ensemble_fallback_matches_shared_policy() {
        let result = forecast(&[0.0, 42.0], 3, Method::Ensemble).unwrap();
        let expected = ModelForecast::fallback(&[42.0], 3);
        assert_eq!(result.values, expected.values);
        assert_eq!(result.confidence, expected.confidence);
        assert!(result.metadata.ensemble.is_none());
        assert!(result.is_fallback());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let engine = ForecastEngine::default();
        assert!(matches!(
            engine.forecast(&[10.0, 20.0], 0, Method::Linear),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_horizon_above_maximum_rejected() {
        let engine = ForecastEngine::new(EngineConfig {
            max_horizon: 12,
            ..EngineConfig::default()
        })
        .unwrap();
        assert!(engine.forecast(&[10.0, 20.0], 12, Method::Linear).is_ok());
        assert!(engine.forecast(&[10.0, 20.0], 13, Method::Linear).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            alpha: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            ForecastEngine::new(config),
            Err(ForecastError::ConfigError(_))
        ));
    }

    #[test]
    fn test_fallback_metadata() {
        let result = forecast(&[0.0, 25.0, -3.0], 3, Method::Arima).unwrap();
        assert_eq!(result.values, vec![25.0; 3]);
        assert_eq!(result.confidence, vec![50.0; 3]);
        assert_eq!(result.metadata.trend, Trend::Volatile);
        assert_eq!(result.metadata.seasonality, Seasonality::InsufficientData);
        assert_eq!(
            result.metadata.recommendations,
            vec![Recommendation::InsufficientHistory]
        );
        assert_eq!(result.metadata.data_points, 1);
        assert!(result.accuracy.is_none());
        assert!(result.is_fallback());
    }

    #[test]
    fn test_linear_metadata_reports_fit() {
        let result = forecast(&[10.0, 20.0, 30.0, 40.0], 2, Method::Linear).unwrap();
        assert_eq!(result.values, vec![60.0, 70.0]);
        assert_eq!(result.metadata.trend, Trend::Increasing);
        match result.metadata.model {
            Some(ModelDetails::LinearRegression { slope, r_squared, .. }) => {
                assert!((slope - 10.0).abs() < 1e-9);
                assert!((r_squared - 1.0).abs() < 1e-9);
            }
            other => panic!("unexpected model details: {:?}", other),
        }
    }

    #[test]
    fn test_result_json_uses_camel_case() {
        let result = forecast(&[10.0, 20.0, 30.0], 2, Method::MovingAverage).unwrap();
        let json = result.to_json().unwrap();
        assert!(json.contains("\"dataPoints\":3"));
        assert!(json.contains("\"method\":\"moving_average\""));
        assert!(json.contains("\"meanAbsolutePercentError\""));
    }
}
