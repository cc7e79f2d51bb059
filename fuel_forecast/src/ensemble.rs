//! Ensemble of forecasting models
//!
//! Runs the ARIMA, pattern, Holt and seasonal models side by side, blends
//! their per-step values and confidences, and measures how far they agree.

use crate::config::{EngineConfig, EnsembleWeighting};
use crate::error::Result;
use crate::metrics::forecast_accuracy;
use crate::models::{ModelForecast, ModelKind};
use crate::recommendations::Recommendation;
use crate::utils::{clamp_percent, holdout_split};
use consumption_math::{safe_div, saturate};
use consumption_math::statistics::{coefficient_of_variation, mean, trend, Trend};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Models combined by the ensemble
pub const ENSEMBLE_MEMBERS: [ModelKind; 4] = [
    ModelKind::Arima,
    ModelKind::Pattern,
    ModelKind::DoubleExponential,
    ModelKind::Seasonal,
];

/// Fewest cleaned points the ensemble runs on
pub const MIN_OBSERVATIONS: usize = 2;

/// Agreement below this score is flagged
pub const AGREEMENT_THRESHOLD: f64 = 0.8;

/// MAPE assumed for a member whose backtest cannot be scored
const UNSCORED_MAPE: f64 = 100.0;

/// One member's contribution to the ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentForecast {
    pub model: ModelKind,
    pub values: Vec<f64>,
    pub confidence: Vec<f64>,
    /// Normalised weight, all weights sum to 1
    pub weight: f64,
    /// Direction of the history extended by this member's forecast
    pub trend: Trend,
    pub fallback: bool,
}

/// Per-member breakdown reported with an ensemble forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleSummary {
    /// 1 when every member predicts the same values, falling towards 0
    pub agreement: f64,
    pub components: Vec<ComponentForecast>,
}

/// Combined ensemble output
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleForecast {
    pub values: Vec<f64>,
    pub confidence: Vec<f64>,
    pub summary: EnsembleSummary,
    /// Advisory flags raised by member disagreement
    pub flags: Vec<Recommendation>,
}

/// Agreement between predictions: one minus the mean, over horizon steps,
/// of the coefficient of variation across methods, floored at zero.
pub fn method_agreement(predictions: &[Vec<f64>]) -> f64 {
    let steps = predictions.iter().map(Vec::len).max().unwrap_or(0);
    if steps == 0 {
        return 1.0;
    }

    let variations: Vec<f64> = (0..steps)
        .map(|step| {
            let at_step: Vec<f64> = predictions
                .iter()
                .filter_map(|p| p.get(step).copied())
                .collect();
            coefficient_of_variation(&at_step)
        })
        .collect();

    (1.0 - mean(&variations)).clamp(0.0, 1.0)
}

/// Weighted per-step average, skipping members without a value at a step.
///
/// Accumulated as a running mean so members near `f64::MAX` cannot overflow
/// a sum.
fn weighted_blend(series: &[&[f64]], weights: &[f64], horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|step| {
            let (blended, _) = series
                .iter()
                .zip(weights.iter())
                .filter_map(|(s, w)| s.get(step).map(|v| (*v, *w)))
                .fold((0.0, 0.0), |(blended, total), (v, w)| {
                    let total = total + w;
                    (blended + safe_div(w, total) * (v - blended), total)
                });
            saturate(blended)
        })
        .collect()
}

fn equal_weights(count: usize) -> Vec<f64> {
    vec![safe_div(1.0, count as f64); count]
}

/// Weights from each member's error on the held-out tail of the history
fn accuracy_weights(cleaned: &[f64], config: &EngineConfig) -> Result<Vec<f64>> {
    let (train, validation) = holdout_split(cleaned, config.holdout_ratio);
    if train.is_empty() || validation.is_empty() {
        return Ok(equal_weights(ENSEMBLE_MEMBERS.len()));
    }

    let mut raw = Vec::with_capacity(ENSEMBLE_MEMBERS.len());
    for kind in ENSEMBLE_MEMBERS {
        let backtest = kind.run(train, validation.len(), config)?;
        let mape = forecast_accuracy(&backtest.values, validation)
            .map(|report| report.mean_absolute_percent_error)
            .unwrap_or(UNSCORED_MAPE);
        raw.push(1.0 / (1.0 + mape / 100.0));
    }

    let total: f64 = raw.iter().sum();
    Ok(raw.iter().map(|w| safe_div(*w, total)).collect())
}

/// Run every ensemble member on a cleaned series and blend the results.
///
/// Callers are expected to route series shorter than [`MIN_OBSERVATIONS`]
/// to the fallback forecast; members that individually lack data fall back
/// on their own.
pub fn combine(cleaned: &[f64], horizon: usize, config: &EngineConfig) -> Result<EnsembleForecast> {
    let forecasts = ENSEMBLE_MEMBERS
        .iter()
        .map(|kind| kind.run(cleaned, horizon, config))
        .collect::<Result<Vec<ModelForecast>>>()?;

    let weights = match config.ensemble_weighting {
        EnsembleWeighting::Equal => equal_weights(forecasts.len()),
        EnsembleWeighting::Accuracy => accuracy_weights(cleaned, config)?,
    };

    let value_series: Vec<&[f64]> = forecasts.iter().map(|f| f.values.as_slice()).collect();
    let confidence_series: Vec<&[f64]> = forecasts.iter().map(|f| f.confidence.as_slice()).collect();

    let values = weighted_blend(&value_series, &weights, horizon)
        .into_iter()
        .map(|v| v.max(0.0))
        .collect();
    let confidence = weighted_blend(&confidence_series, &weights, horizon)
        .into_iter()
        .map(clamp_percent)
        .collect();

    let predictions: Vec<Vec<f64>> = forecasts.iter().map(|f| f.values.clone()).collect();
    let agreement = method_agreement(&predictions);

    let components: Vec<ComponentForecast> = ENSEMBLE_MEMBERS
        .iter()
        .zip(forecasts)
        .zip(weights.iter())
        .map(|((kind, forecast), weight)| {
            let extended: Vec<f64> = cleaned.iter().chain(forecast.values.iter()).copied().collect();
            ComponentForecast {
                model: *kind,
                trend: trend(&extended),
                values: forecast.values,
                confidence: forecast.confidence,
                weight: *weight,
                fallback: forecast.fallback,
            }
        })
        .collect();

    let mut flags = Vec::new();
    if agreement < AGREEMENT_THRESHOLD {
        flags.push(Recommendation::LowMethodAgreement);
    }
    if components.windows(2).any(|pair| pair[0].trend != pair[1].trend) {
        flags.push(Recommendation::InconsistentMethodTrends);
    }

    debug!(agreement, weighting = ?config.ensemble_weighting, ?flags, "ensemble combined");

    Ok(EnsembleForecast {
        values,
        confidence,
        summary: EnsembleSummary {
            agreement,
            components,
        },
        flags,
    })
}
