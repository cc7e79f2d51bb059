//! Pattern-weighted forecaster
//!
//! Short overlapping windows of the history act as patterns. Each window
//! proposes the growth ratio of its last step, and the proposals are blended
//! with weights favouring recent and stable windows. Every generated month is
//! appended to the working series, so later steps see earlier forecasts.

use crate::error::Result;
use crate::models::{ensure_observations, ForecastModel, ModelDetails, ModelForecast, TrainedForecastModel};
use crate::utils::geometric_decay;
use consumption_math::{safe_div, saturate};
use consumption_math::statistics::{coefficient_of_variation, pattern_windows};

const RECENCY_SHARE: f64 = 0.7;
const STABILITY_SHARE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 90.0;
const CONFIDENCE_DECAY: f64 = 0.9;

/// Pattern-weighted ("neural") model
#[derive(Debug, Clone)]
pub struct PatternModel {
    name: String,
    max_window: usize,
}

/// Trained pattern model
#[derive(Debug, Clone)]
pub struct TrainedPatternModel {
    name: String,
    window: usize,
    history: Vec<f64>,
    /// Mean pattern weight over the history, drives confidence
    average_weight: f64,
}

impl Default for PatternModel {
    fn default() -> Self {
        Self {
            name: "Pattern Weighted Network".to_string(),
            max_window: 3,
        }
    }
}

/// Weight of each window: a linear recency ramp blended with stability.
fn window_weights(windows: &[&[f64]]) -> Vec<f64> {
    let count = windows.len() as f64;
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let recency = (i + 1) as f64 / count;
            let cv = coefficient_of_variation(window);
            let stability = 1.0 / (1.0 + cv * cv);
            RECENCY_SHARE * recency + STABILITY_SHARE * stability
        })
        .collect()
}

/// Growth of the last step inside a window; flat when the base is empty
fn growth_ratio(window: &[f64]) -> f64 {
    match window {
        [.., previous, last] if *previous > 0.0 => last / previous,
        _ => 1.0,
    }
}

/// Next value for a working series: weighted blend of every window's growth
/// applied to the latest value. Runaway growth saturates at `f64::MAX`.
fn next_value(working: &[f64], window: usize) -> f64 {
    let last = working.last().copied().unwrap_or(0.0);
    let windows = pattern_windows(working, window);
    let weights = window_weights(&windows);

    let weighted: f64 = windows
        .iter()
        .zip(weights.iter())
        .map(|(w, weight)| weight * growth_ratio(w))
        .sum();
    let total: f64 = weights.iter().sum();

    if total > 0.0 {
        let growth = safe_div(saturate(weighted), total);
        saturate(last * growth).max(0.0)
    } else {
        last
    }
}

impl ForecastModel for PatternModel {
    type Trained = TrainedPatternModel;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        ensure_observations(&self.name, series, self.min_observations())?;

        let window = self.max_window.min(series.len() - 1);
        let windows = pattern_windows(series, window);
        let weights = window_weights(&windows);
        let average_weight = safe_div(weights.iter().sum(), weights.len() as f64);

        Ok(TrainedPatternModel {
            name: self.name.clone(),
            window,
            history: series.to_vec(),
            average_weight,
        })
    }

    fn min_observations(&self) -> usize {
        3
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedPatternModel {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let (_, values) = (0..horizon).fold(
            (self.history.clone(), Vec::with_capacity(horizon)),
            |(mut working, mut values), _| {
                let next = next_value(&working, self.window);
                working.push(next);
                values.push(next);
                (working, values)
            },
        );

        let base = (50.0 + 50.0 * self.average_weight).min(MAX_CONFIDENCE);
        let confidence = geometric_decay(base, CONFIDENCE_DECAY, 30.0, horizon);

        Ok(ModelForecast::new(values, confidence, horizon)?.with_details(
            ModelDetails::PatternWeighted {
                window: self.window,
                average_weight: self.average_weight,
            },
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
