//! ARIMA-like model for consumption forecasting
//!
//! A deliberately small member of the ARIMA family: one level of
//! differencing, a single autoregressive coefficient applied to the mean of
//! the most recent deltas, and a moving-average term scaled from the
//! in-sample residuals.

use crate::config::Perturbation;
use crate::error::Result;
use crate::models::{ensure_observations, ForecastModel, ModelDetails, ModelForecast, TrainedForecastModel};
use crate::utils::linear_decay;
use consumption_math::{safe_div, saturate};
use consumption_math::statistics::{differences, mean, variance};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest share of a predicted value the moving-average term may move it
const MAX_PERTURBATION: f64 = 0.05;

/// Scale applied to the mean absolute residual to obtain the MA coefficient
const MA_SCALE: f64 = 0.01;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    perturbation: Perturbation,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    /// AR coefficient on the recent delta
    phi: f64,
    /// MA coefficient
    theta: f64,
    /// Number of recent deltas averaged per step
    order: usize,
    /// Historical data
    history: Vec<f64>,
    /// First differences of the history
    deltas: Vec<f64>,
    /// Last in-sample AR residual
    last_residual: f64,
    perturbation: Perturbation,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(perturbation: Perturbation) -> Self {
        Self {
            name: "ARIMA(p,1,1)".to_string(),
            perturbation,
        }
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(Perturbation::Deterministic)
    }
}

/// Least-squares fit of `d[t]` against `d[t - 1]`, clamped to keep the
/// recursion stable. The deltas are normalised first; the ratio does not
/// depend on their scale and the products would otherwise overflow.
fn autoregressive_coefficient(deltas: &[f64]) -> f64 {
    let scale = deltas.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return 0.0;
    }
    let (numerator, denominator) = deltas
        .windows(2)
        .map(|w| (w[0] / scale, w[1] / scale))
        .fold((0.0, 0.0), |(num, den), (prev, next)| (num + next * prev, den + prev * prev));
    safe_div(numerator, denominator).clamp(-1.0, 1.0)
}

fn ar_residuals(deltas: &[f64], phi: f64) -> Vec<f64> {
    deltas.windows(2).map(|w| w[1] - phi * w[0]).collect()
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, series: &[f64]) -> Result<TrainedArimaModel> {
        ensure_observations(&self.name, series, self.min_observations())?;

        let deltas = differences(series);
        let order = 2usize.min(deltas.len() - 1);
        let phi = autoregressive_coefficient(&deltas);

        let residuals = ar_residuals(&deltas, phi);
        let abs_residuals: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
        let theta = mean(&abs_residuals) * MA_SCALE;

        Ok(TrainedArimaModel {
            name: format!("ARIMA({},1,1)", order),
            phi,
            theta,
            order,
            history: series.to_vec(),
            deltas,
            last_residual: residuals.last().copied().unwrap_or(0.0),
            perturbation: self.perturbation,
        })
    }

    fn min_observations(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Base confidence shrinks with the variance-to-mean ratio of the history
    fn base_confidence(&self) -> f64 {
        let dispersion = safe_div(variance(&self.history), mean(&self.history));
        (90.0 - dispersion * 100.0).max(50.0)
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let mut rng = match self.perturbation {
            Perturbation::Seeded { seed } => Some(StdRng::seed_from_u64(seed)),
            Perturbation::Deterministic => None,
        };

        let mut working = self.history.clone();
        let mut deltas = self.deltas.clone();
        let mut values = Vec::with_capacity(horizon);

        for step in 0..horizon {
            let last = working.last().copied().unwrap_or(0.0);
            let recent = mean(&deltas[deltas.len().saturating_sub(self.order)..]);
            let predicted = last + self.phi * recent;

            let shock = match rng.as_mut() {
                Some(rng) => rng.gen_range(-1.0..=1.0),
                // Future residuals have zero expectation; only the last known one carries over
                None if step == 0 && self.last_residual != 0.0 => self.last_residual.signum(),
                None => 0.0,
            };
            let bound = MAX_PERTURBATION * predicted.abs();
            let ma_term = (self.theta * shock).clamp(-bound, bound);

            let value = saturate(predicted + ma_term).max(0.0);
            deltas.push(value - last);
            working.push(value);
            values.push(value);
        }

        let confidence = linear_decay(self.base_confidence(), 10.0, 30.0, horizon);

        Ok(ModelForecast::new(values, confidence, horizon)?.with_details(ModelDetails::Arima {
            ar_coefficient: self.phi,
            ma_coefficient: self.theta,
            order: self.order,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
