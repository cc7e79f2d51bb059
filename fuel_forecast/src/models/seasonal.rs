//! Seasonal decomposition model

use crate::error::Result;
use crate::models::{ensure_observations, ForecastModel, ModelDetails, ModelForecast, TrainedForecastModel};
use crate::utils::linear_decay;
use consumption_math::moving_averages::centered_moving_average;
use consumption_math::safe_div;
use consumption_math::statistics::coefficient_of_variation;
use serde::{Deserialize, Serialize};

/// Additive components of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

/// Split a series into trend (centered moving average), seasonal
/// (observation minus trend) and residual components.
pub fn decompose(series: &[f64], window: usize) -> Decomposition {
    let trend = centered_moving_average(series, window);
    let seasonal: Vec<f64> = series.iter().zip(trend.iter()).map(|(x, t)| x - t).collect();
    let residual = series
        .iter()
        .zip(trend.iter())
        .zip(seasonal.iter())
        .map(|((x, t), s)| x - t - s)
        .collect();

    Decomposition {
        trend,
        seasonal,
        residual,
    }
}

/// Seasonal decomposition forecaster
#[derive(Debug, Clone)]
pub struct SeasonalDecomposition {
    name: String,
    max_window: usize,
}

/// Trained seasonal decomposition
#[derive(Debug, Clone)]
pub struct TrainedSeasonalDecomposition {
    name: String,
    components: Decomposition,
    /// Per-period change of the trend between its first and last point
    trend_slope: f64,
    dispersion: f64,
}

impl Default for SeasonalDecomposition {
    fn default() -> Self {
        Self {
            name: "Seasonal Decomposition".to_string(),
            max_window: 3,
        }
    }
}

impl ForecastModel for SeasonalDecomposition {
    type Trained = TrainedSeasonalDecomposition;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        ensure_observations(&self.name, series, self.min_observations())?;

        let components = decompose(series, self.max_window.min(series.len()));
        let trend_slope = match (components.trend.first(), components.trend.last()) {
            (Some(first), Some(last)) => safe_div(last - first, (series.len() - 1) as f64),
            _ => 0.0,
        };

        Ok(TrainedSeasonalDecomposition {
            name: self.name.clone(),
            components,
            trend_slope,
            dispersion: coefficient_of_variation(series),
        })
    }

    fn min_observations(&self) -> usize {
        4
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedSeasonalDecomposition {
    pub fn components(&self) -> &Decomposition {
        &self.components
    }
}

impl TrainedForecastModel for TrainedSeasonalDecomposition {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let last_trend = self.components.trend.last().copied().unwrap_or(0.0);
        let seasonal = &self.components.seasonal;

        let values = (0..horizon)
            .map(|h| {
                let trend = last_trend + self.trend_slope * (h + 1) as f64;
                let season = if seasonal.is_empty() {
                    0.0
                } else {
                    seasonal[h % seasonal.len()]
                };
                (trend + season).max(0.0)
            })
            .collect();

        let base = (85.0 - 50.0 * self.dispersion).max(50.0);
        let confidence = linear_decay(base, 5.0, 35.0, horizon);

        Ok(ModelForecast::new(values, confidence, horizon)?.with_details(
            ModelDetails::SeasonalDecomposition {
                trend_slope: self.trend_slope,
                cycle_length: seasonal.len(),
            },
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
