//! Exponential smoothing models for consumption forecasting

use crate::error::Result;
use crate::models::{ensure_observations, ForecastModel, ModelDetails, ModelForecast, TrainedForecastModel};
use crate::utils::linear_decay;
use consumption_math::smoothing::{DoubleExponentialSmoothing, ExponentialSmoothing as Smoother};

/// Simple exponential smoothing model
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    /// Name of the model
    name: String,
    /// Smoothing parameter
    alpha: f64,
}

/// Trained exponential smoothing model
#[derive(Debug, Clone)]
pub struct TrainedExponentialSmoothing {
    name: String,
    /// Final smoothed level
    level: f64,
}

impl ExponentialSmoothing {
    /// Create a new exponential smoothing model
    pub fn new(alpha: f64) -> Result<Self> {
        // Validates alpha
        Smoother::new(alpha)?;

        Ok(Self {
            name: format!("Exponential Smoothing (alpha={})", alpha),
            alpha,
        })
    }
}

impl ForecastModel for ExponentialSmoothing {
    type Trained = TrainedExponentialSmoothing;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        ensure_observations(&self.name, series, self.min_observations())?;

        let level = Smoother::new(self.alpha)?.fit(series).level()?;

        Ok(TrainedExponentialSmoothing {
            name: self.name.clone(),
            level,
        })
    }

    fn min_observations(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedExponentialSmoothing {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        // In simple exponential smoothing, the forecast is constant at the last level
        let values = vec![self.level.max(0.0); horizon];
        let confidence = linear_decay(75.0, 5.0, 40.0, horizon);

        Ok(ModelForecast::new(values, confidence, horizon)?.with_details(
            ModelDetails::ExponentialSmoothing {
                level: self.level,
                trend: None,
            },
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Trend-adjusted exponential smoothing (Holt's method)
#[derive(Debug, Clone)]
pub struct HoltSmoothing {
    name: String,
    alpha: f64,
    beta: f64,
}

/// Trained Holt model
#[derive(Debug, Clone)]
pub struct TrainedHoltSmoothing {
    name: String,
    smoother: DoubleExponentialSmoothing,
}

impl HoltSmoothing {
    /// Create a new Holt model with level factor `alpha` and trend factor `beta`
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        DoubleExponentialSmoothing::new(alpha, beta)?;

        Ok(Self {
            name: format!("Double Exponential Smoothing (alpha={}, beta={})", alpha, beta),
            alpha,
            beta,
        })
    }
}

impl ForecastModel for HoltSmoothing {
    type Trained = TrainedHoltSmoothing;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        ensure_observations(&self.name, series, self.min_observations())?;

        Ok(TrainedHoltSmoothing {
            name: self.name.clone(),
            smoother: DoubleExponentialSmoothing::new(self.alpha, self.beta)?.fit(series),
        })
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedHoltSmoothing {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let values = (1..=horizon)
            .map(|h| self.smoother.forecast(h).map(|v| v.max(0.0)))
            .collect::<consumption_math::Result<Vec<f64>>>()?;
        let confidence = linear_decay(80.0, 5.0, 35.0, horizon);
        let (level, trend) = self.smoother.components()?;

        Ok(ModelForecast::new(values, confidence, horizon)?.with_details(
            ModelDetails::ExponentialSmoothing {
                level,
                trend: Some(trend),
            },
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
