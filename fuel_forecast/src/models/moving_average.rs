//! Moving average model for consumption forecasting

use crate::error::Result;
use crate::models::{ensure_observations, ForecastModel, ModelDetails, ModelForecast, TrainedForecastModel};
use crate::utils::linear_decay;
use consumption_math::moving_averages::SimpleMovingAverage;
use consumption_math::statistics::coefficient_of_variation;

/// Simple moving average over the most recent months
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Name of the model
    name: String,
    /// Largest window used; shorter series use all their points
    max_window: usize,
}

/// Trained moving average model
#[derive(Debug, Clone)]
pub struct TrainedMovingAverage {
    name: String,
    window: usize,
    /// Average of the last `window` points
    average: f64,
    /// Coefficient of variation inside the window
    dispersion: f64,
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self {
            name: "Moving Average (window=3)".to_string(),
            max_window: 3,
        }
    }
}

impl ForecastModel for MovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        ensure_observations(&self.name, series, self.min_observations())?;

        let window = self.max_window.min(series.len());
        let mut sma = SimpleMovingAverage::new(window)?;
        for &value in series {
            sma.update(value);
        }
        let average = sma.value()?;
        let recent: Vec<f64> = sma.window().copied().collect();

        Ok(TrainedMovingAverage {
            name: self.name.clone(),
            window,
            average,
            dispersion: coefficient_of_variation(&recent),
        })
    }

    fn min_observations(&self) -> usize {
        1
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedMovingAverage {
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        // Flat forecast at the last average
        let values = vec![self.average; horizon];
        let base = (85.0 - 50.0 * self.dispersion).max(50.0);
        let confidence = linear_decay(base, 5.0, 40.0, horizon);

        Ok(ModelForecast::new(values, confidence, horizon)?
            .with_details(ModelDetails::MovingAverage { window: self.window }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_average_of_last_three() {
        let trained = MovingAverage::default().train(&[10.0, 20.0, 30.0]).unwrap();
        let forecast = trained.forecast(2).unwrap();
        assert_eq!(forecast.values, vec![20.0, 20.0]);
    }

    #[test]
    fn test_window_slides_over_long_series() {
        let trained = MovingAverage::default()
            .train(&[100.0, 1.0, 30.0, 40.0, 50.0])
            .unwrap();
        let forecast = trained.forecast(3).unwrap();
        assert_relative_eq!(forecast.values[0], 40.0);
        assert_eq!(forecast.details, Some(ModelDetails::MovingAverage { window: 3 }));
    }

    #[test]
    fn test_short_series_uses_every_point() {
        let trained = MovingAverage::default().train(&[8.0, 12.0]).unwrap();
        assert_eq!(trained.forecast(1).unwrap().values, vec![10.0]);
    }

    #[test]
    fn test_confidence_decays() {
        let trained = MovingAverage::default().train(&[50.0, 50.0, 50.0]).unwrap();
        let forecast = trained.forecast(3).unwrap();
        assert_eq!(forecast.confidence, vec![85.0, 80.0, 75.0]);
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(MovingAverage::default().train(&[]).is_err());
    }
}
