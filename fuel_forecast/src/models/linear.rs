//! Linear trend model fitted by ordinary least squares

use crate::error::Result;
use crate::models::{ensure_observations, ForecastModel, ModelDetails, ModelForecast, TrainedForecastModel};
use crate::utils::linear_decay;
use consumption_math::regression::LinearFit;

/// Straight-line extrapolation of consumption against month index
#[derive(Debug, Clone)]
pub struct LinearTrend {
    name: String,
}

/// Trained linear trend
#[derive(Debug, Clone)]
pub struct TrainedLinearTrend {
    name: String,
    fit: LinearFit,
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self {
            name: "Linear Regression".to_string(),
        }
    }
}

impl ForecastModel for LinearTrend {
    type Trained = TrainedLinearTrend;

    fn train(&self, series: &[f64]) -> Result<Self::Trained> {
        ensure_observations(&self.name, series, self.min_observations())?;

        Ok(TrainedLinearTrend {
            name: self.name.clone(),
            fit: LinearFit::fit(series),
        })
    }

    fn min_observations(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearTrend {
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }
}

impl TrainedForecastModel for TrainedLinearTrend {
    /// Step `h` (starting at 1) is evaluated at index `n + h`, floored at
    /// zero and rounded to whole units.
    fn forecast(&self, horizon: usize) -> Result<ModelForecast> {
        let n = self.fit.observations;
        let values = (1..=horizon)
            .map(|h| self.fit.value_at((n + h) as f64).max(0.0).round())
            .collect();
        let confidence = linear_decay(50.0 + 40.0 * self.fit.r_squared, 5.0, 30.0, horizon);

        Ok(ModelForecast::new(values, confidence, horizon)?.with_details(
            ModelDetails::LinearRegression {
                slope: self.fit.slope,
                intercept: self.fit.intercept,
                r_squared: self.fit.r_squared,
            },
        ))
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
    fn test_perfect_line() {
        let trained = LinearTrend::default()
            .train(&[10.0, 20.0, 30.0, 40.0])
            .unwrap();
        let forecast = trained.forecast(2).unwrap();

        assert_eq!(forecast.values, vec![60.0, 70.0]);
        assert_relative_eq!(trained.fit().r_squared, 1.0, epsilon = 1e-9);
        assert_relative_eq!(forecast.confidence[0], 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_falling_line_floors_at_zero() {
        let trained = LinearTrend::default().train(&[30.0, 20.0, 10.0]).unwrap();
        let forecast = trained.forecast(4).unwrap();
        assert_eq!(forecast.values, vec![0.0; 4]);
    }

    #[test]
    fn test_values_are_rounded() {
        let trained = LinearTrend::default().train(&[10.0, 10.5]).unwrap();
        let forecast = trained.forecast(1).unwrap();
        // 0.5 * 3 + 10 = 11.5 -> 12
        assert_eq!(forecast.values, vec![12.0]);
    }
}
