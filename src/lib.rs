//! # Fleet Forecast
//!
//! `fleet_forecast` bundles the fuel consumption forecasting engine with the
//! numeric primitives it is built on.
//!
//! ## Example
//!
//! ```
//! use fleet_forecast::{forecast, Method};
//!
//! let result = forecast(&[10.0, 20.0, 30.0, 40.0], 2, Method::Linear).unwrap();
//! assert_eq!(result.values, vec![60.0, 70.0]);
//! ```

pub use consumption_math as math;
pub use fuel_forecast::*;

/// Run every method on the same history, in declaration order.
///
/// Methods whose request is rejected (for example a horizon above the
/// configured maximum) are reported individually.
///
/// # Examples
///
/// ```
/// use fleet_forecast::{compare_methods, ForecastEngine, Method};
///
/// let engine = ForecastEngine::default();
/// let results = compare_methods(&engine, &[100.0, 110.0, 120.0, 130.0], 3);
/// assert_eq!(results.len(), Method::ALL.len());
/// assert!(results.iter().all(|(_, result)| result.is_ok()));
/// ```
pub fn compare_methods(
    engine: &ForecastEngine,
    series: &[f64],
    horizon: usize,
) -> Vec<(Method, Result<ForecastResult>)> {
    Method::ALL
        .iter()
        .map(|method| (*method, engine.forecast(series, horizon, *method)))
        .collect()
}
