//! # Fuel Forecast
//!
//! Monthly fuel consumption forecasting for fleet dashboards.
//!
//! ## Features
//!
//! - Cleaning of raw monthly series (non-positive readings are dropped)
//! - Monthly aggregation of dated consumption records, including CSV input
//! - Forecasting models: moving average, exponential smoothing (single and
//!   Holt), linear regression, AR(1)+MA(1), pattern weighting and seasonal
//!   decomposition
//! - An ensemble combining four models with agreement scoring
//! - Holdout accuracy, trend and seasonality labels, advisory flags
//!
//! Models that lack history never fail: they return the last observation
//! repeated at 50% confidence and flag the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use fuel_forecast::{ForecastEngine, Method};
//!
//! let engine = ForecastEngine::default();
//! let history = [1200.0, 1250.0, 1190.0, 1300.0, 1280.0, 1350.0];
//!
//! let result = engine.forecast(&history, 3, Method::Linear)?;
//! assert_eq!(result.values.len(), 3);
//! assert_eq!(result.confidence.len(), 3);
//! # Ok::<(), fuel_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recommendations;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{EngineConfig, EnsembleWeighting, ExponentialVariant, Perturbation};
pub use crate::data::{clean_series, ConsumptionRecord, MonthlySeries};
pub use crate::engine::{forecast, ForecastEngine, ForecastMetadata, ForecastRequest, ForecastResult, Method};
pub use crate::error::{ForecastError, Result};
pub use crate::metrics::{AccuracyReport, Reliability};
pub use crate::models::{ForecastModel, ModelForecast, TrainedForecastModel};
pub use crate::recommendations::Recommendation;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
