//! Structured advisory flags derived from a forecast
//!
//! Flags carry no text; the dashboard maps each one to its own message.

use consumption_math::statistics::{mean, variance};
use serde::{Deserialize, Serialize};

/// Ratio of forecast mean to historical mean beyond which consumption is
/// flagged as rising (or, inverted, falling)
const CHANGE_THRESHOLD: f64 = 0.2;

/// Advisory flag attached to a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Forecast mean more than 20% above the historical mean
    RisingConsumption,
    /// Forecast mean more than 20% below the historical mean
    FallingConsumption,
    /// Forecast varies more than the history did
    HighVariability,
    ConsistentWithHistory,
    /// Too few months to run the requested method
    InsufficientHistory,
    /// Ensemble members disagree on the values
    LowMethodAgreement,
    /// Ensemble members disagree on the direction
    InconsistentMethodTrends,
}

/// Compare a forecast against the history it was produced from.
///
/// Always returns at least one flag.
pub fn generate(history: &[f64], forecast: &[f64]) -> Vec<Recommendation> {
    let mut flags = Vec::new();

    let historical_mean = mean(history);
    let forecast_mean = mean(forecast);

    if forecast_mean > historical_mean * (1.0 + CHANGE_THRESHOLD) {
        flags.push(Recommendation::RisingConsumption);
    } else if forecast_mean < historical_mean * (1.0 - CHANGE_THRESHOLD) {
        flags.push(Recommendation::FallingConsumption);
    }

    if variance(forecast) > variance(history) {
        flags.push(Recommendation::HighVariability);
    }

    if flags.is_empty() {
        flags.push(Recommendation::ConsistentWithHistory);
    }

    flags
}
