//! Utility functions for the fuel_forecast crate

/// Split a series into a training head and a validation tail.
///
/// The tail holds `ceil(len * ratio)` points, at least one. A series with a
/// single point yields an empty head.
pub fn holdout_split(data: &[f64], ratio: f64) -> (&[f64], &[f64]) {
    if data.is_empty() {
        return (data, data);
    }

    let tail = ((data.len() as f64 * ratio).ceil() as usize).clamp(1, data.len());
    data.split_at(data.len() - tail)
}

/// Clamp a confidence percentage into `[0, 100]`
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Confidence that starts at `base` and loses `step` points per horizon step,
/// never dropping below `floor`.
pub fn linear_decay(base: f64, step: f64, floor: f64, horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|h| clamp_percent((base - step * h as f64).max(floor)))
        .collect()
}

/// Confidence that starts at `base` and is multiplied by `factor` per horizon
/// step, never dropping below `floor`.
pub fn geometric_decay(base: f64, factor: f64, floor: f64, horizon: usize) -> Vec<f64> {
    (0..horizon)
        .map(|h| clamp_percent((base * factor.powi(h as i32)).max(floor)))
        .collect()
}
