//! Consumption data preparation
//!
//! Raw transactional records are bucketed into calendar months and the
//! resulting series is cleaned before any forecaster sees it.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Keep the strictly positive, finite observations in their original order.
///
/// Zero, negative and NaN entries stand for months without usable data.
pub fn clean_series(raw: &[f64]) -> Vec<f64> {
    raw.iter()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .collect()
}

/// A single dated consumption entry, e.g. one refuelling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub quantity: f64,
}

impl ConsumptionRecord {
    pub fn new(date: NaiveDate, quantity: f64) -> Self {
        Self { date, quantity }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    quantity: f64,
}

/// Consumption totals per calendar month, in chronological order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    /// First day of each month
    months: Vec<NaiveDate>,
    /// Total quantity consumed in the matching month
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Sum records per month. Months between the first and last record that
    /// have no records are present with a total of zero.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ConsumptionRecord>,
    {
        let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            if let Some(month) = month_start(record.date) {
                *buckets.entry(month).or_insert(0.0) += record.quantity;
            }
        }

        let (first, last) = match (buckets.keys().next(), buckets.keys().next_back()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Self::default(),
        };

        let mut months = Vec::new();
        let mut values = Vec::new();
        let mut current = first;
        while current <= last {
            months.push(current);
            values.push(buckets.get(&current).copied().unwrap_or(0.0));
            match current.checked_add_months(Months::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }

        Self { months, values }
    }

    /// Load `date,quantity` rows (dates as `YYYY-MM-DD`) from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();

        for row in reader.deserialize() {
            let row: CsvRow = row?;
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")?;
            records.push(ConsumptionRecord::new(date, row.quantity));
        }

        if records.is_empty() {
            return Err(ForecastError::DataError(
                "CSV file contains no consumption rows".to_string(),
            ));
        }

        Ok(Self::from_records(records))
    }

    /// First day of every month covered by the series
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Monthly totals, including zero months
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Monthly totals with empty months removed
    pub fn cleaned(&self) -> Vec<f64> {
        clean_series(&self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `YYYY-MM` labels of the months covered by the series
    pub fn month_labels(&self) -> Vec<String> {
        self.months
            .iter()
            .map(|m| m.format("%Y-%m").to_string())
            .collect()
    }

    /// The `horizon` months following the last month of the series
    pub fn next_months(&self, horizon: usize) -> Vec<NaiveDate> {
        let Some(&last) = self.months.last() else {
            return Vec::new();
        };

        (1..=horizon as u32)
            .filter_map(|offset| last.checked_add_months(Months::new(offset)))
            .collect()
    }
}

fn month_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clean_series_drops_non_positive() {
        let cleaned = clean_series(&[10.0, 0.0, -5.0, f64::NAN, 20.0, f64::INFINITY, 30.0]);
        assert_eq!(cleaned, vec![10.0, 20.0, 30.0]);
        assert!(clean_series(&[0.0, 0.0]).is_empty());
        assert!(clean_series(&[]).is_empty());
    }

    #[test]
    fn test_monthly_aggregation_fills_gaps() {
        let series = MonthlySeries::from_records(vec![
            ConsumptionRecord::new(ymd(2024, 1, 3), 40.0),
            ConsumptionRecord::new(ymd(2024, 1, 28), 60.0),
            ConsumptionRecord::new(ymd(2024, 3, 15), 80.0),
        ]);

        assert_eq!(series.months(), &[ymd(2024, 1, 1), ymd(2024, 2, 1), ymd(2024, 3, 1)]);
        assert_eq!(series.values(), &[100.0, 0.0, 80.0]);
        assert_eq!(series.cleaned(), vec![100.0, 80.0]);
        assert_eq!(series.month_labels(), vec!["2024-01", "2024-02", "2024-03"]);
    }

    #[test]
    fn test_records_out_of_order_are_sorted() {
        let series = MonthlySeries::from_records(vec![
            ConsumptionRecord::new(ymd(2023, 12, 1), 5.0),
            ConsumptionRecord::new(ymd(2023, 11, 30), 7.0),
        ]);
        assert_eq!(series.values(), &[7.0, 5.0]);
    }

    #[test]
    fn test_next_months_cross_year_boundary() {
        let series = MonthlySeries::from_records(vec![ConsumptionRecord::new(
            ymd(2024, 11, 20),
            1.0,
        )]);
        assert_eq!(
            series.next_months(3),
            vec![ymd(2024, 12, 1), ymd(2025, 1, 1), ymd(2025, 2, 1)]
        );
    }

    #[test]
    fn test_empty_records() {
        let series = MonthlySeries::from_records(Vec::new());
        assert!(series.is_empty());
        assert!(series.next_months(2).is_empty());
    }
}
