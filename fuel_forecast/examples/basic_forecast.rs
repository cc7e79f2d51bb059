use chrono::NaiveDate;
use fuel_forecast::{ConsumptionRecord, ForecastEngine, Method, MonthlySeries};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("Fuel Forecast: Basic Forecasting Example");
    println!("========================================\n");

    // Two refuellings per month over a year and a half, with a quiet March
    let records = create_sample_records();
    let series = MonthlySeries::from_records(records);
    println!(
        "Aggregated {} months, {} with usable data\n",
        series.len(),
        series.cleaned().len()
    );

    let engine = ForecastEngine::default();
    let horizon = 6;
    let result = engine.forecast(series.values(), horizon, Method::Exponential)?;

    println!("Forecast ({}):", result.metadata.method);
    for ((month, value), confidence) in series
        .next_months(horizon)
        .iter()
        .zip(result.values.iter())
        .zip(result.confidence.iter())
    {
        println!(
            "  {}: {:>8.1} litres (confidence {:.0}%)",
            month.format("%Y-%m"),
            value,
            confidence
        );
    }

    println!("\nTrend: {:?}", result.metadata.trend);
    println!("Seasonality: {:?}", result.metadata.seasonality);
    println!("Recommendations: {:?}", result.metadata.recommendations);

    match &result.accuracy {
        Some(accuracy) => println!("\n{}", accuracy),
        None => println!("\nNot enough history to estimate accuracy"),
    }

    println!("\nJSON payload:\n{}", result.to_json()?);

    Ok(())
}

fn create_sample_records() -> Vec<ConsumptionRecord> {
    let mut records = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid start date");

    for month in 0..18u32 {
        // Fleet idle for maintenance
        if month == 14 {
            date = date + chrono::Months::new(1);
            continue;
        }

        let base = 1100.0 + 12.0 * month as f64;
        let winter = if matches!(month % 12, 0 | 1 | 11) { 150.0 } else { 0.0 };
        records.push(ConsumptionRecord::new(date, (base + winter) * 0.55));
        records.push(ConsumptionRecord::new(
            date + chrono::Days::new(14),
            (base + winter) * 0.45,
        ));
        date = date + chrono::Months::new(1);
    }

    records
}
