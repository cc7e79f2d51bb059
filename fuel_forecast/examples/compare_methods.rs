use fuel_forecast::{EngineConfig, EnsembleWeighting, ForecastEngine, Method};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("Fuel Forecast: Method Comparison");
    println!("================================\n");

    // Two years of monthly diesel usage with a winter peak
    let history = [
        1420.0, 1385.0, 1210.0, 1150.0, 1120.0, 1095.0, 1080.0, 1110.0, 1160.0, 1240.0, 1330.0, 1410.0,
        1465.0, 1430.0, 1260.0, 1190.0, 1160.0, 1140.0, 1125.0, 1150.0, 1205.0, 1290.0, 1375.0, 1450.0,
    ];
    let horizon = 6;

    let engine = ForecastEngine::new(EngineConfig {
        ensemble_weighting: EnsembleWeighting::Accuracy,
        ..EngineConfig::default()
    })?;

    println!("{:<16} {:>10} {:>10} {:>10}", "method", "month 1", "month 6", "conf 1");
    for method in Method::ALL {
        let result = engine.forecast(&history, horizon, method)?;
        println!(
            "{:<16} {:>10.1} {:>10.1} {:>9.0}%",
            method.to_string(),
            result.values[0],
            result.values[horizon - 1],
            result.confidence[0]
        );

        if let Some(summary) = &result.metadata.ensemble {
            println!("  agreement {:.2}", summary.agreement);
            for component in &summary.components {
                println!(
                    "  {:<18} weight {:.2} trend {:?}",
                    component.model.label(),
                    component.weight,
                    component.trend
                );
            }
        }
    }

    // Short histories still produce a forecast
    let sparse = [0.0, 0.0, 980.0];
    let result = engine.forecast(&sparse, 3, Method::Seasonal)?;
    println!(
        "\nSparse history -> {:?} ({:?})",
        result.values, result.metadata.recommendations
    );

    Ok(())
}
