use consumption_math::MathError;
use fuel_forecast::{EngineConfig, ForecastEngine, ForecastError, Method};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_error_display() {
    let error = ForecastError::DataError("no rows".to_string());
    assert_eq!(error.to_string(), "Data error: no rows");

    let error = ForecastError::UnknownMethod("prophet".to_string());
    assert!(error.to_string().contains("prophet"));
}

#[test]
fn test_math_error_conversion() {
    let error: ForecastError = MathError::InvalidInput("alpha".to_string()).into();
    assert!(matches!(error, ForecastError::MathError(MathError::InvalidInput(_))));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: ForecastError = io.into();
    assert!(matches!(error, ForecastError::IoError(_)));
}

#[test]
fn test_unknown_method_name() {
    let parsed = "random-walk".parse::<Method>();
    assert!(matches!(parsed, Err(ForecastError::UnknownMethod(name)) if name == "random-walk"));
}

#[test]
fn test_horizon_errors() {
    let engine = ForecastEngine::default();
    let max = engine.config().max_horizon;

    assert!(matches!(
        engine.forecast(&[1.0, 2.0], 0, Method::Seasonal),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(matches!(
        engine.forecast(&[1.0, 2.0], max + 1, Method::Seasonal),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(engine.forecast(&[1.0, 2.0], max, Method::Seasonal).is_ok());
}

#[test]
fn test_config_file_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "alpha": 0.5, "ensemble_weighting": "accuracy", "perturbation": {{ "kind": "seeded", "seed": 3 }} }}"#
    )
    .unwrap();

    let config = EngineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.alpha, 0.5);
    assert_eq!(config.beta, EngineConfig::default().beta);

    let engine = ForecastEngine::new(config).unwrap();
    assert!(engine.forecast(&[5.0, 6.0, 7.0, 8.0, 9.0], 3, Method::Ensemble).is_ok());
}

#[test]
fn test_malformed_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ alpha: ").unwrap();
    assert!(matches!(
        EngineConfig::from_file(file.path()),
        Err(ForecastError::SerializationError(_))
    ));
}

#[test]
fn test_out_of_range_config() {
    for json in [
        r#"{ "beta": 1.0 }"#,
        r#"{ "holdout_ratio": 0.0 }"#,
        r#"{ "max_horizon": 0 }"#,
    ] {
        assert!(
            matches!(EngineConfig::from_json_str(json), Err(ForecastError::ConfigError(_))),
            "{} should be rejected",
            json
        );
    }
}
