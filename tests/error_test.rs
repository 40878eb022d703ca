//! Tests for error types

use trueno_metrics::Error;

#[test]
fn test_not_found_error() {
    let error = Error::NotFound("validate_loss".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Metric not found"));
    assert!(error_str.contains("validate_loss"));
    assert!(error_str.contains("has_metric"));
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::InvalidArgument("percentile must be within [0, 100], got 150".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid argument"));
    assert!(error_str.contains("150"));
}

#[test]
fn test_config_error() {
    let error = Error::Config("listener.batch_size must be greater than 0".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Config error"));
    assert!(error_str.contains("batch_size"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_error_debug() {
    let error = Error::NotFound("train".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("NotFound"));
}

#[test]
fn test_result_type_alias() {
    #[allow(clippy::unnecessary_wraps)]
    fn returns_result() -> trueno_metrics::Result<f64> {
        Ok(42.0)
    }

    let result = returns_result();
    assert!(result.is_ok());
    assert!((result.unwrap() - 42.0).abs() < f64::EPSILON);
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> trueno_metrics::Result<f64> {
        Err(Error::NotFound("epoch".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
