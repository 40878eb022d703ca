//! Strict configuration parsing tests

use std::io::Write as _;

use trueno_metrics::config::{self, TimeUnit};
use trueno_metrics::metric::{PercentileMethod, Recorder};
use trueno_metrics::Error;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"{
        "listener": {
            "batch_size": 32,
            "train_data_size": 10,
            "validate_data_size": 2,
            "progres_width": 20
        }
    }"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, Error::Config(msg) if msg.contains("progres_width")));
}

#[test]
fn ok_minimal_config() {
    let ok = r#"{"listener": {"batch_size": 32, "train_data_size": 10, "validate_data_size": 2}}"#;

    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.listener.batch_size, 32);
    assert_eq!(cfg.recorder.percentile_method, PercentileMethod::Floor);
}

#[test]
fn ok_full_config() {
    let ok = r#"{
        "recorder": { "percentile_method": "nearest_rank", "initial_capacity": 16 },
        "listener": {
            "batch_size": 64,
            "train_data_size": 100,
            "validate_data_size": 10,
            "progress_width": 20,
            "summary_percentiles": [50, 90, 99],
            "summary_series": [
                { "name": "train" },
                { "name": "epoch", "unit": "s" },
                { "name": "data-loading", "unit": "ns" }
            ]
        }
    }"#;

    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.recorder.percentile_method, PercentileMethod::NearestRank);
    assert_eq!(cfg.listener.summary_percentiles, vec![50.0, 90.0, 99.0]);
    assert_eq!(cfg.listener.summary_series[0].unit, TimeUnit::Milliseconds);
    assert_eq!(cfg.listener.summary_series[1].unit, TimeUnit::Seconds);
    assert_eq!(cfg.listener.summary_series[2].unit, TimeUnit::Nanoseconds);

    let recorder = Recorder::with_config(&cfg.recorder);
    assert_eq!(recorder.percentile_method(), PercentileMethod::NearestRank);
}

#[test]
fn missing_listener_section_fails() {
    let err = config::load_from_str("{}").expect_err("must fail");
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn unknown_percentile_method_fails() {
    let bad = r#"{
        "recorder": { "percentile_method": "linear" },
        "listener": {"batch_size": 1, "train_data_size": 1, "validate_data_size": 1}
    }"#;

    assert!(matches!(config::load_from_str(bad), Err(Error::Config(_))));
}

#[test]
fn out_of_range_values_fail_validation() {
    let cases = [
        r#"{"listener": {"batch_size": 0, "train_data_size": 1, "validate_data_size": 1}}"#,
        r#"{"listener": {"batch_size": 1, "train_data_size": 1, "validate_data_size": 1, "progress_width": 0}}"#,
        r#"{"listener": {"batch_size": 1, "train_data_size": 1, "validate_data_size": 1, "summary_percentiles": []}}"#,
        r#"{"listener": {"batch_size": 1, "train_data_size": 1, "validate_data_size": 1, "summary_percentiles": [101]}}"#,
        r#"{"listener": {"batch_size": 1, "train_data_size": 1, "validate_data_size": 1, "summary_series": [{"name": ""}]}}"#,
    ];

    for case in cases {
        let err = config::load_from_str(case).expect_err(case);
        assert!(matches!(err, Error::Config(_)), "{case}: {err}");
    }
}

#[test]
fn load_from_file_roundtrip() {
    let path = std::env::temp_dir().join(format!(
        "trueno-metrics-config-{}.json",
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).expect("create temp config");
    file.write_all(
        br#"{"listener": {"batch_size": 8, "train_data_size": 3, "validate_data_size": 1}}"#,
    )
    .expect("write temp config");
    drop(file);

    let cfg = config::load_from_file(&path).expect("must load");
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.listener.batch_size, 8);
}

#[test]
fn load_from_missing_file_is_io_error() {
    let err = config::load_from_file("/nonexistent/trueno-metrics.json").expect_err("must fail");
    assert!(matches!(err, Error::Io(_)));
}
