//! Configuration loader (strict parsing)
//!
//! ```json
//! {
//!   "recorder": { "percentile_method": "floor" },
//!   "listener": {
//!     "batch_size": 32,
//!     "train_data_size": 1875,
//!     "validate_data_size": 313,
//!     "summary_percentiles": [50, 90, 99]
//!   }
//! }
//! ```
//!
//! Unknown fields are rejected; omitted optional fields take the defaults
//! below. Every loaded config is validated before it is returned.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::metric::PercentileMethod;
use crate::{Error, Result};

/// Load and validate a config file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`] if
/// it fails to parse or validate.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let s = fs::read_to_string(path)?;
    load_from_str(&s)
}

/// Parse and validate a JSON config.
///
/// # Errors
///
/// Returns [`Error::Config`] on malformed JSON, unknown fields or values
/// outside their accepted range.
pub fn load_from_str(s: &str) -> Result<Config> {
    let cfg: Config =
        serde_json::from_str(s).map_err(|e| Error::Config(format!("invalid json: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Metric store settings.
    #[serde(default)]
    pub recorder: RecorderConfig,

    /// Logging listener settings.
    pub listener: ListenerConfig,
}

impl Config {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.listener.validate()
    }
}

/// Settings for [`Recorder`](crate::metric::Recorder).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecorderConfig {
    /// How percentiles map onto ranks. Fixed for the recorder's lifetime.
    #[serde(default)]
    pub percentile_method: PercentileMethod,

    /// Pre-allocated number of series slots.
    #[serde(default)]
    pub initial_capacity: usize,
}

/// Settings for [`LoggingListener`](crate::listener::LoggingListener).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenerConfig {
    /// Items per training batch, used for throughput.
    pub batch_size: usize,

    /// Number of training batches per epoch.
    pub train_data_size: usize,

    /// Number of validation batches per epoch.
    pub validate_data_size: usize,

    /// Width of the progress bar in characters.
    #[serde(default = "default_progress_width")]
    pub progress_width: usize,

    /// Percentiles reported for each summary series at the end of training.
    #[serde(default = "default_summary_percentiles")]
    pub summary_percentiles: Vec<f64>,

    /// Timing series summarized at the end of training, in report order.
    #[serde(default = "default_summary_series")]
    pub summary_series: Vec<SummarySeries>,
}

impl ListenerConfig {
    /// Config with default presentation settings.
    #[must_use]
    pub fn new(batch_size: usize, train_data_size: usize, validate_data_size: usize) -> Self {
        Self {
            batch_size,
            train_data_size,
            validate_data_size,
            progress_width: default_progress_width(),
            summary_percentiles: default_summary_percentiles(),
            summary_series: default_summary_series(),
        }
    }

    /// Set the progress bar width.
    #[must_use]
    pub const fn progress_width(mut self, width: usize) -> Self {
        self.progress_width = width;
        self
    }

    /// Set the reported percentiles.
    #[must_use]
    pub fn summary_percentiles(mut self, percentiles: Vec<f64>) -> Self {
        self.summary_percentiles = percentiles;
        self
    }

    /// Set the summarized series.
    #[must_use]
    pub fn summary_series(mut self, series: Vec<SummarySeries>) -> Self {
        self.summary_series = series;
        self
    }

    /// Check every field is within its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config(
                "listener.batch_size must be greater than 0".into(),
            ));
        }
        if !(1..=200).contains(&self.progress_width) {
            return Err(Error::Config(
                "listener.progress_width must be between 1 and 200".into(),
            ));
        }
        if self.summary_percentiles.is_empty() {
            return Err(Error::Config(
                "listener.summary_percentiles must not be empty".into(),
            ));
        }
        if let Some(p) = self
            .summary_percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(Error::Config(format!(
                "listener.summary_percentiles must be within [0, 100], got {p}"
            )));
        }
        if self.summary_series.iter().any(|s| s.name.is_empty()) {
            return Err(Error::Config(
                "listener.summary_series names must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// A timing series to summarize, and the unit to display it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummarySeries {
    /// Series name in the recorder.
    pub name: String,

    /// Display unit; recorded values are nanoseconds.
    #[serde(default)]
    pub unit: TimeUnit,
}

impl SummarySeries {
    /// Summarize `name` in `unit`.
    #[must_use]
    pub fn new(name: impl Into<String>, unit: TimeUnit) -> Self {
        Self {
            name: name.into(),
            unit,
        }
    }
}

/// Display unit for nanosecond timing series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Nanoseconds
    #[serde(rename = "ns")]
    Nanoseconds,
    /// Milliseconds
    #[default]
    #[serde(rename = "ms")]
    Milliseconds,
    /// Seconds
    #[serde(rename = "s")]
    Seconds,
}

impl TimeUnit {
    /// Convert a nanosecond value into this unit.
    #[must_use]
    pub fn from_nanos(self, nanos: f64) -> f64 {
        match self {
            Self::Nanoseconds => nanos,
            Self::Milliseconds => nanos / 1_000_000.0,
            Self::Seconds => nanos / 1_000_000_000.0,
        }
    }

    /// Short suffix used in log lines.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Nanoseconds => "ns",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
        }
    }
}

const fn default_progress_width() -> usize {
    40
}

fn default_summary_percentiles() -> Vec<f64> {
    vec![50.0, 90.0]
}

fn default_summary_series() -> Vec<SummarySeries> {
    vec![
        SummarySeries::new("train", TimeUnit::Milliseconds),
        SummarySeries::new("forward", TimeUnit::Milliseconds),
        SummarySeries::new("training-metrics", TimeUnit::Milliseconds),
        SummarySeries::new("backward", TimeUnit::Milliseconds),
        SummarySeries::new("step", TimeUnit::Milliseconds),
        SummarySeries::new("epoch", TimeUnit::Seconds),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = load_from_str(
            r#"{"listener": {"batch_size": 32, "train_data_size": 10, "validate_data_size": 2}}"#,
        )
        .unwrap();

        assert_eq!(cfg.recorder, RecorderConfig::default());
        assert_eq!(cfg.listener.progress_width, 40);
        assert_eq!(cfg.listener.summary_percentiles, vec![50.0, 90.0]);
        assert_eq!(cfg.listener.summary_series.len(), 6);
        assert_eq!(cfg.listener.summary_series[5].unit, TimeUnit::Seconds);
    }

    #[test]
    fn test_listener_config_new_matches_defaults() {
        let cfg = ListenerConfig::new(32, 10, 2);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.summary_series[0].name, "train");
    }

    #[test]
    fn test_time_unit_conversion() {
        assert!((TimeUnit::Milliseconds.from_nanos(2_500_000.0) - 2.5).abs() < f64::EPSILON);
        assert!((TimeUnit::Seconds.from_nanos(3_000_000_000.0) - 3.0).abs() < f64::EPSILON);
        assert_eq!(TimeUnit::Nanoseconds.suffix(), "ns");
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = ListenerConfig::new(0, 10, 2).validate().unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("batch_size")));
    }

    #[test]
    fn test_percentile_out_of_range_rejected() {
        let err = ListenerConfig::new(1, 1, 1)
            .summary_percentiles(vec![50.0, 150.0])
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("150")));
    }
}
