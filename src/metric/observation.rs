//! Observation - a single named metric value

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metric represents a single observation appended to a series.
///
/// Observations are immutable once recorded. The timestamp is optional so
/// that producers replaying values (or values with no meaningful wall-clock
/// time) can omit it.
///
/// ## Units
///
/// Values carry no unit. By convention timing series (`train`, `forward`,
/// `backward`, `step`, `epoch`, ...) hold nanoseconds and evaluator series
/// hold raw scores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    name: String,
    value: f64,
    timestamp: Option<DateTime<Utc>>,
}

impl Metric {
    /// Create a new metric stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `name` - Series name (e.g., "train", "validate_loss")
    /// * `value` - Observed value
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a builder for constructing a metric with a custom or absent timestamp.
    #[must_use]
    pub fn builder(name: impl Into<String>, value: f64) -> MetricBuilder {
        MetricBuilder::new(name, value)
    }

    /// Get the series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the observed value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the timestamp, if one was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

/// Builder for `Metric`.
#[derive(Debug)]
pub struct MetricBuilder {
    name: String,
    value: f64,
    timestamp: Option<DateTime<Utc>>,
}

impl MetricBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            timestamp: Some(Utc::now()),
        }
    }

    /// Set a custom timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Record the observation without a timestamp.
    #[must_use]
    pub const fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    /// Build the `Metric`.
    #[must_use]
    pub fn build(self) -> Metric {
        Metric {
            name: self.name,
            value: self.value,
            timestamp: self.timestamp,
        }
    }
}
