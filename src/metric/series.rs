//! Metric Series - append-only, arrival-ordered observations for one name

use serde::{Deserialize, Serialize};

use super::percentile::{sorted_percentile, PercentileMethod};
use super::Metric;

/// An ordered, append-only sequence of observations sharing one name.
///
/// Series are created lazily by the [`Recorder`](super::Recorder) on the
/// first observation and never shrink.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricSeries {
    name: String,
    observations: Vec<Metric>,
}

impl MetricSeries {
    /// Create an empty series.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observations: Vec::new(),
        }
    }

    /// Create an empty series with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            observations: Vec::with_capacity(capacity),
        }
    }

    /// Get the series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Most recently appended observation.
    #[must_use]
    pub fn latest(&self) -> Option<&Metric> {
        self.observations.last()
    }

    /// Observations in arrival order.
    #[must_use]
    pub fn observations(&self) -> &[Metric] {
        &self.observations
    }

    /// Copy of the raw values in arrival order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(Metric::value).collect()
    }

    pub(crate) fn push(&mut self, metric: Metric) {
        debug_assert_eq!(metric.name(), self.name);
        self.observations.push(metric);
    }
}

/// Aggregate view of one series, computed from a single consistent copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    name: String,
    count: usize,
    min: f64,
    max: f64,
    mean: f64,
    percentiles: Vec<(f64, f64)>,
}

impl SeriesSummary {
    /// Build a summary from non-empty values. `percentiles` must be validated.
    pub(crate) fn from_values(
        name: &str,
        mut values: Vec<f64>,
        percentiles: &[f64],
        method: PercentileMethod,
    ) -> Self {
        values.sort_unstable_by(f64::total_cmp);
        let count = values.len();
        let mean = mean_of(&values);
        let percentiles = percentiles
            .iter()
            .map(|&p| (p, sorted_percentile(&values, p, method)))
            .collect();

        Self {
            name: name.to_string(),
            count,
            min: values[0],
            max: values[count - 1],
            mean,
            percentiles,
        }
    }

    /// Get the series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of observations summarized.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Smallest observation.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Largest observation.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Arithmetic mean.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// `(p, value)` pairs in the order they were requested.
    #[must_use]
    pub fn percentiles(&self) -> &[(f64, f64)] {
        &self.percentiles
    }

    /// Value for a requested percentile, if it was part of the summary.
    #[must_use]
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(requested, _)| (requested - p).abs() < f64::EPSILON)
            .map(|&(_, value)| value)
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
