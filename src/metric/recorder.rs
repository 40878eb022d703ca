//! Recorder - concurrent, in-memory store of named metric series
//!
//! Producers (the trainer, possibly one thread per device) append with
//! [`Recorder::record`]; observers (logging listeners, end-of-run reports)
//! query with [`Recorder::latest`] and [`Recorder::percentile`].

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};

use super::percentile::{check_percentile, select_percentile, PercentileMethod};
use super::series::{mean_of, MetricSeries, SeriesSummary};
use super::Metric;
use crate::config::RecorderConfig;
use crate::{Error, Result};

/// Thread-safe store of metric series keyed by name.
///
/// ## Design
///
/// Series live in a sharded `DashMap`. Appends to a series hold that shard's
/// write lock for the duration of one `Vec::push`; queries hold the read lock
/// only long enough to copy what they need. A query therefore always sees a
/// prefix of the series that was complete at some instant, never a torn write.
///
/// Percentiles are computed over the entire history on a scratch copy, in
/// O(N) per query (see [`super::percentile`]).
///
/// # Example
///
/// ```rust
/// use trueno_metrics::metric::Recorder;
///
/// let recorder = Recorder::new();
/// for ns in [10_000_000.0, 20_000_000.0, 30_000_000.0] {
///     recorder.record("train", ns);
/// }
///
/// assert_eq!(recorder.latest("train")?, 30_000_000.0);
/// assert_eq!(recorder.percentile("train", 50.0)?, 20_000_000.0);
/// assert!(!recorder.has_metric("validate_loss"));
/// # Ok::<(), trueno_metrics::Error>(())
/// ```
#[derive(Debug)]
pub struct Recorder {
    series: DashMap<String, MetricSeries, FxBuildHasher>,
    method: PercentileMethod,
}

impl Recorder {
    /// Create an empty recorder using [`PercentileMethod::Floor`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            series: DashMap::with_hasher(FxBuildHasher),
            method: PercentileMethod::default(),
        }
    }

    /// Create an empty recorder from configuration.
    #[must_use]
    pub fn with_config(config: &RecorderConfig) -> Self {
        Self {
            series: DashMap::with_capacity_and_hasher(config.initial_capacity, FxBuildHasher),
            method: config.percentile_method,
        }
    }

    /// Percentile method used by every query on this recorder.
    #[must_use]
    pub const fn percentile_method(&self) -> PercentileMethod {
        self.method
    }

    /// Append `value` to series `name`, creating the series if absent.
    pub fn record(&self, name: &str, value: f64) {
        self.record_metric(Metric::new(name, value));
    }

    /// Append a duration to series `name` as nanoseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn record_duration(&self, name: &str, duration: Duration) {
        self.record(name, duration.as_nanos() as f64);
    }

    /// Append a fully built observation.
    pub fn record_metric(&self, metric: Metric) {
        if let Some(mut series) = self.series.get_mut(metric.name()) {
            series.push(metric);
            return;
        }

        let name = metric.name().to_string();
        self.series
            .entry(name.clone())
            .or_insert_with(|| {
                tracing::debug!(series = %name, "creating metric series");
                MetricSeries::new(name.clone())
            })
            .push(metric);
    }

    /// Start a timer that records elapsed nanoseconds into `name` when stopped or dropped.
    pub fn start_timer(&self, name: impl Into<String>) -> Timer<'_> {
        Timer {
            recorder: self,
            name: name.into(),
            start: Instant::now(),
            finished: false,
        }
    }

    /// True iff at least one observation was recorded under `name`.
    #[must_use]
    pub fn has_metric(&self, name: &str) -> bool {
        self.series.get(name).is_some_and(|series| !series.is_empty())
    }

    /// Most recently recorded value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the series is absent or empty.
    pub fn latest(&self, name: &str) -> Result<f64> {
        self.series
            .get(name)
            .and_then(|series| series.latest().map(Metric::value))
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Value at percentile `p` (0-100) over the full history of `name`.
    ///
    /// The argument is validated before the series is looked up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `p` is outside `[0, 100]`, and
    /// [`Error::NotFound`] if the series is absent or empty.
    pub fn percentile(&self, name: &str, p: f64) -> Result<f64> {
        check_percentile(p)?;
        let mut values = self.values(name)?;
        Ok(select_percentile(&mut values, p, self.method))
    }

    /// Arithmetic mean of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the series is absent or empty.
    pub fn mean(&self, name: &str) -> Result<f64> {
        Ok(mean_of(&self.values(name)?))
    }

    /// Count, min, max, mean and the requested percentiles of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any percentile is outside
    /// `[0, 100]`, and [`Error::NotFound`] if the series is absent or empty.
    pub fn summary(&self, name: &str, percentiles: &[f64]) -> Result<SeriesSummary> {
        for &p in percentiles {
            check_percentile(p)?;
        }
        let values = self.values(name)?;
        Ok(SeriesSummary::from_values(name, values, percentiles, self.method))
    }

    /// Copy of the observations of `name` in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the series is absent or empty.
    pub fn metrics(&self, name: &str) -> Result<Vec<Metric>> {
        self.series
            .get(name)
            .filter(|series| !series.is_empty())
            .map(|series| series.observations().to_vec())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Number of observations in `name` (0 if absent).
    #[must_use]
    pub fn series_len(&self, name: &str) -> usize {
        self.series.get(name).map_or(0, |series| series.len())
    }

    /// Names of all series, sorted.
    #[must_use]
    pub fn series_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.series.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Serializable copy of every series.
    ///
    /// Each series is copied under its own lock; series recorded concurrently
    /// with the snapshot may or may not include their newest observation.
    #[must_use]
    pub fn snapshot(&self) -> RecorderSnapshot {
        let series = self
            .series
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().observations().to_vec()))
            .collect();

        RecorderSnapshot {
            percentile_method: self.method,
            series,
        }
    }

    fn values(&self, name: &str) -> Result<Vec<f64>> {
        self.series
            .get(name)
            .filter(|series| !series.is_empty())
            .map(|series| series.values())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped timer created by [`Recorder::start_timer`].
///
/// Records the elapsed nanoseconds exactly once: on [`Timer::stop`] or on drop.
#[must_use = "a timer dropped immediately records a near-zero duration"]
#[derive(Debug)]
pub struct Timer<'a> {
    recorder: &'a Recorder,
    name: String,
    start: Instant,
    finished: bool,
}

impl Timer<'_> {
    /// Stop the timer, record the elapsed time and return it.
    pub fn stop(mut self) -> Duration {
        self.finish()
    }

    fn finish(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.recorder.record_duration(&self.name, elapsed);
        self.finished = true;
        elapsed
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.finish();
        }
    }
}

/// Point-in-time, serializable copy of a [`Recorder`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecorderSnapshot {
    percentile_method: PercentileMethod,
    series: BTreeMap<String, Vec<Metric>>,
}

impl RecorderSnapshot {
    /// Percentile method of the recorder the snapshot was taken from.
    #[must_use]
    pub const fn percentile_method(&self) -> PercentileMethod {
        self.percentile_method
    }

    /// Observations by series name, names sorted.
    #[must_use]
    pub const fn series(&self) -> &BTreeMap<String, Vec<Metric>> {
        &self.series
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
