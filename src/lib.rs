//! # trueno-metrics: Training Metrics Recorder & Progress Logging
//!
//! **Version**: 0.1.0
//!
//! trueno-metrics accumulates named, timestamped observations produced while
//! a model trains (per-batch timings, losses, evaluator scores) and answers
//! "latest value" and "percentile" queries over them. Training listeners
//! turn those queries into progress bars, epoch summaries and end-of-run
//! P50/P90 latency reports.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Genchi Genbutsu**: Percentiles over the full run history, not a sampled window
//! - **Poka-Yoke**: Invalid percentiles and unknown series are typed errors, never panics
//! - **Jidoka**: Sharded locking keeps concurrent producers from tearing a series
//! - **Respect for People**: Listener output goes to an injected sink, no global logger
//!
//! ## Example Usage
//!
//! ```rust
//! use trueno_metrics::metric::Recorder;
//!
//! let recorder = Recorder::new();
//! for ns in [10_000_000.0, 20_000_000.0, 30_000_000.0] {
//!     recorder.record("train", ns);
//! }
//!
//! let p50_ms = recorder.percentile("train", 50.0)? / 1_000_000.0;
//! assert_eq!(p50_ms, 20.0);
//! # Ok::<(), trueno_metrics::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod listener;
pub mod metric;

pub use config::Config;
pub use error::{Error, Result};
pub use listener::{ListenerSet, LoggingListener, TrainingContext, TrainingEvent, TrainingListener};
pub use metric::{Metric, PercentileMethod, Recorder};
