//! Metrics Recorder & Percentile Reporter
//!
//! Accumulates named, timestamped numeric observations produced during a
//! training run and answers "latest value" and "percentile" queries.
//!
//! ## Schema Overview
//!
//! ```text
//! Recorder (1) ──< MetricSeries (N, keyed by name, created lazily)
//!                       │
//!                       └──< Metric (N) [append-only, arrival order]
//! ```
//!
//! ## Conventional series names
//!
//! | Series | Unit | Producer |
//! |---|---|---|
//! | `train` | ns per batch | trainer |
//! | `forward`, `backward`, `step`, `training-metrics` | ns per batch | trainer |
//! | `epoch` | ns per epoch | trainer |
//! | `validate_<loss>` | raw loss | validation loop |
//! | `train_<evaluator>`, `validate_<evaluator>` | raw score | evaluators |
//!
//! ## Usage
//!
//! ```rust
//! use trueno_metrics::metric::Recorder;
//!
//! let recorder = Recorder::new();
//! recorder.record("train_accuracy", 0.81);
//! recorder.record("train_accuracy", 0.84);
//!
//! assert!(recorder.has_metric("train_accuracy"));
//! assert_eq!(recorder.latest("train_accuracy")?, 0.84);
//! assert_eq!(recorder.percentile("train_accuracy", 0.0)?, 0.81);
//! # Ok::<(), trueno_metrics::Error>(())
//! ```

mod observation;
pub mod percentile;
mod recorder;
mod series;

pub use observation::{Metric, MetricBuilder};
pub use percentile::PercentileMethod;
pub use recorder::{Recorder, RecorderSnapshot, Timer};
pub use series::{MetricSeries, SeriesSummary};
