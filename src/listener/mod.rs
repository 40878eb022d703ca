//! Training listeners
//!
//! The trainer emits a [`TrainingEvent`] at each boundary of the run and
//! hands every registered listener the same read-only [`TrainingContext`].
//!
//! ```text
//! TrainBegin ─┬─> (TrainBatch* ─> ValidateBatch* ─> EpochEnd)* ─> TrainEnd
//!             │
//!             └─ ListenerSet::dispatch ──> listener 1, listener 2, ...
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use trueno_metrics::config::ListenerConfig;
//! use trueno_metrics::listener::{
//!     ListenerSet, LoggingListener, MemorySink, TrainingContext, TrainingEvent,
//! };
//! use trueno_metrics::metric::Recorder;
//!
//! let recorder = Arc::new(Recorder::new());
//! let ctx = TrainingContext::builder(Arc::clone(&recorder)).build();
//! let sink = Arc::new(MemorySink::new());
//!
//! let mut listeners = ListenerSet::new();
//! listeners.add(LoggingListener::new(ListenerConfig::new(32, 1, 0), sink.clone()));
//!
//! listeners.dispatch(TrainingEvent::TrainBegin, &ctx)?;
//! recorder.record("train", 10_000_000.0);
//! listeners.dispatch(TrainingEvent::TrainBatch, &ctx)?;
//! listeners.dispatch(TrainingEvent::EpochEnd, &ctx)?;
//! listeners.dispatch(TrainingEvent::TrainEnd, &ctx)?;
//!
//! assert!(sink.info_lines().contains(&"train P50: 10.000 ms, P90: 10.000 ms".to_string()));
//! # Ok::<(), trueno_metrics::Error>(())
//! ```

mod context;
mod logging;
mod progress;
mod sink;

pub use context::{Device, EngineInfo, TrainingContext, TrainingContextBuilder};
pub use logging::LoggingListener;
pub use progress::ProgressBar;
pub use sink::{LineKind, LogSink, MemorySink, TracingSink};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Boundaries of a training run at which listeners are notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainingEvent {
    /// Before the first batch.
    TrainBegin,
    /// After each training batch has been recorded.
    TrainBatch,
    /// After each validation batch.
    ValidateBatch,
    /// After each full pass over the training data.
    EpochEnd,
    /// After the last epoch.
    TrainEnd,
}

impl TrainingEvent {
    /// Stable snake_case name, used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrainBegin => "train_begin",
            Self::TrainBatch => "train_batch",
            Self::ValidateBatch => "validate_batch",
            Self::EpochEnd => "epoch_end",
            Self::TrainEnd => "train_end",
        }
    }
}

impl fmt::Display for TrainingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer of training events.
///
/// Closures `FnMut(&TrainingEvent, &TrainingContext) -> Result<()>` are
/// listeners too.
pub trait TrainingListener: Send {
    /// Handle one event.
    ///
    /// # Errors
    ///
    /// Implementations propagate metric query failures, typically
    /// [`Error::NotFound`](crate::Error::NotFound) for a series the trainer
    /// never recorded.
    fn on_event(&mut self, event: &TrainingEvent, ctx: &TrainingContext) -> Result<()>;
}

impl<F> TrainingListener for F
where
    F: FnMut(&TrainingEvent, &TrainingContext) -> Result<()> + Send,
{
    fn on_event(&mut self, event: &TrainingEvent, ctx: &TrainingContext) -> Result<()> {
        self(event, ctx)
    }
}

/// Zero or more listeners notified in registration order.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn TrainingListener>>,
}

impl ListenerSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add(&mut self, listener: impl TrainingListener + 'static) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Register a listener, builder style.
    #[must_use]
    pub fn with(mut self, listener: impl TrainingListener + 'static) -> Self {
        self.add(listener);
        self
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every listener, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first listener error; later listeners do not see the event.
    pub fn dispatch(&mut self, event: TrainingEvent, ctx: &TrainingContext) -> Result<()> {
        tracing::trace!(event = %event, listeners = self.listeners.len(), "dispatching");
        for (index, listener) in self.listeners.iter_mut().enumerate() {
            if let Err(e) = listener.on_event(&event, ctx) {
                tracing::debug!(event = %event, listener = index, error = %e, "listener failed");
                return Err(e);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
