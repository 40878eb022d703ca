//! Training context - the read-only view a trainer hands to listeners

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::metric::Recorder;

/// Device a training run executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    /// Host CPU
    Cpu,
    /// GPU by ordinal
    Gpu(u32),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu()"),
            Self::Gpu(id) => write!(f, "gpu({id})"),
        }
    }
}

/// Name, version and load time of the execution engine behind the trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    name: String,
    version: String,
    load_time: Duration,
}

impl EngineInfo {
    /// Describe an engine.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, load_time: Duration) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            load_time,
        }
    }

    /// Engine name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Engine version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Time taken to load the engine.
    #[must_use]
    pub const fn load_time(&self) -> Duration {
        self.load_time
    }
}

/// What listeners may read about the run when an event fires.
///
/// The recorder is shared: the trainer keeps its own `Arc` and records into
/// it between events.
#[derive(Debug, Clone)]
pub struct TrainingContext {
    metrics: Arc<Recorder>,
    loss_name: String,
    training_evaluators: Vec<String>,
    validation_evaluators: Vec<String>,
    devices: Vec<Device>,
    engine: Option<EngineInfo>,
}

impl TrainingContext {
    /// Create a builder around a shared recorder.
    #[must_use]
    pub fn builder(metrics: Arc<Recorder>) -> TrainingContextBuilder {
        TrainingContextBuilder::new(metrics)
    }

    /// The run's metric store.
    #[must_use]
    pub fn metrics(&self) -> &Recorder {
        &self.metrics
    }

    /// Name of the training loss (validation loss lives in `validate_<loss>`).
    #[must_use]
    pub fn loss_name(&self) -> &str {
        &self.loss_name
    }

    /// Evaluators reported during training, recorded as `train_<name>`.
    #[must_use]
    pub fn training_evaluators(&self) -> &[String] {
        &self.training_evaluators
    }

    /// Evaluators reported during validation, recorded as `validate_<name>`.
    #[must_use]
    pub fn validation_evaluators(&self) -> &[String] {
        &self.validation_evaluators
    }

    /// Devices the run executes on.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Engine description, if the trainer supplied one.
    #[must_use]
    pub const fn engine(&self) -> Option<&EngineInfo> {
        self.engine.as_ref()
    }
}

/// Builder for `TrainingContext`.
#[derive(Debug)]
pub struct TrainingContextBuilder {
    metrics: Arc<Recorder>,
    loss_name: String,
    training_evaluators: Vec<String>,
    validation_evaluators: Vec<String>,
    devices: Vec<Device>,
    engine: Option<EngineInfo>,
}

impl TrainingContextBuilder {
    /// Defaults: loss `"loss"`, no evaluators, a single CPU, no engine info.
    #[must_use]
    pub fn new(metrics: Arc<Recorder>) -> Self {
        Self {
            metrics,
            loss_name: "loss".to_string(),
            training_evaluators: Vec::new(),
            validation_evaluators: Vec::new(),
            devices: vec![Device::Cpu],
            engine: None,
        }
    }

    /// Set the loss name.
    #[must_use]
    pub fn loss_name(mut self, name: impl Into<String>) -> Self {
        self.loss_name = name.into();
        self
    }

    /// Set the training evaluators.
    #[must_use]
    pub fn training_evaluators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.training_evaluators = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the validation evaluators.
    #[must_use]
    pub fn validation_evaluators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validation_evaluators = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the devices.
    #[must_use]
    pub fn devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    /// Set the engine description.
    #[must_use]
    pub fn engine(mut self, engine: EngineInfo) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Build the `TrainingContext`.
    #[must_use]
    pub fn build(self) -> TrainingContext {
        TrainingContext {
            metrics: self.metrics,
            loss_name: self.loss_name,
            training_evaluators: self.training_evaluators,
            validation_evaluators: self.validation_evaluators,
            devices: self.devices,
            engine: self.engine,
        }
    }
}
