//! Logging listener - progress bars, epoch summaries and timing percentiles

use std::sync::Arc;

use super::{Device, LogSink, ProgressBar, TrainingContext, TrainingEvent, TrainingListener};
use crate::config::{ListenerConfig, SummarySeries};
use crate::metric::Recorder;
use crate::Result;

/// [`TrainingListener`] that writes the progress of each batch and epoch to a [`LogSink`].
///
/// | Event | Output |
/// |---|---|
/// | `TrainBegin` | devices, engine load time |
/// | `TrainBatch` | training progress bar with evaluator values and throughput |
/// | `ValidateBatch` | validation progress bar |
/// | `EpochEnd` | latest training / validation evaluator values |
/// | `TrainEnd` | batch counts and percentile timing summaries |
#[derive(Clone)]
pub struct LoggingListener {
    config: ListenerConfig,
    sink: Arc<dyn LogSink>,
    epochs: usize,
    training_bar: ProgressBar,
    validate_bar: ProgressBar,
}

impl LoggingListener {
    /// Create a listener writing to `sink`.
    ///
    /// `config` is expected to be validated (see [`ListenerConfig::validate`]).
    #[must_use]
    pub fn new(config: ListenerConfig, sink: Arc<dyn LogSink>) -> Self {
        let training_bar =
            ProgressBar::new("Training", config.train_data_size, config.progress_width);
        let validate_bar =
            ProgressBar::new("Validating", config.validate_data_size, config.progress_width);

        Self {
            config,
            sink,
            epochs: 0,
            training_bar,
            validate_bar,
        }
    }

    /// Number of completed epochs.
    #[must_use]
    pub const fn epochs(&self) -> usize {
        self.epochs
    }

    fn on_training_begin(&self, ctx: &TrainingContext) {
        let devices = ctx.devices();
        let devices_msg = match devices {
            [device @ Device::Cpu] => device.to_string(),
            _ => format!("{} GPUs", devices.len()),
        };
        self.sink
            .info(&format!("Running LoggingListener on: {devices_msg}."));

        if let Some(engine) = ctx.engine() {
            self.sink.info(&format!(
                "Load {} Engine Version {} in {:.3} ms.",
                engine.name(),
                engine.version(),
                engine.load_time().as_secs_f64() * 1_000.0
            ));
        }
    }

    fn on_training_batch(&mut self, ctx: &TrainingContext) -> Result<()> {
        let status = self.training_status(ctx)?;
        let line = self.training_bar.advance(&status);
        self.sink.progress(&line);
        Ok(())
    }

    fn on_validation_batch(&mut self) {
        let line = self.validate_bar.advance("");
        self.sink.progress(&line);
    }

    fn on_epoch(&mut self, ctx: &TrainingContext) -> Result<()> {
        let metrics = ctx.metrics();
        self.sink.info(&format!("Epoch {} finished.", self.epochs));

        let train = evaluators_status(metrics, ctx.training_evaluators(), "train_")?;
        self.sink.info(&format!("Train: {train}"));

        if metrics.has_metric(&format!("validate_{}", ctx.loss_name())) {
            let validate = evaluators_status(metrics, ctx.validation_evaluators(), "validate_")?;
            self.sink.info(&format!("Validate: {validate}"));
        } else {
            self.sink.info("validation has not been run.");
        }

        self.epochs += 1;
        self.training_bar.reset();
        self.validate_bar.reset();
        Ok(())
    }

    fn on_training_end(&self, ctx: &TrainingContext) -> Result<()> {
        let metrics = ctx.metrics();
        self.sink
            .info(&format!("Training: {} batches", self.config.train_data_size));
        self.sink
            .info(&format!("Validation: {} batches", self.config.validate_data_size));

        for series in &self.config.summary_series {
            // A single-iteration run may never produce some timing series.
            if !metrics.has_metric(&series.name) {
                tracing::debug!(series = %series.name, "no observations, skipping summary");
                continue;
            }
            let line = self.timing_summary(metrics, series)?;
            self.sink.info(&line);
        }
        Ok(())
    }

    fn training_status(&self, ctx: &TrainingContext) -> Result<String> {
        let metrics = ctx.metrics();
        let mut parts = Vec::with_capacity(2);

        let evaluators = evaluators_status(metrics, ctx.training_evaluators(), "train_")?;
        if !evaluators.is_empty() {
            parts.push(evaluators);
        }

        if metrics.has_metric("train") {
            let batch_secs = metrics.latest("train")? / 1_000_000_000.0;
            if batch_secs > 0.0 {
                #[allow(clippy::cast_precision_loss)]
                let speed = self.config.batch_size as f64 / batch_secs;
                parts.push(format!("speed: {speed:.2} items/sec"));
            }
        }
        Ok(parts.join(", "))
    }

    fn timing_summary(&self, metrics: &Recorder, series: &SummarySeries) -> Result<String> {
        let summary = metrics.summary(&series.name, &self.config.summary_percentiles)?;
        let values: Vec<String> = summary
            .percentiles()
            .iter()
            .map(|&(p, nanos)| {
                format!(
                    "P{}: {:.3} {}",
                    percentile_label(p),
                    series.unit.from_nanos(nanos),
                    series.unit.suffix()
                )
            })
            .collect();
        Ok(format!("{} {}", series.name, values.join(", ")))
    }
}

impl TrainingListener for LoggingListener {
    fn on_event(&mut self, event: &TrainingEvent, ctx: &TrainingContext) -> Result<()> {
        match event {
            TrainingEvent::TrainBegin => self.on_training_begin(ctx),
            TrainingEvent::TrainBatch => self.on_training_batch(ctx)?,
            TrainingEvent::ValidateBatch => self.on_validation_batch(),
            TrainingEvent::EpochEnd => self.on_epoch(ctx)?,
            TrainingEvent::TrainEnd => self.on_training_end(ctx)?,
        }
        Ok(())
    }
}

impl std::fmt::Debug for LoggingListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingListener")
            .field("config", &self.config)
            .field("epochs", &self.epochs)
            .field("training_bar", &self.training_bar)
            .field("validate_bar", &self.validate_bar)
            .finish_non_exhaustive()
    }
}

/// `"<name>: <value>"` for each evaluator, latest values, two decimals to keep bars on one line.
fn evaluators_status(metrics: &Recorder, evaluators: &[String], prefix: &str) -> Result<String> {
    let outputs = evaluators
        .iter()
        .map(|name| -> Result<String> {
            let value = metrics.latest(&format!("{prefix}{name}"))?;
            Ok(format!("{name}: {value:.2}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(outputs.join(", "))
}

/// `50.0` -> `"50"`, `99.9` -> `"99.9"`.
fn percentile_label(p: f64) -> String {
    if p.fract() == 0.0 {
        format!("{p:.0}")
    } else {
        format!("{p}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{EngineInfo, MemorySink};
    use crate::Error;
    use std::time::Duration;

    fn listener(sink: &Arc<MemorySink>) -> LoggingListener {
        LoggingListener::new(ListenerConfig::new(32, 4, 2).progress_width(4), sink.clone())
    }

    #[test]
    fn test_percentile_label() {
        assert_eq!(percentile_label(50.0), "50");
        assert_eq!(percentile_label(99.9), "99.9");
    }

    #[test]
    fn test_training_begin_single_cpu() {
        let sink = Arc::new(MemorySink::new());
        let ctx = TrainingContext::builder(Arc::new(Recorder::new()))
            .engine(EngineInfo::new("Burn", "0.14.0", Duration::from_micros(1_500)))
            .build();

        listener(&sink)
            .on_event(&TrainingEvent::TrainBegin, &ctx)
            .unwrap();

        assert_eq!(
            sink.info_lines(),
            vec![
                "Running LoggingListener on: cpu().",
                "Load Burn Engine Version 0.14.0 in 1.500 ms.",
            ]
        );
    }

    #[test]
    fn test_training_begin_gpus() {
        let sink = Arc::new(MemorySink::new());
        let ctx = TrainingContext::builder(Arc::new(Recorder::new()))
            .devices(vec![Device::Gpu(0), Device::Gpu(1)])
            .build();

        listener(&sink)
            .on_event(&TrainingEvent::TrainBegin, &ctx)
            .unwrap();

        assert_eq!(sink.info_lines(), vec!["Running LoggingListener on: 2 GPUs."]);
    }

    #[test]
    fn test_training_batch_status_with_speed() {
        let sink = Arc::new(MemorySink::new());
        let recorder = Arc::new(Recorder::new());
        recorder.record("train_accuracy", 0.756);
        recorder.record("train", 500_000_000.0);
        let ctx = TrainingContext::builder(recorder)
            .training_evaluators(["accuracy"])
            .build();

        listener(&sink)
            .on_event(&TrainingEvent::TrainBatch, &ctx)
            .unwrap();

        assert_eq!(
            sink.progress_lines(),
            vec!["Training:  25% |=   | accuracy: 0.76, speed: 64.00 items/sec"]
        );
    }

    #[test]
    fn test_training_batch_missing_evaluator() {
        let sink = Arc::new(MemorySink::new());
        let ctx = TrainingContext::builder(Arc::new(Recorder::new()))
            .training_evaluators(["accuracy"])
            .build();

        let err = listener(&sink)
            .on_event(&TrainingEvent::TrainBatch, &ctx)
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(name) if name == "train_accuracy"));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_epoch_without_validation() {
        let sink = Arc::new(MemorySink::new());
        let ctx = TrainingContext::builder(Arc::new(Recorder::new())).build();
        let mut listener = listener(&sink);

        listener.on_event(&TrainingEvent::TrainBatch, &ctx).unwrap();
        listener.on_event(&TrainingEvent::EpochEnd, &ctx).unwrap();

        assert_eq!(listener.epochs(), 1);
        assert_eq!(listener.training_bar.position(), 0);
        assert_eq!(
            sink.info_lines(),
            vec!["Epoch 0 finished.", "Train: ", "validation has not been run."]
        );
    }

    #[test]
    fn test_training_end_skips_missing_series() {
        let sink = Arc::new(MemorySink::new());
        let recorder = Arc::new(Recorder::new());
        for ns in [1_000_000.0, 2_000_000.0, 3_000_000.0] {
            recorder.record("forward", ns);
        }
        recorder.record("epoch", 2_500_000_000.0);
        let ctx = TrainingContext::builder(recorder).build();

        listener(&sink)
            .on_event(&TrainingEvent::TrainEnd, &ctx)
            .unwrap();

        assert_eq!(
            sink.info_lines(),
            vec![
                "Training: 4 batches",
                "Validation: 2 batches",
                "forward P50: 2.000 ms, P90: 2.000 ms",
                "epoch P50: 2.500 s, P90: 2.500 s",
            ]
        );
    }
}
