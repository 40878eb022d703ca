//! Training Summary Demo
//!
//! Simulates a short training run: the "trainer" records per-batch timings
//! and evaluator scores, a `LoggingListener` reports progress through
//! `tracing`, and the run ends with P50/P90 summaries and a JSON snapshot.
//!
//! Run with: cargo run --example training_summary
//! Hide progress bars with: RUST_LOG=info,trueno_metrics::progress=off

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing_subscriber::EnvFilter;
use trueno_metrics::config::ListenerConfig;
use trueno_metrics::listener::{
    Device, EngineInfo, ListenerSet, LoggingListener, TracingSink, TrainingContext, TrainingEvent,
};
use trueno_metrics::metric::Recorder;

const EPOCHS: usize = 3;
const TRAIN_BATCHES: usize = 20;
const VALIDATE_BATCHES: usize = 5;
const BATCH_SIZE: usize = 64;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let recorder = Arc::new(Recorder::new());
    let ctx = TrainingContext::builder(Arc::clone(&recorder))
        .loss_name("loss")
        .training_evaluators(["accuracy", "loss"])
        .validation_evaluators(["accuracy", "loss"])
        .devices(vec![Device::Cpu])
        .engine(EngineInfo::new("Simulated", "0.1.0", Duration::from_micros(1_250)))
        .build();

    let config = ListenerConfig::new(BATCH_SIZE, TRAIN_BATCHES, VALIDATE_BATCHES);
    config.validate()?;
    let mut listeners =
        ListenerSet::new().with(LoggingListener::new(config, Arc::new(TracingSink)));

    let mut rng = rand::thread_rng();
    listeners.dispatch(TrainingEvent::TrainBegin, &ctx)?;

    for epoch in 0..EPOCHS {
        let epoch_timer = recorder.start_timer("epoch");

        for batch in 0..TRAIN_BATCHES {
            let forward = rng.gen_range(2_000_000.0..6_000_000.0);
            let backward = forward * rng.gen_range(1.5..2.5);
            let step = rng.gen_range(200_000.0..800_000.0);
            let metrics_time = rng.gen_range(50_000.0..150_000.0);

            recorder.record("forward", forward);
            recorder.record("backward", backward);
            recorder.record("step", step);
            recorder.record("training-metrics", metrics_time);
            recorder.record("train", forward + backward + step + metrics_time);

            #[allow(clippy::cast_precision_loss)]
            let progress = (epoch * TRAIN_BATCHES + batch) as f64 / (EPOCHS * TRAIN_BATCHES) as f64;
            recorder.record("train_accuracy", 0.5 + 0.45 * progress + rng.gen_range(-0.02..0.02));
            recorder.record("train_loss", 1.2 * (1.0 - progress) + rng.gen_range(0.0..0.05));

            listeners.dispatch(TrainingEvent::TrainBatch, &ctx)?;
        }

        for _ in 0..VALIDATE_BATCHES {
            recorder.record("validate_accuracy", rng.gen_range(0.6..0.9));
            recorder.record("validate_loss", rng.gen_range(0.2..0.6));
            listeners.dispatch(TrainingEvent::ValidateBatch, &ctx)?;
        }

        epoch_timer.stop();
        listeners.dispatch(TrainingEvent::EpochEnd, &ctx)?;
    }

    listeners.dispatch(TrainingEvent::TrainEnd, &ctx)?;

    let summary = recorder.summary("train", &[50.0, 90.0, 99.0])?;
    println!("\ntrain summary: {}", serde_json::to_string_pretty(&summary)?);
    println!(
        "snapshot: {} series, {} bytes of JSON",
        recorder.len(),
        recorder.snapshot().to_json()?.len()
    );

    Ok(())
}
