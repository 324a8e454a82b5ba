//! Sequences the dependent pipeline stages.
//!
//! Every checkpointed stage returns a [`StageOutcome`]; a declination aborts
//! the remaining stages immediately and silently. Faults propagate to the
//! command loop instead.

pub mod outcome;

use tracing::debug;

use crate::commands::show;
use crate::context::{AppContext, PipelineState};
use crate::errors::CommandError;
use crate::services::network::Network;
use crate::services::params::{NetParameters, TrainerParameters};
use crate::services::samples::SampleSet;
use crate::services::trainer::Trainer;
use crate::status::{StatusSender, StatusSource};
use outcome::StageOutcome;

/// Fraction of the example sample file reserved for validation.
const EXAMPLE_VALIDATION_FRACTION: f64 = 0.1;
/// Fraction of the example sample file held out as a test partition.
const EXAMPLE_TEST_FRACTION: f64 = 0.0;

/// The canned `train example` pipeline: reset paths, then load samples,
/// build net and trainer from their parameter files, wire trainer status,
/// display the net, switch logging on and train.
pub async fn run_example(ctx: &AppContext, shuffle: bool) -> Result<(), CommandError> {
    let mut state = ctx.state.lock().await;

    state.paths.reset();
    state.paths.set_general(ctx.config.example_dir());

    let samples = match SampleSet::load(
        &state.paths.sample_set(),
        EXAMPLE_VALIDATION_FRACTION,
        EXAMPLE_TEST_FRACTION,
        &ctx.events,
    )? {
        StageOutcome::Proceed(samples) => samples,
        StageOutcome::Declined(reason) => return declined("load sample set", reason),
    };
    state.samples = Some(samples);

    let net_parameters = match NetParameters::load(&state.paths.net_parameters(), &ctx.events)? {
        StageOutcome::Proceed(parameters) => parameters,
        StageOutcome::Declined(reason) => return declined("load net parameters", reason),
    };
    state.net_parameters = Some(net_parameters);

    let net = match create_net(&state, &ctx.events) {
        StageOutcome::Proceed(net) => net,
        StageOutcome::Declined(reason) => return declined("create net", reason),
    };
    state.net = Some(net);
    state.trained_net = None;

    let trainer_parameters =
        match TrainerParameters::load(&state.paths.trainer_parameters(), &ctx.events)? {
            StageOutcome::Proceed(parameters) => parameters,
            StageOutcome::Declined(reason) => return declined("load trainer parameters", reason),
        };
    state.trainer_parameters = Some(trainer_parameters);

    let trainer = match create_trainer(&state, &ctx.events) {
        StageOutcome::Proceed(trainer) => trainer,
        StageOutcome::Declined(reason) => return declined("create trainer", reason),
    };
    state.trainer = Some(trainer);

    ctx.toggles.enable(StatusSource::Trainer);
    println!("{}", show::net_summary(&state));
    ctx.toggles.set_all(true);

    train_and_persist(ctx, &mut state, shuffle).await
}

/// The `train start` sub-pipeline against the already-populated state.
pub async fn run_training(ctx: &AppContext, shuffle: bool) -> Result<(), CommandError> {
    let mut state = ctx.state.lock().await;
    train_and_persist(ctx, &mut state, shuffle).await
}

async fn train_and_persist(
    ctx: &AppContext,
    state: &mut PipelineState,
    shuffle: bool,
) -> Result<(), CommandError> {
    let net = state
        .net
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No net created. Load net parameters and create a net first."))?;
    let samples = state
        .samples
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No sample set loaded."))?;
    let trainer = state.trainer.as_ref().ok_or_else(|| {
        anyhow::anyhow!("No trainer created. Load trainer parameters and create a trainer first.")
    })?;

    ctx.clock.reset();
    ctx.clock.start();
    let trained = trainer.train(net, samples, shuffle, &ctx.events).await?;
    ctx.clock.stop();

    let path = state.paths.trained_net();
    trained.save(&path)?;
    ctx.events
        .initializer(format!("Trained net saved to {}.", path.display()));
    state.trained_net = Some(trained);
    Ok(())
}

fn create_net(state: &PipelineState, events: &StatusSender) -> StageOutcome<Network> {
    let Some(parameters) = state.net_parameters.as_ref() else {
        events.initializer("No net parameters loaded.");
        return StageOutcome::declined("no net parameters loaded");
    };
    if parameters.layers.len() < 2 {
        events.initializer("Net parameters must define at least an input and an output layer.");
        return StageOutcome::declined("fewer than two layers");
    }

    let net = Network::create(parameters);
    events.initializer(format!("Net created: {}.", net.summary()));
    StageOutcome::Proceed(net)
}

fn create_trainer(state: &PipelineState, events: &StatusSender) -> StageOutcome<Trainer> {
    let Some(parameters) = state.trainer_parameters.as_ref() else {
        events.initializer("No trainer parameters loaded.");
        return StageOutcome::declined("no trainer parameters loaded");
    };
    let Some(net) = state.net.as_ref() else {
        events.initializer("No net created.");
        return StageOutcome::declined("no net created");
    };
    let Some(samples) = state.samples.as_ref() else {
        events.data_provider("No sample set loaded.");
        return StageOutcome::declined("no sample set loaded");
    };

    Trainer::create(parameters, net, samples, events)
}

fn declined(stage: &str, reason: String) -> Result<(), CommandError> {
    debug!(stage, %reason, "pipeline stage declined, remaining stages skipped");
    Ok(())
}
