//! The `save` command: persist the current sample set, nets and parameter
//! files.

use async_trait::async_trait;

use super::{Commandable, check_arity, invalid_sub_command, require_sub_command};
use crate::context::{AppContext, PipelineState};
use crate::errors::CommandError;
use crate::grammar::{PresetValue, SaveCommand};
use crate::parser;
use crate::services::params::Formatting;
use crate::status::StatusSender;

const MAIN: &str = "save";
const FORMATTING_ALTERNATIVES: &str = "'indented', 'no' or no parameter at all";

pub struct Save;

#[async_trait]
impl Commandable for Save {
    async fn execute(&self, ctx: &AppContext, parameters: &[String]) -> Result<(), CommandError> {
        let token = require_sub_command(MAIN, SaveCommand::vocabulary(), parameters)?;
        let sub = SaveCommand::from_token(token)
            .ok_or_else(|| invalid_sub_command(MAIN, SaveCommand::vocabulary(), token))?;
        let rest = &parameters[1..];

        match sub {
            SaveCommand::All => {
                check_arity(MAIN, rest, 0)?;
                let state = ctx.state.lock().await;
                save_sample_set(&state, &ctx.events)?;
                save_initialized_net(&state, &ctx.events)?;
                save_trained_net(&state, &ctx.events)?;
            }
            SaveCommand::Net0 => {
                check_arity(MAIN, rest, 0)?;
                let state = ctx.state.lock().await;
                save_initialized_net(&state, &ctx.events)?;
            }
            SaveCommand::Net1 => {
                check_arity(MAIN, rest, 0)?;
                let state = ctx.state.lock().await;
                save_trained_net(&state, &ctx.events)?;
            }
            SaveCommand::Samples => {
                check_arity(MAIN, rest, 0)?;
                let state = ctx.state.lock().await;
                save_sample_set(&state, &ctx.events)?;
            }
            SaveCommand::Par => {
                check_arity(MAIN, rest, 1)?;
                let formatting = resolve_formatting(sub, rest, ctx.config.parameter_separator)?;
                let state = ctx.state.lock().await;
                save_net_parameters(&state, formatting, &ctx.events)?;
                save_trainer_parameters(&state, formatting, &ctx.events)?;
            }
            SaveCommand::NetPar => {
                check_arity(MAIN, rest, 1)?;
                let formatting = resolve_formatting(sub, rest, ctx.config.parameter_separator)?;
                let state = ctx.state.lock().await;
                save_net_parameters(&state, formatting, &ctx.events)?;
            }
            SaveCommand::TrainerPar => {
                check_arity(MAIN, rest, 1)?;
                let formatting = resolve_formatting(sub, rest, ctx.config.parameter_separator)?;
                let state = ctx.state.lock().await;
                save_trainer_parameters(&state, formatting, &ctx.events)?;
            }
        }
        Ok(())
    }
}

/// Map the optional preset token to an output format. No token selects
/// pretty-printed output, like an explicit `indented`.
fn resolve_formatting(
    sub: SaveCommand,
    rest: &[String],
    parameter_separator: char,
) -> Result<Formatting, CommandError> {
    let Some(token) = rest.first() else {
        return Ok(Formatting::Indented);
    };
    let value = parser::parameter_value(token, parameter_separator);

    PresetValue::from_token(value)
        .and_then(Formatting::from_preset)
        .ok_or_else(|| CommandError::InvalidPresetValue {
            main: MAIN,
            sub: sub.as_str(),
            value: value.to_string(),
            allowed: FORMATTING_ALTERNATIVES,
        })
}

fn save_sample_set(state: &PipelineState, events: &StatusSender) -> Result<(), CommandError> {
    let samples = state
        .samples
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No sample set loaded; nothing to save."))?;
    samples.save(&state.paths.sample_set(), events)?;
    Ok(())
}

fn save_initialized_net(state: &PipelineState, events: &StatusSender) -> Result<(), CommandError> {
    let net = state
        .net
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No net created; nothing to save."))?;
    let path = state.paths.initialized_net();
    net.save(&path)?;
    events.initializer(format!("Initialized net saved to {}.", path.display()));
    Ok(())
}

fn save_trained_net(state: &PipelineState, events: &StatusSender) -> Result<(), CommandError> {
    let net = state
        .trained_net
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No trained net available. Train first."))?;
    let path = state.paths.trained_net();
    net.save(&path)?;
    events.initializer(format!("Trained net saved to {}.", path.display()));
    Ok(())
}

fn save_net_parameters(
    state: &PipelineState,
    formatting: Formatting,
    events: &StatusSender,
) -> Result<(), CommandError> {
    let parameters = state
        .net_parameters
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No net parameters loaded; nothing to save."))?;
    parameters.save(&state.paths.net_parameters(), formatting, events)?;
    Ok(())
}

fn save_trainer_parameters(
    state: &PipelineState,
    formatting: Formatting,
    events: &StatusSender,
) -> Result<(), CommandError> {
    let parameters = state
        .trainer_parameters
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No trainer parameters loaded; nothing to save."))?;
    parameters.save(&state.paths.trainer_parameters(), formatting, events)?;
    Ok(())
}

/// Reload a just-saved parameter file, for checks that saving does not alter
/// the payload.
#[cfg(test)]
fn reload_net_parameters(
    state: &PipelineState,
    events: &StatusSender,
) -> crate::pipeline::outcome::StageOutcome<crate::services::params::NetParameters> {
    crate::services::params::NetParameters::load(&state.paths.net_parameters(), events)
        .expect("reload should not fault")
}
