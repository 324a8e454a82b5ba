//! The `train` command: run the training stage or the canned example
//! pipeline.

use async_trait::async_trait;

use super::{Commandable, check_arity, invalid_sub_command, require_sub_command};
use crate::context::AppContext;
use crate::errors::CommandError;
use crate::grammar::{PresetValue, TrainCommand};
use crate::parser;
use crate::pipeline;

const MAIN: &str = "train";
const SHUFFLE_ALTERNATIVES: &str = "'shuffle' or no parameter at all";

pub struct Train;

#[async_trait]
impl Commandable for Train {
    async fn execute(&self, ctx: &AppContext, parameters: &[String]) -> Result<(), CommandError> {
        let token = require_sub_command(MAIN, TrainCommand::vocabulary(), parameters)?;
        let sub = TrainCommand::from_token(token)
            .ok_or_else(|| invalid_sub_command(MAIN, TrainCommand::vocabulary(), token))?;
        let rest = &parameters[1..];
        check_arity(MAIN, rest, 1)?;

        match sub {
            TrainCommand::Undefined => Ok(()),
            TrainCommand::Start => {
                let shuffle = resolve_shuffle(sub, rest, ctx.config.parameter_separator)?;
                pipeline::run_training(ctx, shuffle).await
            }
            TrainCommand::Example => {
                let shuffle = resolve_shuffle(sub, rest, ctx.config.parameter_separator)?;
                pipeline::run_example(ctx, shuffle).await
            }
        }
    }
}

/// The optional preset token must be `shuffle` or absent. The value half of
/// a composite token counts, so `preset=shuffle` works too.
fn resolve_shuffle(
    sub: TrainCommand,
    rest: &[String],
    parameter_separator: char,
) -> Result<bool, CommandError> {
    let Some(token) = rest.first() else {
        return Ok(false);
    };
    let value = parser::parameter_value(token, parameter_separator);

    match PresetValue::from_token(value) {
        Some(PresetValue::Shuffle) => Ok(true),
        Some(PresetValue::Undefined) => Ok(false),
        _ => Err(CommandError::InvalidPresetValue {
            main: MAIN,
            sub: sub.as_str(),
            value: value.to_string(),
            allowed: SHUFFLE_ALTERNATIVES,
        }),
    }
}
