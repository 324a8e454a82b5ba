//! Command handlers, one per main command, resolved through a dispatch
//! table built at startup.
//!
//! Every handler follows the same contract: require a sub-command token,
//! resolve it against its own vocabulary, check the arity of what remains,
//! then dispatch. All validation happens before any pipeline stage runs.

pub mod log;
pub mod save;
pub mod show;
pub mod train;

use async_trait::async_trait;

use crate::context::AppContext;
use crate::errors::CommandError;
use crate::grammar::MainCommand;

#[async_trait]
pub trait Commandable: Send + Sync {
    async fn execute(&self, ctx: &AppContext, parameters: &[String]) -> Result<(), CommandError>;
}

/// Dispatch table from main command to handler. `exit` has no handler; the
/// command loop intercepts it before dispatch.
pub struct CommandSet {
    save: save::Save,
    train: train::Train,
    log: log::Log,
    show: show::Show,
}

impl CommandSet {
    pub fn new() -> Self {
        Self {
            save: save::Save,
            train: train::Train,
            log: log::Log,
            show: show::Show,
        }
    }

    pub fn resolve(&self, command: MainCommand) -> Option<&dyn Commandable> {
        match command {
            MainCommand::Save => Some(&self.save),
            MainCommand::Train => Some(&self.train),
            MainCommand::Log => Some(&self.log),
            MainCommand::Show => Some(&self.show),
            MainCommand::Exit => None,
        }
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::new()
    }
}

/// First parameter token, or the `MissingSubCommand` error naming the full
/// sub-command vocabulary of `main`.
fn require_sub_command<'a>(
    main: &'static str,
    vocabulary: &'static [&'static str],
    parameters: &'a [String],
) -> Result<&'a str, CommandError> {
    parameters
        .first()
        .map(String::as_str)
        .ok_or_else(|| CommandError::MissingSubCommand {
            main,
            vocabulary: vocabulary.join(", "),
        })
}

fn invalid_sub_command(
    main: &'static str,
    vocabulary: &'static [&'static str],
    token: &str,
) -> CommandError {
    CommandError::InvalidSubCommand {
        main,
        token: token.to_string(),
        vocabulary: vocabulary.join(", "),
    }
}

/// Enforce a sub-command's arity rule: at most `max` tokens may follow it.
fn check_arity(main: &'static str, rest: &[String], max: usize) -> Result<(), CommandError> {
    if rest.len() > max {
        return Err(CommandError::InvalidParameterCount { main });
    }
    Ok(())
}
