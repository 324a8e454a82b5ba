//! Typed error taxonomy for command validation and dispatch.
//!
//! Everything here is user-facing and recoverable: the command loop prints
//! the message and reads the next line. A declined pipeline stage is not an
//! error and never appears here; collaborator faults are wrapped in
//! [`CommandError::Fault`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("'{token}' is not a valid command. Valid commands are: {vocabulary}.")]
    InvalidCommand { token: String, vocabulary: String },

    #[error(
        "The main command {main} must be followed by one of the following sub commands: {vocabulary}."
    )]
    MissingSubCommand {
        main: &'static str,
        vocabulary: String,
    },

    #[error("'{token}' is not a valid sub command of {main}. Valid sub commands are: {vocabulary}.")]
    InvalidSubCommand {
        main: &'static str,
        token: String,
        vocabulary: String,
    },

    #[error(
        "The main command {main} must be followed by a sub command and, for some sub commands, a single optional parameter. Anything else is invalid."
    )]
    InvalidParameterCount { main: &'static str },

    #[error("{value} is not a valid parameter for {main} {sub}. Use {allowed}.")]
    InvalidPresetValue {
        main: &'static str,
        sub: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("'{token}' is not a valid parameter name.")]
    InvalidParameterName { token: String },

    #[error("Cannot parse {value} into an integer.")]
    MalformedParameterValue { value: String },

    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}
