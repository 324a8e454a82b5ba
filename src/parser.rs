//! Splits raw console input into a typed invocation.
//!
//! The first token resolves against the main-command vocabulary; all
//! remaining tokens are handed to the command handler unresolved. Parameter
//! tokens may be composite (`name=value`): the value half is the last
//! segment, so a bare token is its own value.

use crate::errors::CommandError;
use crate::grammar::{MainCommand, ParameterName};

/// One parsed input line: the resolved main command and the raw parameter
/// tokens that followed it. Created once per line, discarded after dispatch.
#[derive(Debug)]
pub struct ParsedInvocation {
    pub command: MainCommand,
    pub parameters: Vec<String>,
}

impl ParsedInvocation {
    /// Split `line` on `token_separator`, dropping empty tokens, and resolve
    /// the first token as the main command.
    pub fn parse(line: &str, token_separator: char) -> Result<Self, CommandError> {
        let mut tokens = line.split(token_separator).filter(|token| !token.is_empty());

        let first = tokens.next().unwrap_or_default();
        let command = MainCommand::from_token(first).ok_or_else(|| CommandError::InvalidCommand {
            token: first.to_string(),
            vocabulary: MainCommand::vocabulary().join(", "),
        })?;

        Ok(Self {
            command,
            parameters: tokens.map(str::to_string).collect(),
        })
    }
}

/// Resolve the name half of a composite parameter token.
pub fn parameter_name(token: &str, separator: char) -> Result<ParameterName, CommandError> {
    let name = token.split(separator).next().unwrap_or(token);
    ParameterName::from_token(name).ok_or_else(|| CommandError::InvalidParameterName {
        token: name.to_string(),
    })
}

/// The value half of a composite parameter token. A token without the
/// separator is its own value.
pub fn parameter_value(token: &str, separator: char) -> &str {
    token.rsplit(separator).next().unwrap_or(token)
}

/// The value half of a composite parameter token, parsed as an integer.
pub fn parameter_value_int(token: &str, separator: char) -> Result<i64, CommandError> {
    let value = parameter_value(token, separator);
    value
        .parse()
        .map_err(|_| CommandError::MalformedParameterValue {
            value: value.to_string(),
        })
}
