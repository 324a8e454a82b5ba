//! The `log` command: switch the status-event channels on or off in one go.

use async_trait::async_trait;
use tracing::info;

use super::{Commandable, check_arity, invalid_sub_command, require_sub_command};
use crate::context::AppContext;
use crate::errors::CommandError;
use crate::grammar::LogCommand;

const MAIN: &str = "log";

pub struct Log;

#[async_trait]
impl Commandable for Log {
    async fn execute(&self, ctx: &AppContext, parameters: &[String]) -> Result<(), CommandError> {
        let token = require_sub_command(MAIN, LogCommand::vocabulary(), parameters)?;
        let sub = LogCommand::from_token(token)
            .ok_or_else(|| invalid_sub_command(MAIN, LogCommand::vocabulary(), token))?;
        check_arity(MAIN, &parameters[1..], 0)?;

        match sub {
            LogCommand::On => {
                ctx.toggles.set_all(true);
                info!("status logging enabled");
                println!("Logging on.");
            }
            LogCommand::Off => {
                ctx.toggles.set_all(false);
                info!("status logging disabled");
                println!("Logging off.");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ShellConfig;
    use crate::status::{self, ChannelToggles, RunClock, StatusSource};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn test_context() -> AppContext {
        let config = ShellConfig::new(Some(PathBuf::from("/tmp")), false);
        let (events, _rx) = status::channel();
        AppContext::new(
            config,
            events,
            Arc::new(ChannelToggles::new()),
            Arc::new(RunClock::default()),
        )
    }

    #[tokio::test]
    async fn on_enables_every_channel() {
        let ctx = test_context();
        assert!(!ctx.toggles.is_enabled(StatusSource::Trainer));

        Log.execute(&ctx, &["on".to_string()]).await.unwrap();
        assert!(ctx.toggles.is_enabled(StatusSource::Initializer));
        assert!(ctx.toggles.is_enabled(StatusSource::DataProvider));
        assert!(ctx.toggles.is_enabled(StatusSource::Trainer));
    }

    #[tokio::test]
    async fn off_disables_every_channel() {
        let ctx = test_context();
        Log.execute(&ctx, &["off".to_string()]).await.unwrap();
        assert!(!ctx.toggles.is_enabled(StatusSource::Initializer));
        assert!(!ctx.toggles.is_enabled(StatusSource::DataProvider));
        assert!(!ctx.toggles.is_enabled(StatusSource::Trainer));
    }

    #[tokio::test]
    async fn unknown_sub_command_is_rejected() {
        let ctx = test_context();
        let err = Log.execute(&ctx, &["loud".to_string()]).await.unwrap_err();
        assert!(matches!(err, CommandError::InvalidSubCommand { .. }));
    }

    #[tokio::test]
    async fn log_takes_no_extra_tokens() {
        let ctx = test_context();
        let err = Log
            .execute(&ctx, &["on".to_string(), "extra".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidParameterCount { .. }));
    }
}
