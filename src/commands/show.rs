//! The `show` command: the help banner, current settings and the net
//! summary. The startup banner reuses the same printers.

use async_trait::async_trait;
use console::style;

use super::{Commandable, check_arity, invalid_sub_command, require_sub_command};
use crate::context::{AppContext, PipelineState};
use crate::errors::CommandError;
use crate::grammar::ShowCommand;
use crate::status::StatusSource;

const MAIN: &str = "show";

pub struct Show;

#[async_trait]
impl Commandable for Show {
    async fn execute(&self, ctx: &AppContext, parameters: &[String]) -> Result<(), CommandError> {
        let token = require_sub_command(MAIN, ShowCommand::vocabulary(), parameters)?;
        let sub = ShowCommand::from_token(token)
            .ok_or_else(|| invalid_sub_command(MAIN, ShowCommand::vocabulary(), token))?;
        check_arity(MAIN, &parameters[1..], 0)?;

        match sub {
            ShowCommand::Help => print_help(),
            ShowCommand::Settings => print_settings(ctx).await,
            ShowCommand::Net => {
                let state = ctx.state.lock().await;
                println!("{}", net_summary(&state));
            }
        }
        Ok(())
    }
}

pub fn print_help() {
    println!("{}", style("Commands").bold());
    println!("  save  all | net0 | net1 | samples | par | netpar | trainerpar [indented|no]");
    println!("  train start | example | undefined [shuffle]");
    println!("  log   on | off");
    println!("  show  help | settings | net");
    println!("  exit");
    println!(
        "{}",
        style("One command per line; tokens separated by spaces.").dim()
    );
}

pub async fn print_settings(ctx: &AppContext) {
    let state = ctx.state.lock().await;
    println!("{}", style("Settings").bold());
    println!("  general dir        {}", state.paths.general().display());
    println!("  sample set         {}", state.paths.sample_set().display());
    println!("  initialized net    {}", state.paths.initialized_net().display());
    println!("  trained net        {}", state.paths.trained_net().display());
    println!("  net parameters     {}", state.paths.net_parameters().display());
    println!(
        "  trainer parameters {}",
        state.paths.trainer_parameters().display()
    );
    println!(
        "  status channels    initializer {} | data provider {} | trainer {}",
        on_off(ctx.toggles.is_enabled(StatusSource::Initializer)),
        on_off(ctx.toggles.is_enabled(StatusSource::DataProvider)),
        on_off(ctx.toggles.is_enabled(StatusSource::Trainer)),
    );
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// One-line description of the current nets, shown by `show net` and after
/// the example pipeline constructs its network.
pub fn net_summary(state: &PipelineState) -> String {
    match (&state.net, &state.trained_net) {
        (None, _) => "No net created.".to_string(),
        (Some(net), None) => format!("Net: {}.", net.summary()),
        (Some(net), Some(_)) => format!("Net: {} (trained copy available).", net.summary()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ShellConfig;
    use crate::services::network::Network;
    use crate::services::params::NetParameters;
    use crate::services::paths::PathBuilder;
    use crate::status::{self, ChannelToggles, RunClock};
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

    #[test]
    fn net_summary_reports_a_missing_net() {
        let state = PipelineState::new(PathBuilder::new(PathBuf::from("/tmp")));
        assert_eq!(net_summary(&state), "No net created.");
    }

    #[test]
    fn net_summary_reports_layer_sizes() {
        let mut state = PipelineState::new(PathBuilder::new(PathBuf::from("/tmp")));
        let net = Network::create(&NetParameters {
            layers: vec![2, 4, 2],
            weight_range: 0.5,
        });
        state.net = Some(net.clone());
        assert!(net_summary(&state).contains("[2, 4, 2]"));

        state.trained_net = Some(net);
        assert!(net_summary(&state).contains("trained copy"));
    }

    #[tokio::test]
    async fn show_requires_a_known_sub_command() {
        let ctx = test_context();
        let err = Show.execute(&ctx, &["nets".to_string()]).await.unwrap_err();
        assert!(matches!(err, CommandError::InvalidSubCommand { .. }));
    }

    #[tokio::test]
    async fn show_net_executes_without_a_net() {
        let ctx = test_context();
        Show.execute(&ctx, &["net".to_string()]).await.unwrap();
    }
}
