//! Process-wide application state, constructed once in `main` and passed to
//! every command handler.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::grammar::{PARAMETER_SEPARATOR, TOKEN_SEPARATOR};
use crate::services::network::Network;
use crate::services::params::{NetParameters, TrainerParameters};
use crate::services::paths::PathBuilder;
use crate::services::samples::SampleSet;
use crate::services::trainer::Trainer;
use crate::status::{ChannelToggles, RunClock, StatusSender};

/// Static shell settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub token_separator: char,
    pub parameter_separator: char,
    pub general_dir: PathBuf,
    pub verbose: bool,
}

impl ShellConfig {
    pub fn new(general_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            token_separator: TOKEN_SEPARATOR,
            parameter_separator: PARAMETER_SEPARATOR,
            general_dir: general_dir.unwrap_or_else(default_general_dir),
            verbose,
        }
    }

    /// Directory the canned example pipeline works in.
    pub fn example_dir(&self) -> PathBuf {
        self.general_dir.join("example")
    }
}

fn default_general_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".netbuilder").join("saves"))
        .unwrap_or_else(|| PathBuf::from("saves"))
}

/// The working state of one training run, evolved stage by stage. Exactly
/// one pipeline mutates it at a time; the mutex in [`AppContext`] enforces
/// that.
#[derive(Debug)]
pub struct PipelineState {
    pub paths: PathBuilder,
    pub samples: Option<SampleSet>,
    pub net_parameters: Option<NetParameters>,
    pub net: Option<Network>,
    pub trained_net: Option<Network>,
    pub trainer_parameters: Option<TrainerParameters>,
    pub trainer: Option<Trainer>,
}

impl PipelineState {
    pub fn new(paths: PathBuilder) -> Self {
        Self {
            paths,
            samples: None,
            net_parameters: None,
            net: None,
            trained_net: None,
            trainer_parameters: None,
            trainer: None,
        }
    }
}

/// Everything a command handler needs: configuration, the pipeline state,
/// the status bus and the run clock.
pub struct AppContext {
    pub config: ShellConfig,
    pub state: Mutex<PipelineState>,
    pub events: StatusSender,
    pub toggles: Arc<ChannelToggles>,
    pub clock: Arc<RunClock>,
}

impl AppContext {
    pub fn new(
        config: ShellConfig,
        events: StatusSender,
        toggles: Arc<ChannelToggles>,
        clock: Arc<RunClock>,
    ) -> Self {
        let paths = PathBuilder::new(config.general_dir.clone());
        Self {
            config,
            state: Mutex::new(PipelineState::new(paths)),
            events,
            toggles,
            clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status;

    #[test]
    fn config_uses_the_default_separators() {
        let config = ShellConfig::new(Some(PathBuf::from("/data")), false);
        assert_eq!(config.token_separator, ' ');
        assert_eq!(config.parameter_separator, '=');
        assert_eq!(config.example_dir(), PathBuf::from("/data/example"));
    }

    #[tokio::test]
    async fn context_starts_with_an_empty_pipeline_state() {
        let config = ShellConfig::new(Some(PathBuf::from("/data")), false);
        let (events, _rx) = status::channel();
        let ctx = AppContext::new(
            config,
            events,
            Arc::new(ChannelToggles::new()),
            Arc::new(RunClock::default()),
        );

        let state = ctx.state.lock().await;
        assert!(state.samples.is_none());
        assert!(state.net.is_none());
        assert!(state.trainer.is_none());
        assert_eq!(state.paths.general(), PathBuf::from("/data"));
    }
}
