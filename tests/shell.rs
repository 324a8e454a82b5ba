//! End-to-end runs of the command loop against a scratch directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use netbuilder::commands::CommandSet;
use netbuilder::context::{AppContext, ShellConfig};
use netbuilder::services::samples::Sample;
use netbuilder::shell;
use netbuilder::status::{self, ChannelToggles, RunClock, StatusEvent, StatusSource};
use tokio::sync::mpsc::UnboundedReceiver;

fn test_context(general: &Path) -> (Arc<AppContext>, UnboundedReceiver<StatusEvent>) {
    let config = ShellConfig::new(Some(general.to_path_buf()), false);
    let (events, rx) = status::channel();
    let ctx = Arc::new(AppContext::new(
        config,
        events,
        Arc::new(ChannelToggles::new()),
        Arc::new(RunClock::default()),
    ));
    (ctx, rx)
}

fn write_example_fixtures(example_dir: &Path) {
    let samples: Vec<Sample> = (0..20)
        .map(|i| {
            let on = i % 2 == 0;
            Sample {
                features: if on { vec![1.0, 0.0] } else { vec![0.0, 1.0] },
                target: if on { vec![1.0, 0.0] } else { vec![0.0, 1.0] },
            }
        })
        .collect();

    fs::create_dir_all(example_dir).unwrap();
    fs::write(
        example_dir.join("samples.json"),
        serde_json::to_string(&samples).unwrap(),
    )
    .unwrap();
    fs::write(
        example_dir.join("netpar.json"),
        r#"{"layers": [2, 4, 2], "weight_range": 0.5}"#,
    )
    .unwrap();
    fs::write(
        example_dir.join("trainerpar.json"),
        r#"{"learning_rate": 0.5, "epochs": 2}"#,
    )
    .unwrap();
}

#[tokio::test]
async fn example_training_runs_end_to_end_after_a_rejected_command() {
    let dir = tempdir().unwrap();
    let example_dir = dir.path().join("example");
    write_example_fixtures(&example_dir);

    let (ctx, mut rx) = test_context(dir.path());
    let commands = CommandSet::new();

    let input: &[u8] = b"bogus whatever\ntrain example shuffle\nexit\n";
    shell::run(ctx.clone(), &commands, input).await.unwrap();

    {
        let state = ctx.state.lock().await;
        assert!(state.samples.is_some());
        assert!(state.net.is_some());
        assert!(state.trained_net.is_some());
        assert!(example_dir.join("net1.json").exists());

        // 10% of 20 samples reserved for validation, none held out for test.
        let samples = state.samples.as_ref().unwrap();
        assert_eq!(samples.training.len(), 18);
        assert_eq!(samples.validation.len(), 2);
        assert_eq!(samples.test.len(), 0);
    }

    // The pipeline reported through every channel, in emission order per
    // source: sample load first, training bracketed by start/finish.
    drop(ctx);
    let mut trainer_messages = Vec::new();
    let mut saw_sample_load = false;
    while let Some(event) = rx.recv().await {
        match event.source {
            StatusSource::Trainer => trainer_messages.push(event.message),
            StatusSource::DataProvider => {
                if event.message.starts_with("Sample set loaded") {
                    assert!(trainer_messages.is_empty());
                    saw_sample_load = true;
                }
            }
            StatusSource::Initializer => {}
        }
    }
    assert!(saw_sample_load);
    assert!(trainer_messages.first().unwrap().starts_with("Training started"));
    assert!(trainer_messages.last().unwrap().starts_with("Training finished"));
    assert_eq!(trainer_messages.len(), 2 + 2);
}

#[tokio::test]
async fn start_retrains_and_parameters_save_compact_after_example() {
    let dir = tempdir().unwrap();
    let example_dir = dir.path().join("example");
    write_example_fixtures(&example_dir);

    let (ctx, _rx) = test_context(dir.path());
    let commands = CommandSet::new();

    let input: &[u8] = b"train example\ntrain start shuffle\nsave par no\nexit\n";
    shell::run(ctx.clone(), &commands, input).await.unwrap();

    let state = ctx.state.lock().await;
    assert!(state.trained_net.is_some());

    let netpar = fs::read_to_string(example_dir.join("netpar.json")).unwrap();
    assert!(!netpar.contains('\n'), "save par no should write compact JSON");
    let trainerpar = fs::read_to_string(example_dir.join("trainerpar.json")).unwrap();
    assert!(!trainerpar.contains('\n'));
}

#[tokio::test]
async fn a_declined_pipeline_leaves_no_artifacts_and_no_error() {
    let dir = tempdir().unwrap();

    let (ctx, _rx) = test_context(dir.path());
    let commands = CommandSet::new();

    let input: &[u8] = b"train example\nexit\n";
    shell::run(ctx.clone(), &commands, input).await.unwrap();

    let state = ctx.state.lock().await;
    assert!(state.samples.is_none());
    assert!(state.net.is_none());
    assert!(state.trainer.is_none());
    assert!(!dir.path().join("example").join("net1.json").exists());
}
