use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use netbuilder::commands::{CommandSet, show};
use netbuilder::context::{AppContext, ShellConfig};
use netbuilder::shell;
use netbuilder::status::{self, ChannelToggles, RunClock};

#[derive(Parser)]
#[command(name = "netbuilder")]
#[command(version, about = "Console shell for building and training neural networks")]
struct Cli {
    /// Base directory for saved artifacts (sample sets, nets, parameter files)
    #[arg(long)]
    general_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ShellConfig::new(cli.general_dir, cli.verbose);
    let toggles = Arc::new(ChannelToggles::new());
    let clock = Arc::new(RunClock::default());
    let (events, rx) = status::channel();
    let sink = status::spawn_sink(rx, toggles.clone(), clock.clone());

    let ctx = Arc::new(AppContext::new(config, events, toggles, clock));
    let commands = CommandSet::new();

    show::print_help();
    show::print_settings(&ctx).await;

    let stdin = BufReader::new(tokio::io::stdin());
    shell::run(ctx.clone(), &commands, stdin).await?;

    // Dropping the last sender closes the channel and lets the sink drain.
    drop(ctx);
    let _ = sink.await;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "netbuilder=debug"
    } else {
        "netbuilder=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
