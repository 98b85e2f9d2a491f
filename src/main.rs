mod classify;
mod cli;
mod client;
mod config;
mod daemon;
mod engine;
mod inspect;
mod ipc;
mod poller;
mod sensitive;
mod snapshot;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

use config::{DaemonConfig, EngineConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Daemon {
            capacity,
            interval_ms,
            protect_sensitive,
            deny_apps,
        } => {
            let capacity = usize::try_from(capacity).unwrap_or_else(|_| {
                eprintln!("clippo daemon: --capacity value too large for this platform");
                std::process::exit(1);
            });
            let config = DaemonConfig {
                poll_interval: Duration::from_millis(interval_ms),
                engine: EngineConfig {
                    capacity,
                    protect_sensitive,
                    extra_denied_apps: deny_apps,
                },
            };
            if let Err(e) = daemon::run(config).await {
                tracing::error!(error = %e, "daemon failed");
                eprintln!("clippo daemon: {e}");
                std::process::exit(1);
            }
        }
        Command::Client { action } => {
            if let Err(e) = client::run(action).await {
                tracing::error!(error = %e, "client failed");
                eprintln!("clippo client: {e}");
                std::process::exit(1);
            }
        }
        Command::Inspect { text } => inspect::print(&text),
    }
}
