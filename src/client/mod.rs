//! CLI client for a running daemon.
//!
//! `list`, `clear` and `select` perform one request and exit. `watch`
//! subscribes and prints events until the daemon goes away.

mod daemon_client;
mod format;

use crate::cli::ClientAction;
use daemon_client::DaemonClient;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("daemon: {0}")]
    Daemon(String),
}

/// Run the client command. Called from `main.rs` for `Command::Client`.
pub async fn run(action: ClientAction) -> Result<(), ClientError> {
    let mut daemon = DaemonClient::connect().await?;

    match action {
        ClientAction::List => {
            let items = daemon.list_history().await?;
            format::print_history(&items);
        }
        ClientAction::Clear => {
            daemon.clear().await?;
            format::print_cleared();
        }
        ClientAction::Select { index } => {
            let item = daemon.select(index).await?;
            format::print_selected(index, &item);
        }
        ClientAction::Watch => {
            let items = daemon.list_history().await?;
            format::print_history(&items);
            daemon.subscribe().await?;
            while let Some(event) = daemon.next_event().await? {
                format::print_event(&event);
            }
        }
    }

    Ok(())
}
