use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_CAPACITY, DEFAULT_POLL_INTERVAL};

#[derive(Parser)]
#[command(name = "clippo", about = "Clipboard history daemon")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the clipboard history daemon
    Daemon {
        /// Number of history entries kept
        #[arg(
            long,
            default_value_t = DEFAULT_CAPACITY as u32,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        capacity: u32,

        /// Clipboard poll interval in milliseconds
        #[arg(
            long,
            default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64,
            value_parser = clap::value_parser!(u64).range(10..)
        )]
        interval_ms: u64,

        /// Ignore copied text that looks like a password or API key
        #[arg(long)]
        protect_sensitive: bool,

        /// Also ignore copies from this application (X11 WM_CLASS); repeatable
        #[arg(long = "deny-app", value_name = "APP")]
        deny_apps: Vec<String>,
    },

    /// Talk to a running daemon
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    /// Show how a string would be classified, without a daemon
    Inspect {
        /// Text to inspect
        text: String,
    },
}

#[derive(Subcommand)]
pub enum ClientAction {
    /// List history, newest first
    List,
    /// Empty the history
    Clear,
    /// Put the entry at INDEX back on the clipboard
    Select {
        /// Position in the list (0 = newest)
        index: u32,
    },
    /// Print history changes and ignored copies as they happen
    Watch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn daemon_defaults() {
        let cli = Cli::try_parse_from(["clippo", "daemon"]).unwrap();
        match cli.command {
            Command::Daemon {
                capacity,
                interval_ms,
                protect_sensitive,
                deny_apps,
            } => {
                assert_eq!(capacity as usize, DEFAULT_CAPACITY);
                assert_eq!(u128::from(interval_ms), DEFAULT_POLL_INTERVAL.as_millis());
                assert!(!protect_sensitive);
                assert!(deny_apps.is_empty());
            }
            _ => panic!("expected daemon"),
        }
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(Cli::try_parse_from(["clippo", "daemon", "--capacity", "0"]).is_err());
    }

    #[test]
    fn deny_app_repeats() {
        let cli = Cli::try_parse_from([
            "clippo",
            "daemon",
            "--deny-app",
            "Vault",
            "--deny-app",
            "pass",
        ])
        .unwrap();
        match cli.command {
            Command::Daemon { deny_apps, .. } => assert_eq!(deny_apps, vec!["Vault", "pass"]),
            _ => panic!("expected daemon"),
        }
    }

    #[test]
    fn client_select_index() {
        let cli = Cli::try_parse_from(["clippo", "client", "select", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Client {
                action: ClientAction::Select { index: 2 }
            }
        ));
    }
}
