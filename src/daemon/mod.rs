//! Clipboard history daemon.
//!
//! A single daemon loop owns the [`Engine`], so all history mutation
//! happens on one sequential timeline. Clipboard I/O runs on the
//! [`worker`] thread, which hands snapshots and write-back results to
//! the loop. Connection tasks forward requests over an mpsc channel
//! with a oneshot reply; history changes and suppressions fan out to
//! subscribers over a broadcast channel.
//!
//! Socket at `$XDG_RUNTIME_DIR/clippo/daemon.sock`, directory mode 0700.
//! History lives in memory only and is cleared on shutdown.

mod connection;
mod handler;
mod worker;

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};
use tokio::time::MissedTickBehavior;

use connection::{DaemonCommand, Reply};
use handler::Effect;
use worker::{ClipboardEvent, ClipboardRequest, PendingRestore};

use crate::config::DaemonConfig;
use crate::engine::{Engine, EngineAction};
use crate::ipc;
use crate::ipc::protocol::Message;
use crate::poller::Poller;
use crate::snapshot::x11::XclipClipboard;
use crate::snapshot::{ClipboardWriter, SnapshotError, SnapshotReader};

/// Buffered events per subscriber before it starts lagging.
const EVENT_BUFFER: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("$XDG_RUNTIME_DIR is not set")]
    NoRuntimeDir,
    #[error("daemon already running at {0}")]
    AlreadyRunning(PathBuf),
    #[error("failed to create directory {path}: {source}")]
    MkdirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to bind socket {path}: {source}")]
    BindFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("clipboard setup failed: {0}")]
    ClipboardSetup(#[from] tokio::task::JoinError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the daemon against the X11 clipboard until SIGTERM or SIGINT.
///
/// # Errors
///
/// Returns `DaemonError` if `$XDG_RUNTIME_DIR` is unset, the socket
/// cannot be bound, another daemon is already running, or the clipboard
/// adapter cannot be started.
pub async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    let socket_path = ipc::socket_path().ok_or(DaemonError::NoRuntimeDir)?;
    let listener = bind_socket(&socket_path).await?;

    tracing::info!(
        path = %socket_path.display(),
        capacity = config.engine.capacity,
        protect_sensitive = config.engine.protect_sensitive,
        interval_ms = config.poll_interval.as_millis() as u64,
        "daemon listening"
    );

    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
        }
    };

    let clipboard = tokio::task::spawn_blocking(XclipClipboard::connect).await?;
    let served = serve(listener, clipboard, &config, shutdown).await;

    if let Err(e) = std::fs::remove_file(&socket_path) {
        tracing::warn!(error = %e, path = %socket_path.display(), "failed to remove socket");
    }
    served?;
    tracing::info!("daemon stopped");
    Ok(())
}

/// The daemon loop. Returns when `shutdown` completes.
///
/// # Errors
///
/// Returns `DaemonError` if the clipboard worker cannot be started.
pub(crate) async fn serve<C>(
    listener: UnixListener,
    clipboard: C,
    config: &DaemonConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<(), DaemonError>
where
    C: SnapshotReader + ClipboardWriter + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<DaemonCommand>();
    let (events, _) = broadcast::channel::<Message>(EVENT_BUFFER);

    let mut engine = Engine::new(&config.engine);

    // Prime before accepting, so startup content is never captured.
    let poller = tokio::task::spawn_blocking(move || Poller::new(clipboard)).await?;
    let (clipboard_tx, clipboard_rx) = mpsc::unbounded_channel::<ClipboardRequest>();
    let (clipboard_event_tx, mut clipboard_events) = mpsc::unbounded_channel::<ClipboardEvent>();
    worker::spawn(poller, clipboard_rx, clipboard_event_tx)?;
    let mut poll_pending = false;

    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => connection::spawn_connection(stream, cmd_tx.clone()),
                    Err(e) => tracing::warn!(error = %e, "accept failed"),
                }
            }

            Some(cmd) = cmd_rx.recv() => {
                dispatch(&mut engine, &clipboard_tx, &events, cmd);
            }

            Some(event) = clipboard_events.recv() => match event {
                ClipboardEvent::Polled(snapshot) => {
                    poll_pending = false;
                    if let Some(snapshot) = snapshot {
                        let action = engine.ingest(&snapshot);
                        report(&engine, &events, &action);
                    }
                }
                ClipboardEvent::Restored { pending, result } => {
                    finish_restore(&mut engine, &events, pending, result);
                }
            },

            // One poll in flight at a time; a slow read skips ticks.
            _ = ticker.tick(), if !poll_pending => {
                poll_pending = clipboard_tx.send(ClipboardRequest::Poll).is_ok();
            }

            () = &mut shutdown => break,
        }
    }

    if !engine.is_empty() {
        let removed = engine.clear();
        tracing::debug!(removed, "history dropped");
    }
    Ok(())
}

/// Handle one request and carry out its effect.
///
/// A `select` is answered once the worker has written the item back.
fn dispatch(
    engine: &mut Engine,
    clipboard: &mpsc::UnboundedSender<ClipboardRequest>,
    events: &broadcast::Sender<Message>,
    cmd: DaemonCommand,
) {
    let DaemonCommand { request, reply_tx } = cmd;
    let (message, effect) = handler::handle_message(engine, request);
    let mut subscription = None;

    match effect {
        Some(Effect::Restore { id, item }) => {
            let pending = PendingRestore {
                id,
                item,
                message,
                reply_tx,
            };
            if let Err(mpsc::error::SendError(ClipboardRequest::Restore(pending))) =
                clipboard.send(ClipboardRequest::Restore(pending))
            {
                tracing::warn!("clipboard worker gone; write-back dropped");
                pending.fail();
            }
            return;
        }
        Some(Effect::Changed) => publish_changed(engine, events),
        Some(Effect::Subscribe) => subscription = Some(events.subscribe()),
        None => {}
    }

    let _ = reply_tx.send(Reply {
        message,
        subscription,
    });
}

/// Answer a `select` once its write-back is done. On success the item
/// becomes the newest entry.
fn finish_restore(
    engine: &mut Engine,
    events: &broadcast::Sender<Message>,
    pending: PendingRestore,
    result: Result<(), SnapshotError>,
) {
    let item = &pending.item;
    if let Err(e) = result {
        tracing::warn!(error = %e, category = %item.category, "write-back failed");
        pending.fail();
        return;
    }

    tracing::debug!(category = %item.category, id = %item.id, "restored to clipboard");
    if engine.promote(item.id) {
        publish_changed(engine, events);
    }
    pending.succeed();
}

/// Log a poll outcome and notify subscribers.
fn report(engine: &Engine, events: &broadcast::Sender<Message>, action: &EngineAction) {
    if let EngineAction::Suppressed(reason) = action {
        tracing::info!(reason = reason.kind(), "copy ignored");
        // No subscribers is not an error.
        let _ = events.send(Message::Ignored {
            id: 0,
            kind: reason.kind().to_owned(),
            reason: reason.to_string(),
        });
    } else if action.changed_history() {
        publish_changed(engine, events);
    }
}

fn publish_changed(engine: &Engine, events: &broadcast::Sender<Message>) {
    tracing::debug!(len = engine.len(), subscribers = events.receiver_count(), "history changed");
    let _ = events.send(Message::Changed {
        id: 0,
        items: handler::describe_all(engine),
    });
}

// -- Socket setup --

/// Create the socket directory (mode 0700) and bind the listener.
///
/// On `EADDRINUSE`, probes the existing socket: if something answers,
/// another daemon is running; otherwise the socket is stale and is
/// replaced.
pub(crate) async fn bind_socket(path: &Path) -> Result<UnixListener, DaemonError> {
    if let Some(parent) = path.parent() {
        let mkdir_failed = |source| DaemonError::MkdirFailed {
            path: parent.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(parent).map_err(mkdir_failed)?;

        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))
            .map_err(mkdir_failed)?;
    }

    let bind_failed = |source| DaemonError::BindFailed {
        path: path.to_path_buf(),
        source,
    };

    match UnixListener::bind(path) {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            if UnixStream::connect(path).await.is_ok() {
                return Err(DaemonError::AlreadyRunning(path.to_path_buf()));
            }
            tracing::info!(path = %path.display(), "removing stale socket");
            std::fs::remove_file(path).map_err(bind_failed)?;
            UnixListener::bind(path).map_err(bind_failed)
        }
        Err(e) => Err(bind_failed(e)),
    }
}
