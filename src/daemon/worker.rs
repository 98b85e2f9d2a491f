//! Clipboard worker thread.
//!
//! Platform adapters block: the X11 adapter runs `xclip` once per
//! target. The [`Poller`] therefore lives on its own thread and the
//! daemon loop talks to it over channels. A slow selection owner delays
//! clipboard work only; `list` and `clear` keep being answered.
//!
//! Requests are served in order, so a poll queued after a write-back
//! always sees the post-write state.

use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};

use super::connection::Reply;
use crate::engine::ClipboardItem;
use crate::ipc::protocol::Message;
use crate::poller::Poller;
use crate::snapshot::{ClipboardSnapshot, ClipboardWriter, SnapshotError, SnapshotReader};

/// A `select` waiting for its write-back. The response is held until
/// the write has finished.
#[derive(Debug)]
pub struct PendingRestore {
    /// Request id, for the `clipboard_failed` error response.
    pub id: u32,
    pub item: ClipboardItem,
    pub message: Message,
    pub reply_tx: oneshot::Sender<Reply>,
}

impl PendingRestore {
    /// Send the held response.
    pub fn succeed(self) {
        send(self.reply_tx, self.message);
    }

    pub fn fail(self) {
        send(self.reply_tx, Message::error(self.id, "clipboard_failed"));
    }
}

fn send(reply_tx: oneshot::Sender<Reply>, message: Message) {
    // The connection may have gone away meanwhile.
    let _ = reply_tx.send(Reply {
        message,
        subscription: None,
    });
}

#[derive(Debug)]
pub enum ClipboardRequest {
    /// Check for a new copy.
    Poll,
    /// Write an item back to the clipboard.
    Restore(PendingRestore),
}

#[derive(Debug)]
pub enum ClipboardEvent {
    /// Answer to [`ClipboardRequest::Poll`]. `None` when nothing new
    /// could be read.
    Polled(Option<ClipboardSnapshot>),
    Restored {
        pending: PendingRestore,
        result: Result<(), SnapshotError>,
    },
}

/// Start the worker. It exits when `requests` is closed or the daemon
/// stops listening for events.
pub fn spawn<C>(
    poller: Poller<C>,
    requests: mpsc::UnboundedReceiver<ClipboardRequest>,
    events: mpsc::UnboundedSender<ClipboardEvent>,
) -> std::io::Result<JoinHandle<()>>
where
    C: SnapshotReader + ClipboardWriter + 'static,
{
    std::thread::Builder::new()
        .name("clipboard".into())
        .spawn(move || run(poller, requests, events))
}

fn run<C>(
    mut poller: Poller<C>,
    mut requests: mpsc::UnboundedReceiver<ClipboardRequest>,
    events: mpsc::UnboundedSender<ClipboardEvent>,
) where
    C: SnapshotReader + ClipboardWriter,
{
    while let Some(request) = requests.blocking_recv() {
        let event = match request {
            ClipboardRequest::Poll => ClipboardEvent::Polled(poller.poll()),
            ClipboardRequest::Restore(pending) => {
                let result = poller.restore(&pending.item.restore_payload());
                ClipboardEvent::Restored { pending, result }
            }
        };
        if events.send(event).is_err() {
            break;
        }
    }
    tracing::debug!("clipboard worker stopped");
}
