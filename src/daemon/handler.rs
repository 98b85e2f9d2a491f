//! Request handling.
//!
//! Pure logic, no I/O. Each request maps to a response plus an optional
//! [`Effect`] that the daemon loop carries out: writing to the system
//! clipboard, notifying subscribers, or attaching a subscription.

use crate::engine::{ClipboardItem, Engine};
use crate::ipc::protocol::{ItemDescriptor, Message, PROTOCOL_VERSION, Status};

/// Longest preview, in characters.
const PREVIEW_CHARS: usize = 80;

/// Work the daemon loop must do after answering a request.
#[derive(Debug)]
pub enum Effect {
    /// Write `item` back to the system clipboard, then promote it. A
    /// failed write turns the response for request `id` into
    /// `clipboard_failed`.
    Restore { id: u32, item: ClipboardItem },
    /// History changed; push the new list to subscribers.
    Changed,
    /// Attach the requesting connection to the event stream.
    Subscribe,
}

/// Dispatch a request.
///
/// Daemon-originated variants sent by a client are answered with
/// `unknown_type`, the same as types this version does not know.
pub fn handle_message(engine: &mut Engine, request: Message) -> (Message, Option<Effect>) {
    match request {
        Message::Hello { id, version } => (handle_hello(id, version), None),
        Message::ListHistory { id } => (
            Message::Response {
                id,
                status: Status::Ok,
                error: None,
                items: Some(describe_all(engine)),
                item: None,
            },
            None,
        ),
        Message::Clear { id } => {
            let removed = engine.clear();
            tracing::info!(removed, "history cleared");
            (Message::ok(id), Some(Effect::Changed))
        }
        Message::Select { id, index } => handle_select(engine, id, index),
        Message::Subscribe { id } => (Message::ok(id), Some(Effect::Subscribe)),
        Message::HelloAck { id, .. }
        | Message::Response { id, .. }
        | Message::Changed { id, .. }
        | Message::Ignored { id, .. } => (Message::error(id, "unknown_type"), None),
    }
}

fn handle_hello(id: u32, version: u32) -> Message {
    // The handshake id is always 0.
    if id != 0 {
        return Message::HelloAck {
            id: 0,
            status: Status::Error,
            error: Some("invalid_hello_id".into()),
        };
    }
    if version != PROTOCOL_VERSION {
        return Message::HelloAck {
            id: 0,
            status: Status::Error,
            error: Some("version_mismatch".into()),
        };
    }
    Message::HelloAck {
        id: 0,
        status: Status::Ok,
        error: None,
    }
}

fn handle_select(engine: &Engine, id: u32, index: u32) -> (Message, Option<Effect>) {
    let Some(item) = engine.select(index as usize) else {
        return (Message::error(id, "index_out_of_range"), None);
    };
    let response = Message::Response {
        id,
        status: Status::Ok,
        error: None,
        items: None,
        item: Some(describe(&item)),
    };
    (response, Some(Effect::Restore { id, item }))
}

/// Wire metadata for one entry.
pub fn describe(item: &ClipboardItem) -> ItemDescriptor {
    ItemDescriptor {
        id: item.id.to_string(),
        category: item.category.as_str().to_owned(),
        preview: preview(&item.content),
        source_format: item.source_format.clone(),
        source_app: item.source_app.clone(),
        captured_at: item.captured_at,
        byte_length: item.byte_length() as u64,
    }
}

/// Wire metadata for the whole history, newest first.
pub fn describe_all(engine: &Engine) -> Vec<ItemDescriptor> {
    engine.items().map(describe).collect()
}

/// First non-blank line, cut to [`PREVIEW_CHARS`] characters.
fn preview(content: &str) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    line.chars().take(PREVIEW_CHARS).collect()
}
