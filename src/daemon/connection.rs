//! Per-connection task: framed I/O, handshake, command forwarding and
//! event delivery.
//!
//! Each connection:
//! 1. Wraps the socket in the length-prefixed frame codec.
//! 2. Requires `hello` as the first message and forwards it to the
//!    daemon loop for validation. A rejected handshake closes the
//!    connection after the `hello_ack`.
//! 3. Forwards requests to the daemon loop and writes back responses.
//!    After a successful `subscribe`, also writes pushed events.

use std::sync::atomic::{AtomicU64, Ordering};

use futures::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::codec::Framed;

use crate::ipc::codec::{CodecError, DecodeResult, FrameCodec, decode_frame};
use crate::ipc::protocol::{Message, Status};

/// Connection identifier, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Request forwarded from a connection task to the daemon loop.
#[derive(Debug)]
pub struct DaemonCommand {
    pub request: Message,
    pub reply_tx: oneshot::Sender<Reply>,
}

/// The daemon loop's answer: a response, plus the event receiver when
/// the request was a successful `subscribe`.
///
/// The receiver is created inside the daemon loop so that no event
/// published after the response can be missed.
#[derive(Debug)]
pub struct Reply {
    pub message: Message,
    pub subscription: Option<broadcast::Receiver<Message>>,
}

#[derive(Debug, thiserror::Error)]
enum ConnectionError {
    #[error("unexpected EOF during handshake")]
    HandshakeEof,
    #[error("first message must be hello")]
    NotHello,
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] rmp_serde::decode::Error),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("daemon loop closed")]
    DaemonGone,
    #[error("reply channel closed")]
    ReplyDropped,
}

/// Spawn a connection handler task. Runs until the client disconnects,
/// a protocol error occurs, or the daemon loop goes away.
pub fn spawn_connection(stream: UnixStream, cmd_tx: mpsc::UnboundedSender<DaemonCommand>) {
    let conn_id = ConnectionId::new();
    tracing::debug!(?conn_id, "accepted connection");
    tokio::spawn(async move {
        match handle_connection(stream, cmd_tx).await {
            Ok(()) => tracing::debug!(?conn_id, "connection closed"),
            Err(e) => tracing::debug!(?conn_id, error = %e, "connection closed"),
        }
    });
}

async fn handle_connection(
    stream: UnixStream,
    cmd_tx: mpsc::UnboundedSender<DaemonCommand>,
) -> Result<(), ConnectionError> {
    let mut framed = Framed::new(stream, FrameCodec::new());

    // -- Handshake --
    let first_frame = framed.next().await.ok_or(ConnectionError::HandshakeEof)??;
    let hello = match decode_frame(&first_frame) {
        DecodeResult::Ok(msg @ Message::Hello { .. }) => msg,
        DecodeResult::Ok(_) | DecodeResult::UnknownType(_) => {
            return Err(ConnectionError::NotHello);
        }
        DecodeResult::Malformed(e) => return Err(ConnectionError::MalformedFrame(e)),
    };

    let ack = send_command(&cmd_tx, hello).await?.message;
    let rejected = matches!(
        ack,
        Message::HelloAck {
            status: Status::Error,
            ..
        }
    );
    framed.send(ack).await?;
    if rejected {
        return Ok(());
    }

    // -- Requests and events --
    let mut events: Option<broadcast::Receiver<Message>> = None;
    loop {
        tokio::select! {
            frame = framed.next() => {
                let raw = match frame {
                    Some(raw) => raw?,
                    None => return Ok(()),
                };
                match decode_frame(&raw) {
                    DecodeResult::Ok(msg) => {
                        let reply = send_command(&cmd_tx, msg).await?;
                        if reply.subscription.is_some() {
                            events = reply.subscription;
                        }
                        framed.send(reply.message).await?;
                    }
                    DecodeResult::UnknownType(envelope) => {
                        tracing::debug!(msg_type = %envelope.msg_type, "unknown message type");
                        framed.send(Message::error(envelope.id, "unknown_type")).await?;
                    }
                    DecodeResult::Malformed(e) => {
                        return Err(ConnectionError::MalformedFrame(e));
                    }
                }
            }
            event = next_event(&mut events) => {
                match event {
                    Ok(msg) => framed.send(msg).await?,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // The next `changed` carries the full list again.
                        tracing::warn!(skipped, "subscriber lagging, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => return Ok(()),
                }
            }
        }
    }
}

/// Next pushed event, or never if the connection is not subscribed.
async fn next_event(
    events: &mut Option<broadcast::Receiver<Message>>,
) -> Result<Message, broadcast::error::RecvError> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Send a request to the daemon loop and wait for its reply.
async fn send_command(
    cmd_tx: &mpsc::UnboundedSender<DaemonCommand>,
    request: Message,
) -> Result<Reply, ConnectionError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    cmd_tx
        .send(DaemonCommand { request, reply_tx })
        .map_err(|_| ConnectionError::DaemonGone)?;
    reply_rx.await.map_err(|_| ConnectionError::ReplyDropped)
}
