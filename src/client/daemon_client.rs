//! Daemon client for the CLI.
//!
//! Connects to the daemon socket, performs the handshake, and issues one
//! request at a time. After [`DaemonClient::subscribe`] the connection
//! only carries pushed events.

use std::path::Path;

use futures::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio_util::codec::Framed;

use crate::ipc;
use crate::ipc::codec::LengthPrefixedCodec;
use crate::ipc::protocol::{ItemDescriptor, Message, PROTOCOL_VERSION, Status};

use super::ClientError;

pub struct DaemonClient {
    framed: Framed<UnixStream, LengthPrefixedCodec>,
    next_id: u32,
}

impl DaemonClient {
    /// Connect to the daemon at the default socket path.
    pub async fn connect() -> Result<Self, ClientError> {
        let path = ipc::socket_path()
            .ok_or_else(|| ClientError::Daemon("$XDG_RUNTIME_DIR not set".into()))?;
        Self::connect_to(&path).await
    }

    pub async fn connect_to(path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(path).await.map_err(|e| {
            ClientError::Daemon(format!(
                "connect to {} failed: {e} (is `clippo daemon` running?)",
                path.display()
            ))
        })?;
        let mut framed = Framed::new(stream, LengthPrefixedCodec::new());

        framed
            .send(Message::Hello {
                id: 0,
                version: PROTOCOL_VERSION,
            })
            .await
            .map_err(|e| ClientError::Daemon(format!("send hello: {e}")))?;

        match framed.next().await {
            Some(Ok(Message::HelloAck {
                status: Status::Ok, ..
            })) => {}
            Some(Ok(Message::HelloAck { error, .. })) => {
                return Err(ClientError::Daemon(format!(
                    "handshake rejected: {}",
                    error.unwrap_or_default()
                )));
            }
            other => {
                return Err(ClientError::Daemon(format!(
                    "unexpected handshake response: {other:?}"
                )));
            }
        }

        Ok(Self {
            framed,
            next_id: 1, // 0 = hello
        })
    }

    /// History, newest first.
    pub async fn list_history(&mut self) -> Result<Vec<ItemDescriptor>, ClientError> {
        match self.request("list_history", |id| Message::ListHistory { id }).await? {
            Message::Response { items, .. } => Ok(items.unwrap_or_default()),
            other => Err(unexpected("list_history", &other)),
        }
    }

    pub async fn clear(&mut self) -> Result<(), ClientError> {
        self.request("clear", |id| Message::Clear { id }).await?;
        Ok(())
    }

    /// Ask the daemon to put the entry at `index` back on the clipboard.
    pub async fn select(&mut self, index: u32) -> Result<ItemDescriptor, ClientError> {
        match self
            .request("select", |id| Message::Select { id, index })
            .await?
        {
            Message::Response {
                item: Some(item), ..
            } => Ok(item),
            other => Err(unexpected("select", &other)),
        }
    }

    /// Switch the connection to event delivery.
    pub async fn subscribe(&mut self) -> Result<(), ClientError> {
        self.request("subscribe", |id| Message::Subscribe { id })
            .await?;
        Ok(())
    }

    /// Next pushed event. `None` once the daemon closes the connection.
    pub async fn next_event(&mut self) -> Result<Option<Message>, ClientError> {
        match self.framed.next().await {
            Some(Ok(msg @ (Message::Changed { .. } | Message::Ignored { .. }))) => Ok(Some(msg)),
            Some(Ok(other)) => Err(unexpected("event", &other)),
            Some(Err(e)) => Err(ClientError::Daemon(format!("receive event: {e}"))),
            None => Ok(None),
        }
    }

    /// Send one request and wait for its `response`. An error status is
    /// returned as [`ClientError::Daemon`] carrying the daemon's reason.
    async fn request(
        &mut self,
        name: &str,
        build: impl FnOnce(u32) -> Message,
    ) -> Result<Message, ClientError> {
        let id = self.next_id;
        self.next_id += 1;

        self.framed
            .send(build(id))
            .await
            .map_err(|e| ClientError::Daemon(format!("send {name}: {e}")))?;

        match self.framed.next().await {
            Some(Ok(
                msg @ Message::Response {
                    status: Status::Ok, ..
                },
            )) => Ok(msg),
            Some(Ok(Message::Response { error, .. })) => Err(ClientError::Daemon(format!(
                "{name} failed: {}",
                error.unwrap_or_default()
            ))),
            Some(Ok(other)) => Err(unexpected(name, &other)),
            Some(Err(e)) => Err(ClientError::Daemon(format!("receive {name}: {e}"))),
            None => Err(ClientError::Daemon(format!(
                "daemon closed the connection during {name}"
            ))),
        }
    }
}

fn unexpected(name: &str, msg: &Message) -> ClientError {
    ClientError::Daemon(format!("unexpected {name} response: {msg:?}"))
}
