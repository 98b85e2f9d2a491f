//! Wire protocol message types for daemon IPC.
//!
//! All messages are MessagePack-encoded maps with at minimum `type` and
//! `id` fields. Requests carry a client-chosen `id` that the matching
//! `response` echoes; pushed events carry `id: 0`.

use serde::{Deserialize, Serialize};

/// All wire protocol messages.
///
/// Serialized as a tagged union on the `type` field via MessagePack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Message {
    // -- Handshake --
    #[serde(rename = "hello")]
    Hello { id: u32, version: u32 },

    #[serde(rename = "hello_ack")]
    HelloAck {
        id: u32,
        status: Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    // -- Requests --
    #[serde(rename = "list_history")]
    ListHistory { id: u32 },

    #[serde(rename = "clear")]
    Clear { id: u32 },

    /// Write the entry at `index` back to the system clipboard.
    #[serde(rename = "select")]
    Select { id: u32, index: u32 },

    /// Start receiving `changed` and `ignored` events on this connection.
    #[serde(rename = "subscribe")]
    Subscribe { id: u32 },

    // -- Pushed events (daemon → subscriber) --
    /// History order or contents changed. Carries the full new list.
    #[serde(rename = "changed")]
    Changed { id: u32, items: Vec<ItemDescriptor> },

    /// A copy was suppressed by the sensitive filter.
    #[serde(rename = "ignored")]
    Ignored {
        id: u32,
        /// Machine-readable reason, e.g. `password_manager`.
        kind: String,
        /// Human-readable reason for display.
        reason: String,
    },

    // -- Generic response --
    #[serde(rename = "response")]
    Response {
        id: u32,
        status: Status,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        items: Option<Vec<ItemDescriptor>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<ItemDescriptor>,
    },
}

impl Message {
    /// Bare success response.
    pub fn ok(id: u32) -> Self {
        Message::Response {
            id,
            status: Status::Ok,
            error: None,
            items: None,
            item: None,
        }
    }

    /// Error response with a machine-readable reason.
    pub fn error(id: u32, reason: impl Into<String>) -> Self {
        Message::Response {
            id,
            status: Status::Error,
            error: Some(reason.into()),
            items: None,
            item: None,
        }
    }
}

/// Response status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// History entry metadata. Content is reduced to a one-line preview;
/// payload bytes never cross the socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDescriptor {
    pub id: String,
    pub category: String,
    pub preview: String,
    pub source_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_app: Option<String>,
    /// Unix epoch millis.
    pub captured_at: u64,
    pub byte_length: u64,
}

pub const PROTOCOL_VERSION: u32 = 1;

/// Maximum payload size (16 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Minimal envelope for extracting `{type, id}` from unknown messages,
/// so the error response can echo the request id.
#[derive(Debug, Deserialize)]
pub struct RawEnvelope {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(msg: &Message) -> Message {
        let encoded = rmp_serde::to_vec_named(msg).unwrap();
        rmp_serde::from_slice(&encoded).unwrap()
    }

    fn descriptor() -> ItemDescriptor {
        ItemDescriptor {
            id: "6f1c2d9e-0000-4000-8000-000000000001".into(),
            category: "url".into(),
            preview: "https://example.com".into(),
            source_format: "public.utf8-plain-text".into(),
            source_app: Some("firefox".into()),
            captured_at: 1_700_000_000_000,
            byte_length: 19,
        }
    }

    #[test]
    fn hello_ack_error_round_trip() {
        let msg = Message::HelloAck {
            id: 0,
            status: Status::Error,
            error: Some("version_mismatch".into()),
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn select_round_trip() {
        let msg = Message::Select { id: 4, index: 2 };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn response_with_items_round_trip() {
        let msg = Message::Response {
            id: 7,
            status: Status::Ok,
            error: None,
            items: Some(vec![descriptor()]),
            item: None,
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn changed_event_round_trip() {
        let msg = Message::Changed {
            id: 0,
            items: vec![descriptor()],
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn ignored_event_round_trip() {
        let msg = Message::Ignored {
            id: 0,
            kind: "likely_secret".into(),
            reason: "looks like a password or key".into(),
        };
        assert_eq!(round_trip(&msg), msg);
    }

    #[test]
    fn type_tag_on_the_wire() {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            msg_type: String,
            id: u32,
        }
        let encoded = rmp_serde::to_vec_named(&Message::Clear { id: 9 }).unwrap();
        let tagged: Tagged = rmp_serde::from_slice(&encoded).unwrap();
        assert_eq!(tagged.msg_type, "clear");
        assert_eq!(tagged.id, 9);
    }

    #[test]
    fn response_without_optional_fields_decodes() {
        #[derive(Serialize)]
        struct Bare {
            #[serde(rename = "type")]
            msg_type: &'static str,
            id: u32,
            status: Status,
        }
        let encoded = rmp_serde::to_vec_named(&Bare {
            msg_type: "response",
            id: 3,
            status: Status::Ok,
        })
        .unwrap();
        let decoded: Message = rmp_serde::from_slice(&encoded).unwrap();
        assert_eq!(decoded, Message::ok(3));
    }

    #[test]
    fn descriptor_omits_missing_source_app() {
        let mut d = descriptor();
        d.source_app = None;
        let encoded = rmp_serde::to_vec_named(&d).unwrap();
        let decoded: ItemDescriptor = rmp_serde::from_slice(&encoded).unwrap();
        assert_eq!(decoded, d);
    }

    #[test]
    fn error_constructor() {
        assert_eq!(
            Message::error(5, "index_out_of_range"),
            Message::Response {
                id: 5,
                status: Status::Error,
                error: Some("index_out_of_range".into()),
                items: None,
                item: None,
            }
        );
    }
}
