//! Length-prefixed MessagePack codec for tokio I/O.
//!
//! Framing: `[4 bytes: payload length, big-endian u32][N bytes: MessagePack payload]`

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::protocol::{MAX_PAYLOAD_SIZE, Message, RawEnvelope};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("payload too large: {0} bytes (max {MAX_PAYLOAD_SIZE})")]
    PayloadTooLarge(usize),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Split one complete frame off `src`, or `None` if more bytes are needed.
///
/// `pending_len` carries a consumed header across calls.
fn split_frame(
    pending_len: &mut Option<usize>,
    src: &mut BytesMut,
) -> Result<Option<BytesMut>, CodecError> {
    let payload_len = match *pending_len {
        Some(len) => len,
        None => {
            if src.len() < 4 {
                return Ok(None);
            }
            let len = src.get_u32() as usize;
            if len > MAX_PAYLOAD_SIZE {
                return Err(CodecError::PayloadTooLarge(len));
            }
            *pending_len = Some(len);
            len
        }
    };

    if src.len() < payload_len {
        src.reserve(payload_len - src.len());
        return Ok(None);
    }

    *pending_len = None;
    Ok(Some(src.split_to(payload_len)))
}

fn put_frame(item: &Message, dst: &mut BytesMut) -> Result<(), CodecError> {
    let payload = rmp_serde::to_vec_named(item)?;
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(CodecError::PayloadTooLarge(payload.len()));
    }
    dst.reserve(4 + payload.len());
    dst.put_u32(payload.len() as u32);
    dst.extend_from_slice(&payload);
    Ok(())
}

/// Decodes frames straight into [`Message`] values.
///
/// Used on the client side, where every frame from the daemon is a
/// known message. The daemon uses [`FrameCodec`] + [`decode_frame`]
/// so it can answer unknown message types instead of dropping the
/// connection.
#[derive(Debug, Default)]
pub struct LengthPrefixedCodec {
    pending_len: Option<usize>,
}

impl LengthPrefixedCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LengthPrefixedCodec {
    type Item = Message;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match split_frame(&mut self.pending_len, src)? {
            Some(payload) => Ok(Some(rmp_serde::from_slice(&payload)?)),
            None => Ok(None),
        }
    }
}

impl Encoder<Message> for LengthPrefixedCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_frame(&item, dst)
    }
}

/// Frame-level codec. Yields raw payloads without deserializing.
#[derive(Debug, Default)]
pub struct FrameCodec {
    pending_len: Option<usize>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        split_frame(&mut self.pending_len, src)
    }
}

impl Encoder<Message> for FrameCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        put_frame(&item, dst)
    }
}

/// Result of attempting to decode a raw frame into a protocol message.
#[derive(Debug)]
pub enum DecodeResult {
    Ok(Message),
    /// Unknown type; the envelope carries the id to echo.
    UnknownType(RawEnvelope),
    /// Could not even extract `{type, id}`.
    Malformed(rmp_serde::decode::Error),
}

/// Two-phase decode: try [`Message`], then fall back to [`RawEnvelope`].
pub fn decode_frame(payload: &[u8]) -> DecodeResult {
    match rmp_serde::from_slice::<Message>(payload) {
        Ok(msg) => DecodeResult::Ok(msg),
        Err(_) => match rmp_serde::from_slice::<RawEnvelope>(payload) {
            Ok(envelope) => DecodeResult::UnknownType(envelope),
            Err(e) => DecodeResult::Malformed(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(msg: &Message) -> BytesMut {
        let mut buf = BytesMut::new();
        LengthPrefixedCodec::new()
            .encode(msg.clone(), &mut buf)
            .unwrap();
        buf
    }

    #[test]
    fn partial_header_returns_none() {
        let mut codec = LengthPrefixedCodec::new();
        let mut buf = BytesMut::from(&[0u8, 0][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn partial_payload_then_rest() {
        let msg = Message::Select { id: 1, index: 3 };
        let mut full = encode(&msg);
        let half = full.len() / 2;
        let mut partial = full.split_to(half);

        let mut codec = LengthPrefixedCodec::new();
        assert!(codec.decode(&mut partial).unwrap().is_none());

        partial.extend_from_slice(&full);
        assert_eq!(codec.decode(&mut partial).unwrap().unwrap(), msg);
    }

    #[test]
    fn multiple_messages_in_buffer() {
        let first = Message::ListHistory { id: 1 };
        let second = Message::Clear { id: 2 };
        let mut buf = encode(&first);
        buf.extend_from_slice(&encode(&second));

        let mut codec = LengthPrefixedCodec::new();
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), first);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), second);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn payload_too_large_on_decode() {
        let mut buf = BytesMut::new();
        buf.put_u32((17 * 1024 * 1024) as u32);
        buf.extend_from_slice(&[0u8; 100]);

        let err = FrameCodec::new().decode(&mut buf).unwrap_err();
        assert!(matches!(err, CodecError::PayloadTooLarge(_)));
    }

    #[test]
    fn frame_length_header_is_big_endian() {
        let buf = encode(&Message::ListHistory { id: 0 });
        let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        assert_eq!(buf.len() - 4, len);
    }

    #[test]
    fn decode_frame_unknown_type_keeps_id() {
        #[derive(serde::Serialize)]
        struct Unknown {
            #[serde(rename = "type")]
            msg_type: &'static str,
            id: u32,
        }
        let payload = rmp_serde::to_vec_named(&Unknown {
            msg_type: "frobnicate",
            id: 42,
        })
        .unwrap();
        match decode_frame(&payload) {
            DecodeResult::UnknownType(envelope) => {
                assert_eq!(envelope.id, 42);
                assert_eq!(envelope.msg_type, "frobnicate");
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn decode_frame_garbage_is_malformed() {
        assert!(matches!(
            decode_frame(&[0xc1, 0xff, 0x00]),
            DecodeResult::Malformed(_)
        ));
    }

    #[test]
    fn frame_codec_yields_raw_payload() {
        let msg = Message::Subscribe { id: 8 };
        let mut buf = encode(&msg);
        let raw = FrameCodec::new().decode(&mut buf).unwrap().unwrap();
        assert!(matches!(decode_frame(&raw), DecodeResult::Ok(m) if m == msg));
    }
}
