//! Codec trait and implementations for serializing/deserializing messages.
//!
//! The server is written against [`Codec`], not against JSON. JSON is the
//! only implementation today because browser clients speak it natively;
//! a compact binary codec could be dropped in for stroke-heavy rooms
//! without touching the room or session layers.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value cannot be
    /// represented in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or do
    /// not match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use scrawl_protocol::{ClientMessage, Codec, Envelope, JsonCodec};
///
/// let codec = JsonCodec;
/// let envelope = Envelope {
///     seq: 1,
///     timestamp: 250,
///     payload: ClientMessage::StartGame { room_id: "ABC123".into() },
/// };
///
/// let bytes = codec.encode(&envelope).unwrap();
/// let decoded: Envelope<ClientMessage> = codec.decode(&bytes).unwrap();
/// assert_eq!(envelope, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientMessage, Envelope, ServerMessage};

    #[test]
    fn test_json_codec_decodes_client_envelope() {
        let raw = br#"{
            "seq": 3,
            "timestamp": 900,
            "payload": { "type": "guess", "room_id": "abc123", "text": "apple" }
        }"#;
        let env: Envelope<ClientMessage> = JsonCodec.decode(raw).unwrap();
        assert_eq!(env.seq, 3);
        assert_eq!(
            env.payload,
            ClientMessage::Guess { room_id: "abc123".into(), text: "apple".into() }
        );
    }

    #[test]
    fn test_json_codec_decode_garbage_is_decode_error() {
        let result: Result<Envelope<ClientMessage>, _> =
            JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_encodes_unit_variant_as_tag_only() {
        let bytes = JsonCodec.encode(&ServerMessage::CanvasCleared).unwrap();
        assert_eq!(bytes, br#"{"type":"canvas_cleared"}"#);
    }
}
