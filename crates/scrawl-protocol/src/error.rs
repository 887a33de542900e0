//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating wire
/// data.
///
/// A `ProtocolError` always means "these bytes or this field are wrong",
/// never "the room said no"; game-level rejections are not errors at
/// this layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (a Rust value could not become bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `"type"` tag,
    /// missing fields, or wrong field types.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value parsed but breaks a protocol rule, e.g. a room code with
    /// punctuation in it.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
