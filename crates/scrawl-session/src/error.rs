//! Error types for the session layer.

use scrawl_protocol::{PlayerId, ProtocolError, RoomCode};
use scrawl_room::RoomError;

/// Reasons a join or leave request is refused.
///
/// The `Display` text of every variant is safe to show to the player; the
/// server forwards it verbatim in a `room_error` message.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The room code is empty, too long, or has punctuation in it.
    #[error("invalid room code: {0}")]
    InvalidRoomCode(#[from] ProtocolError),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// The connection is already in a room. Leave first.
    #[error("player {0} is already in room {1}")]
    AlreadyJoined(PlayerId, RoomCode),

    #[error("player {0} is not in a room")]
    NotJoined(PlayerId),

    /// The room itself refused (full, stopped, ...).
    #[error(transparent)]
    Room(#[from] RoomError),
}
