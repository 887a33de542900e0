//! Error types for the room layer.

use scrawl_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
///
/// Only membership and lifecycle problems are errors. Gameplay requests
/// that are unauthorized or arrive in the wrong phase are dropped inside
/// the state machine and never reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room is full, no more player slots available.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The player is already in this room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The player is not in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomCode),

    /// The room's actor has stopped (the last player left) or its command
    /// queue is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
