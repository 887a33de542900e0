//! Session data: what the gateway remembers about one player.

use std::time::Instant;

use scrawl_protocol::{PlayerId, RoomCode};

/// Limits applied to join requests.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Longest accepted username, in characters, after trimming.
    pub max_username_len: usize,
    /// Avatars longer than this (in characters) are cut down.
    pub max_avatar_len: usize,
    /// Length of generated room codes.
    pub room_code_len: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_username_len: 24,
            max_avatar_len: 256,
            room_code_len: 6,
        }
    }
}

/// A request to join (and maybe create) a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub username: String,
    pub avatar: String,
    /// Raw room code as the client typed it. Case and surrounding
    /// whitespace do not matter; a blank code asks for a new room.
    pub room_id: String,
}

/// A player's membership in a room.
#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: PlayerId,
    pub room_id: RoomCode,
    /// Username after trimming.
    pub username: String,
    pub joined_at: Instant,
}
