//! Identity types, delivery targets, and the envelope every frame is
//! wrapped in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A connection-scoped player identity.
///
/// Allocated by the server when a connection is accepted and stable for
/// that connection's lifetime. A player who reconnects is a new player.
///
/// Serialized as a bare number (`#[serde(transparent)]`), so clients see
/// `"player_id": 7` rather than `{"0": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A short, human-typeable room code such as `ABC123`.
///
/// Codes are case-insensitive: [`RoomCode::parse`] trims and upper-cases
/// its input, so `" abc123"` and `"ABC123"` name the same room. A valid
/// code is 4 to 8 ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Shortest accepted code.
    pub const MIN_LEN: usize = 4;
    /// Longest accepted code.
    pub const MAX_LEN: usize = 8;

    /// Validates and normalizes a user-supplied code.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] for empty, too long, or
    /// non-alphanumeric input.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(ProtocolError::InvalidMessage(format!(
                "room code must be {}-{} characters, got {len}",
                Self::MIN_LEN,
                Self::MAX_LEN
            )));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProtocolError::InvalidMessage(
                "room code may only contain letters and digits".into(),
            ));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns `true` if `raw` names this room once normalized.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(&self.0)
    }

    /// The normalized (upper-case) code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who inside a room should receive a server message.
///
/// The room state machine pairs every outbound message with one of these;
/// the room actor expands it against the live roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every member of the room.
    All,

    /// Exactly one member (private word options, stroke replay).
    Player(PlayerId),

    /// Every member except one (the drawer, for stroke relay and hints).
    AllExcept(PlayerId),
}

impl Recipient {
    /// Returns `true` if a message addressed this way reaches `player`.
    pub fn includes(&self, player: PlayerId) -> bool {
        match self {
            Self::All => true,
            Self::Player(p) => *p == player,
            Self::AllExcept(p) => *p != player,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level wrapper around every frame.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │ seq: 42          ← per-sender counter │
/// │ timestamp: 15000 ← ms since start     │
/// │ payload: { "type": "draw_update", …} │
/// └──────────────────────────────────────┘
/// ```
///
/// The server numbers its envelopes per connection, so a client can tell
/// that stroke `n + 1` really followed stroke `n`. Client sequence numbers
/// are accepted but not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Monotonically increasing per sender.
    #[serde(default)]
    pub seq: u64,

    /// Milliseconds since the sender started.
    #[serde(default)]
    pub timestamp: u64,

    /// The message itself.
    pub payload: T,
}
