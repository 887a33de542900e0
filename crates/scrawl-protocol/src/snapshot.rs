//! Room state as clients see it: phases, players, settings, strokes, and
//! the full snapshot broadcast after every change.
//!
//! Clients never merge deltas. Each [`RoomSnapshot`] fully determines what
//! a client renders, so a client that misses one can recover from the next.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{PlayerId, RoomCode};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a room is in its match lifecycle.
///
/// ```text
/// Lobby → ChoosingWord → Drawing → RoundEnd ─┬→ ChoosingWord (next turn)
///   ↑                                        └→ GameOver ──(pause)──┐
///   └───────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the host to start a match. Settings may change here.
    Lobby,
    /// The drawer is picking one of the offered words.
    ChoosingWord,
    /// The drawer draws, everyone else guesses.
    Drawing,
    /// The word has been revealed; short pause before the next turn.
    RoundEnd,
    /// Final leaderboard; short pause before returning to the lobby.
    GameOver,
}

impl Phase {
    /// Returns `true` in the phases that must have exactly one drawer.
    pub fn has_drawer(self) -> bool {
        matches!(self, Self::ChoosingWord | Self::Drawing)
    }

    /// Returns `true` while a match is running (anything but the lobby).
    pub fn in_match(self) -> bool {
        !matches!(self, Self::Lobby)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lobby => "lobby",
            Self::ChoosingWord => "choosing_word",
            Self::Drawing => "drawing",
            Self::RoundEnd => "round_end",
            Self::GameOver => "game_over",
        })
    }
}

/// Presentation-only mood tag shown next to a player's avatar.
///
/// Not authoritative game state; clients may ignore it entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Host-controlled match settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of drawing turns in a match.
    pub max_rounds: u32,
    /// Length of the drawing phase, in seconds.
    pub turn_time_secs: u32,
}

impl Settings {
    /// Accepted values for `max_rounds`.
    pub const ROUNDS: RangeInclusive<u32> = 1..=20;
    /// Accepted values for `turn_time_secs`.
    pub const TURN_TIME_SECS: RangeInclusive<u32> = 10..=300;

    /// Applies a partial update.
    ///
    /// Returns `None` if any provided field is out of range; a rejected
    /// update changes nothing.
    pub fn with_update(&self, update: &SettingsUpdate) -> Option<Self> {
        let mut next = *self;
        if let Some(rounds) = update.max_rounds {
            if !Self::ROUNDS.contains(&rounds) {
                return None;
            }
            next.max_rounds = rounds;
        }
        if let Some(secs) = update.turn_time_secs {
            if !Self::TURN_TIME_SECS.contains(&secs) {
                return None;
            }
            next.turn_time_secs = secs;
        }
        Some(next)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            turn_time_secs: 60,
        }
    }
}

/// A partial settings change sent by the host. Missing fields are left
/// as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, alias = "maxRounds")]
    pub max_rounds: Option<u32>,
    #[serde(default, alias = "turnTime")]
    pub turn_time_secs: Option<u32>,
}

// ---------------------------------------------------------------------------
// Strokes
// ---------------------------------------------------------------------------

/// One pen movement from `(x0, y0)` to `(x1, y1)`.
///
/// Coordinates are in the drawer's canonical canvas space; the core never
/// interprets them beyond checking they are finite. Segments are immutable
/// once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// CSS color string, e.g. `#ef4444`.
    pub color: String,
    #[serde(alias = "lineWidth")]
    pub line_width: f32,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One roster entry as rendered by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub username: String,
    /// Seed for the client-side avatar generator.
    pub avatar: String,
    pub score: u32,
    pub emotion: Emotion,
    pub is_host: bool,
}

/// The full, role-appropriate state of a room for one recipient.
///
/// `word` and `hint` depend on who the snapshot is for: the drawer (and
/// anyone who already guessed) gets the word during `drawing`, everyone
/// else gets only the masked hint until `round_end` reveals it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomCode,
    pub phase: Phase,
    /// 1-based turn counter; 0 in the lobby.
    pub round: u32,
    pub max_rounds: u32,
    pub turn_time_secs: u32,
    /// Join order; `players[0]` is the host.
    pub players: Vec<PlayerView>,
    pub current_drawer: Option<PlayerId>,
    /// Players who guessed correctly this turn, in guessing order.
    pub guessed: Vec<PlayerId>,
    pub word: Option<String>,
    pub hint: Option<String>,
    /// Seconds left on the visible countdown, if one is running.
    pub seconds_remaining: Option<u32>,
}

/// A player's line in the `round_ended` summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub id: PlayerId,
    pub username: String,
    pub score: u32,
    pub guessed: bool,
}

/// A line of the final leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position.
    pub rank: u32,
    pub id: PlayerId,
    pub username: String,
    pub score: u32,
}
