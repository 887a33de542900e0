//! Room configuration.

use std::time::Duration;

use scrawl_protocol::Settings;
use serde::{Deserialize, Serialize};

use crate::words;

/// Configuration shared by every room a [`RoomManager`](crate::RoomManager)
/// creates.
///
/// Match settings a host can change at runtime (`max_rounds`,
/// `turn_time_secs`) live in [`Settings`]; `default_settings` is what a new
/// room starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Minimum players required to start a match.
    pub min_players: usize,

    /// Maximum players allowed in the room.
    pub max_players: usize,

    /// How many candidate words the drawer is offered.
    pub word_choices: usize,

    /// Seconds the drawer has to pick a word.
    pub word_selection_secs: u32,

    /// Seconds the revealed word stays up before the next turn.
    pub round_end_pause_secs: u32,

    /// Seconds the final leaderboard stays up before the lobby returns.
    pub game_over_pause_secs: u32,

    /// Length of one countdown step.
    pub tick_interval: Duration,

    /// Settings a fresh room starts with.
    pub default_settings: Settings,

    /// Words the candidates are drawn from.
    pub word_bank: Vec<String>,

    /// Longest guess or chat line, in characters after trimming. Longer
    /// ones are dropped.
    pub max_chat_len: usize,

    /// Capacity of each room's command queue.
    pub channel_size: usize,

    /// Fixed RNG seed for word selection. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 1,
            max_players: 8,
            word_choices: 3,
            word_selection_secs: 15,
            round_end_pause_secs: 5,
            game_over_pause_secs: 8,
            tick_interval: Duration::from_secs(1),
            default_settings: Settings::default(),
            word_bank: words::default_bank(),
            max_chat_len: 200,
            channel_size: 256,
            rng_seed: None,
        }
    }
}

impl RoomConfig {
    /// Clamps values that would make a room unusable.
    ///
    /// Called automatically when a room is created.
    pub fn validated(mut self) -> Self {
        self.min_players = self.min_players.max(1);
        self.max_players = self.max_players.max(self.min_players);
        self.word_choices = self.word_choices.max(1);
        self.max_chat_len = self.max_chat_len.max(1);
        self.channel_size = self.channel_size.max(1);
        self.word_bank.retain(|w| !w.trim().is_empty());
        if self.word_bank.is_empty() {
            tracing::warn!("empty word bank, using the built-in list");
            self.word_bank = words::default_bank();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.min_players, 1);
        assert_eq!(config.max_players, 8);
        assert_eq!(config.word_choices, 3);
        assert_eq!(config.word_selection_secs, 15);
        assert_eq!(config.max_chat_len, 200);
        assert_eq!(config.default_settings, Settings::default());
        assert!(!config.word_bank.is_empty());
    }

    #[test]
    fn test_validated_restores_empty_word_bank() {
        let config = RoomConfig {
            word_bank: vec!["  ".into()],
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.word_bank, words::default_bank());
    }

    #[test]
    fn test_validated_keeps_limits_consistent() {
        let config = RoomConfig {
            min_players: 0,
            max_players: 0,
            word_choices: 0,
            ..RoomConfig::default()
        }
        .validated();
        assert_eq!(config.min_players, 1);
        assert_eq!(config.max_players, 1);
        assert_eq!(config.word_choices, 1);
    }
}
