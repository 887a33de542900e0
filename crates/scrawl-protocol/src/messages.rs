//! The message catalog: everything a client may send and everything the
//! server may push back.
//!
//! Both enums are internally tagged on `"type"` with `snake_case` names,
//! so a guess looks like this on the wire:
//!
//! ```json
//! { "type": "guess", "room_id": "ABC123", "text": "apple" }
//! ```
//!
//! Client messages carry the room code as the client typed it (a plain
//! `String`). The server matches it against the room the connection is in
//! and ignores the message on mismatch, so a stale tab cannot act on a
//! room it already left.

use serde::{Deserialize, Serialize};

use crate::{
    PlayerId, RoomCode, RoomSnapshot, RoundResult, SettingsUpdate, Standing, StrokeSegment,
};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Requests a client can make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Enter a room, creating it if nobody is in it yet. A blank
    /// `room_id` creates a room under a fresh server-chosen code.
    JoinRoom {
        username: String,
        #[serde(default)]
        avatar: String,
        #[serde(alias = "roomId")]
        room_id: String,
    },

    /// Host only: begin a match from the lobby.
    StartGame {
        #[serde(alias = "roomId")]
        room_id: String,
    },

    /// Drawer only: pick one of the offered words.
    WordChosen {
        #[serde(alias = "roomId")]
        room_id: String,
        word: String,
    },

    /// Drawer only: one stroke segment.
    Draw {
        #[serde(alias = "roomId")]
        room_id: String,
        segment: StrokeSegment,
    },

    /// Drawer only: wipe the canvas.
    ClearCanvas {
        #[serde(alias = "roomId")]
        room_id: String,
    },

    /// Drawer only: flood the canvas with one color.
    FillBackground {
        #[serde(alias = "roomId")]
        room_id: String,
        color: String,
    },

    /// A guess, or ordinary chat if it does not match the word.
    Guess {
        #[serde(alias = "roomId")]
        room_id: String,
        text: String,
    },

    /// Host only: remove another player.
    KickPlayer {
        #[serde(alias = "roomId")]
        room_id: String,
        target_id: PlayerId,
    },

    /// Host only, lobby only: change match settings.
    UpdateSettings {
        #[serde(alias = "roomId")]
        room_id: String,
        settings: SettingsUpdate,
    },

    /// Leave the room voluntarily.
    LeaveRoom {
        #[serde(alias = "roomId")]
        room_id: String,
    },

    /// Keepalive. Answered with [`ServerMessage::HeartbeatAck`].
    Heartbeat { client_time: u64 },
}

impl ClientMessage {
    /// The room code this message targets, if it targets one.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Self::JoinRoom { room_id, .. }
            | Self::StartGame { room_id }
            | Self::WordChosen { room_id, .. }
            | Self::Draw { room_id, .. }
            | Self::ClearCanvas { room_id }
            | Self::FillBackground { room_id, .. }
            | Self::Guess { room_id, .. }
            | Self::KickPlayer { room_id, .. }
            | Self::UpdateSettings { room_id, .. }
            | Self::LeaveRoom { room_id } => Some(room_id),
            Self::Heartbeat { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Messages the server pushes to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full room state for this recipient. Sent after every change.
    RoomUpdate(RoomSnapshot),

    /// A request was refused (room full, bad name, …).
    RoomError { message: String },

    /// Countdown tick for the current phase.
    TimerUpdate { seconds_remaining: u32 },

    /// Private to the drawer: the words they may choose from.
    ChooseWordOptions { words: Vec<String> },

    /// Masked word for guessers, e.g. `_ p _ l _`.
    WordHint { hint: String },

    /// A stroke segment relayed from the drawer.
    DrawUpdate { segment: StrokeSegment },

    /// Private to a late joiner: every segment drawn so far this turn.
    StrokeReplay { segments: Vec<StrokeSegment> },

    CanvasCleared,

    FillBackground { color: String },

    /// A guess that did not match, shown as chat.
    ChatMessage {
        player_id: PlayerId,
        username: String,
        message: String,
    },

    /// Someone guessed the word. The word itself is not included.
    CorrectGuess { player_id: PlayerId, username: String },

    /// The turn ended and the word is revealed.
    RoundEnded {
        word: String,
        players: Vec<RoundResult>,
    },

    /// A word was chosen and drawing has begun.
    GameStarted {
        drawer_id: PlayerId,
        round: u32,
        word_length: usize,
    },

    /// Final leaderboard, best first.
    GameOver { ranking: Vec<Standing> },

    /// Sent once to the joining player: who they are and where.
    RoomJoined {
        room_id: RoomCode,
        player_id: PlayerId,
    },

    /// The host removed you. The connection stays open.
    Kicked,

    HeartbeatAck { client_time: u64, server_time: u64 },
}

impl ServerMessage {
    /// Shorthand for [`ServerMessage::RoomError`].
    pub fn error(message: impl Into<String>) -> Self {
        Self::RoomError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Emotion, Phase, PlayerView};

    #[test]
    fn test_client_join_room_decodes_without_avatar() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"join_room","username":"ada","room_id":"abcd"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::JoinRoom {
                username: "ada".into(),
                avatar: String::new(),
                room_id: "abcd".into(),
            }
        );
    }

    #[test]
    fn test_client_draw_decodes_camel_case_client_fields() {
        let msg: ClientMessage = serde_json::from_str(
            r##"{"type":"draw","roomId":"ABCD","segment":
                {"x0":0,"y0":0,"x1":10,"y1":10,"color":"#ef4444","lineWidth":4}}"##,
        )
        .unwrap();
        match msg {
            ClientMessage::Draw { room_id, segment } => {
                assert_eq!(room_id, "ABCD");
                assert_eq!(segment.x1, 10.0);
                assert_eq!(segment.line_width, 4.0);
            }
            other => panic!("expected Draw, got {other:?}"),
        }
    }

    #[test]
    fn test_client_unknown_type_is_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"reveal_word","room_id":"ABCD"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_client_room_id_accessor() {
        let msg = ClientMessage::ClearCanvas { room_id: "WXYZ".into() };
        assert_eq!(msg.room_id(), Some("WXYZ"));
        assert_eq!(ClientMessage::Heartbeat { client_time: 1 }.room_id(), None);
    }

    #[test]
    fn test_server_correct_guess_shape() {
        let msg = ServerMessage::CorrectGuess {
            player_id: PlayerId(3),
            username: "bo".into(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "correct_guess");
        assert_eq!(value["player_id"], 3);
        assert_eq!(value["username"], "bo");
        assert!(value.get("word").is_none());
    }

    #[test]
    fn test_server_room_update_flattens_snapshot_fields() {
        let snapshot = RoomSnapshot {
            room_id: RoomCode::parse("ABCD").unwrap(),
            phase: Phase::Lobby,
            round: 0,
            max_rounds: 3,
            turn_time_secs: 60,
            players: vec![PlayerView {
                id: PlayerId(1),
                username: "ada".into(),
                avatar: "seed".into(),
                score: 0,
                emotion: Emotion::Neutral,
                is_host: true,
            }],
            current_drawer: None,
            guessed: vec![],
            word: None,
            hint: None,
            seconds_remaining: None,
        };
        let value = serde_json::to_value(ServerMessage::RoomUpdate(snapshot)).unwrap();
        assert_eq!(value["type"], "room_update");
        assert_eq!(value["room_id"], "ABCD");
        assert_eq!(value["phase"], "lobby");
        assert_eq!(value["players"][0]["is_host"], true);
    }
}
