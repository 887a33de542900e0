//! The session gateway: the single entry point from connections into
//! rooms.
//!
//! # Concurrency note
//!
//! `SessionGateway` is a plain struct with a `HashMap` inside. The server
//! wraps it in a `tokio::sync::Mutex` shared by every connection handler;
//! gameplay traffic bypasses it entirely through the [`RoomHandle`] that
//! [`join`](SessionGateway::join) returns.

use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;
use scrawl_protocol::{PlayerId, RoomCode};
use scrawl_room::{PlayerSender, RoomConfig, RoomHandle, RoomInfo, RoomManager};

use crate::{GatewayConfig, GatewayError, JoinRequest, Session};

const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Validates join requests and tracks which room each player is in.
///
/// ## Lifecycle
///
/// ```text
/// join() ──→ [in room] ──→ leave()    (player asked, or disconnected)
///                 │
///                 └──────→ detach()   (room already removed them: kick)
/// ```
pub struct SessionGateway {
    rooms: RoomManager,
    sessions: HashMap<PlayerId, Session>,
    config: GatewayConfig,
}

impl SessionGateway {
    pub fn new(config: GatewayConfig, room_config: RoomConfig) -> Self {
        Self {
            rooms: RoomManager::new(room_config),
            sessions: HashMap::new(),
            config,
        }
    }

    /// Puts `player_id` into the requested room, creating it on first use.
    /// A blank room code creates a room under a fresh code.
    ///
    /// Outbound messages for the player go to `sender` from now on. The
    /// returned handle is how the caller forwards the player's gameplay
    /// actions.
    ///
    /// # Errors
    /// - [`GatewayError::AlreadyJoined`] if the player is already in a room
    /// - [`GatewayError::InvalidRoomCode`] / [`GatewayError::InvalidUsername`]
    ///   for malformed input
    /// - [`GatewayError::Room`] if the room refuses (e.g. it is full)
    pub async fn join(
        &mut self,
        player_id: PlayerId,
        request: JoinRequest,
        sender: PlayerSender,
    ) -> Result<RoomHandle, GatewayError> {
        if let Some(existing) = self.sessions.get(&player_id) {
            let current = existing.room_id.clone();
            if self.is_member(&current, player_id).await {
                return Err(GatewayError::AlreadyJoined(player_id, current));
            }
            // The room already let go of them (a kick not yet seen by the
            // connection, or a stopped room).
            tracing::debug!(room_id = %current, %player_id, "dropping stale session");
            self.sessions.remove(&player_id);
        }

        let room_id = if request.room_id.trim().is_empty() {
            self.generate_room_code()
        } else {
            RoomCode::parse(&request.room_id)?
        };
        let username = self.validate_username(&request.username)?;
        let avatar = self.clamp_avatar(&request.avatar);

        let handle = self
            .rooms
            .join(&room_id, player_id, username.clone(), avatar, sender)
            .await?;

        tracing::info!(%room_id, %player_id, %username, "session started");
        self.sessions.insert(
            player_id,
            Session {
                player_id,
                room_id,
                username,
                joined_at: Instant::now(),
            },
        );
        Ok(handle)
    }

    /// Takes `player_id` out of their room.
    ///
    /// A room that has already stopped or already dropped the player is not
    /// an error; the session is forgotten either way.
    ///
    /// # Errors
    /// Returns [`GatewayError::NotJoined`] if the player is not in a room.
    pub async fn leave(&mut self, player_id: PlayerId) -> Result<Session, GatewayError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(GatewayError::NotJoined(player_id))?;

        if let Some(handle) = self.rooms.get(&session.room_id) {
            if let Err(e) = handle.leave(player_id).await {
                tracing::debug!(
                    room_id = %session.room_id,
                    %player_id,
                    error = %e,
                    "room already released player"
                );
            }
        }
        self.rooms.prune();

        tracing::info!(
            room_id = %session.room_id,
            %player_id,
            secs = session.joined_at.elapsed().as_secs(),
            "session ended"
        );
        Ok(session)
    }

    /// Forgets `player_id`'s session without telling the room.
    ///
    /// Used when the room removed the player on its own, as after a kick.
    pub fn detach(&mut self, player_id: PlayerId) -> Option<Session> {
        let session = self.sessions.remove(&player_id)?;
        tracing::info!(room_id = %session.room_id, %player_id, "player detached");
        self.rooms.prune();
        Some(session)
    }

    /// Room code `player_id` is currently in.
    pub fn room_of(&self, player_id: PlayerId) -> Option<&RoomCode> {
        self.sessions.get(&player_id).map(|s| &s.room_id)
    }

    pub fn session(&self, player_id: PlayerId) -> Option<&Session> {
        self.sessions.get(&player_id)
    }

    /// A random code that no live room is using.
    pub fn generate_room_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        let len = self.config.room_code_len.clamp(RoomCode::MIN_LEN, RoomCode::MAX_LEN);
        loop {
            let raw: String = (0..len)
                .map(|_| {
                    let i = rng.random_range(0..ROOM_CODE_ALPHABET.len());
                    char::from(ROOM_CODE_ALPHABET[i])
                })
                .collect();
            if let Ok(code) = RoomCode::parse(&raw) {
                if !self.rooms.contains(&code) {
                    return code;
                }
            }
        }
    }

    /// Info for every live room.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        self.rooms.list_rooms().await
    }

    pub fn room_count(&self) -> usize {
        self.rooms.room_count()
    }

    /// Number of players currently in a room.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Whether the live room `code` still lists `player_id`.
    async fn is_member(&self, code: &RoomCode, player_id: PlayerId) -> bool {
        match self.rooms.get(code) {
            Some(handle) => matches!(handle.snapshot(player_id).await, Ok(Some(_))),
            None => false,
        }
    }

    fn validate_username(&self, raw: &str) -> Result<String, GatewayError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(GatewayError::InvalidUsername("username is required".into()));
        }
        if name.chars().count() > self.config.max_username_len {
            return Err(GatewayError::InvalidUsername(format!(
                "at most {} characters",
                self.config.max_username_len
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(GatewayError::InvalidUsername(
                "control characters are not allowed".into(),
            ));
        }
        Ok(name.to_string())
    }

    fn clamp_avatar(&self, raw: &str) -> String {
        raw.chars().take(self.config.max_avatar_len).collect()
    }
}

impl Default for SessionGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default(), RoomConfig::default())
    }
}
