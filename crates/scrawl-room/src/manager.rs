//! Room manager: creates rooms on first join and forgets them once their
//! actor stops.

use std::collections::HashMap;

use scrawl_protocol::{PlayerId, RoomCode};

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Registry of live rooms, keyed by room code.
///
/// Rooms are created lazily the first time someone joins a code and stop
/// by themselves when their last player leaves; the manager notices on its
/// next lookup and drops the dead handle. It does not track which player
/// is where; that is the session gateway's job.
pub struct RoomManager {
    rooms: HashMap<RoomCode, RoomHandle>,
    config: RoomConfig,
}

impl RoomManager {
    /// Creates an empty manager. Every room gets a copy of `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            config,
        }
    }

    /// Joins `player_id` to room `code`, creating it if needed.
    ///
    /// If the existing room stopped between lookup and join (its last
    /// player just left), a fresh room is created and the join retried
    /// once.
    pub async fn join(
        &mut self,
        code: &RoomCode,
        player_id: PlayerId,
        username: String,
        avatar: String,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        let handle = self.get_or_create(code);
        match handle
            .join(player_id, username.clone(), avatar.clone(), sender.clone())
            .await
        {
            Err(RoomError::Unavailable(_)) => {
                tracing::debug!(room_id = %code, "room stopped during join, recreating");
                self.rooms.remove(code);
                let handle = self.get_or_create(code);
                handle.join(player_id, username, avatar, sender).await?;
                Ok(handle)
            }
            Err(e) => Err(e),
            Ok(()) => Ok(handle),
        }
    }

    fn get_or_create(&mut self, code: &RoomCode) -> RoomHandle {
        if let Some(handle) = self.rooms.get(code) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }
        let handle = spawn_room(code.clone(), self.config.clone());
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(room_id = %code, "room created");
        handle
    }

    /// Handle to a live room.
    pub fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).filter(|h| !h.is_closed()).cloned()
    }

    /// Returns `true` if a live room uses `code`.
    pub fn contains(&self, code: &RoomCode) -> bool {
        self.get(code).is_some()
    }

    /// Forgets rooms whose actor has stopped. Returns how many were
    /// removed.
    pub fn prune(&mut self) -> usize {
        let before = self.rooms.len();
        self.rooms.retain(|code, handle| {
            let live = !handle.is_closed();
            if !live {
                tracing::info!(room_id = %code, "room destroyed");
            }
            live
        });
        before - self.rooms.len()
    }

    /// Info for every live room. Rooms that stop while being queried are
    /// skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.get_info().await {
                infos.push(info);
            }
        }
        infos
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.values().filter(|h| !h.is_closed()).count()
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
