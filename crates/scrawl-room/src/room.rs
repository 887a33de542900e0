//! Room actor: an isolated Tokio task that owns one [`RoomStateMachine`]
//! and its [`RoundTimer`].
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands and timer ticks are handled one at a
//! time in a single `select!` loop, so no two changes to a room ever
//! interleave and no locks are needed.

use std::collections::HashMap;

use scrawl_protocol::{
    ClientMessage, Phase, PlayerId, RoomCode, RoomSnapshot, ServerMessage, SettingsUpdate,
    StrokeSegment,
};
use scrawl_tick::{RoundTimer, TimerConfig, TimerEvent};
use tokio::sync::{mpsc, oneshot};

use crate::{Effect, RoomConfig, RoomError, RoomStateMachine};

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// A gameplay request from a member of the room.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    StartGame,
    ChooseWord(String),
    Draw(StrokeSegment),
    ClearCanvas,
    FillBackground(String),
    Guess(String),
    Kick(PlayerId),
    UpdateSettings(SettingsUpdate),
}

impl PlayerAction {
    /// Extracts the gameplay part of a client message.
    ///
    /// Returns `None` for messages that are not room actions (joining,
    /// leaving, heartbeats).
    pub fn from_message(msg: ClientMessage) -> Option<Self> {
        Some(match msg {
            ClientMessage::StartGame { .. } => Self::StartGame,
            ClientMessage::WordChosen { word, .. } => Self::ChooseWord(word),
            ClientMessage::Draw { segment, .. } => Self::Draw(segment),
            ClientMessage::ClearCanvas { .. } => Self::ClearCanvas,
            ClientMessage::FillBackground { color, .. } => Self::FillBackground(color),
            ClientMessage::Guess { text, .. } => Self::Guess(text),
            ClientMessage::KickPlayer { target_id, .. } => Self::Kick(target_id),
            ClientMessage::UpdateSettings { settings, .. } => Self::UpdateSettings(settings),
            ClientMessage::JoinRoom { .. }
            | ClientMessage::LeaveRoom { .. }
            | ClientMessage::Heartbeat { .. } => return None,
        })
    }
}

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the response on it.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        username: String,
        avatar: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Fire-and-forget gameplay request.
    Action {
        player_id: PlayerId,
        action: PlayerAction,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    Snapshot {
        player_id: PlayerId,
        reply: oneshot::Sender<Option<RoomSnapshot>>,
    },
}

/// Room metadata, without any per-player view.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomCode,
    pub phase: Phase,
    pub round: u32,
    pub player_count: usize,
    pub max_players: usize,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone (an `mpsc::Sender` wrapper). Connection handlers keep one
/// after joining so gameplay traffic goes straight to the room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomCode {
        &self.room_id
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Adds a player. Their messages arrive on `sender` from now on.
    pub async fn join(
        &self,
        player_id: PlayerId,
        username: String,
        avatar: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                username,
                avatar,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    /// Removes a player.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    /// Queues a gameplay request (fire-and-forget).
    pub async fn act(&self, player_id: PlayerId, action: PlayerAction) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { player_id, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// The room as `player_id` sees it, or `None` if they are not a member.
    pub async fn snapshot(&self, player_id: PlayerId) -> Result<Option<RoomSnapshot>, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    machine: RoomStateMachine,
    timer: RoundTimer,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until the last player leaves.
    async fn run(mut self) {
        let room_id = self.machine.code().clone();
        tracing::info!(%room_id, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    self.handle_command(cmd);
                }
                event = self.timer.wait_for_tick() => {
                    self.handle_timer(event);
                }
            }
            if self.machine.is_empty() {
                break;
            }
        }

        // Dropping the actor drops the timer and closes the command queue,
        // so late commands resolve to `RoomError::Unavailable`.
        tracing::info!(%room_id, "room actor stopped");
    }

    fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                player_id,
                username,
                avatar,
                sender,
                reply,
            } => {
                let result = self.machine.join(player_id, username, avatar);
                if result.is_ok() {
                    self.senders.insert(player_id, sender);
                }
                let _ = reply.send(result);
            }
            RoomCommand::Leave { player_id, reply } => {
                let result = if self.machine.leave(player_id) {
                    Ok(())
                } else {
                    Err(RoomError::NotInRoom(player_id, self.machine.code().clone()))
                };
                let _ = reply.send(result);
            }
            RoomCommand::Action { player_id, action } => {
                self.handle_action(player_id, action);
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Snapshot { player_id, reply } => {
                let snapshot = self
                    .machine
                    .contains(player_id)
                    .then(|| self.machine.snapshot_for(player_id));
                let _ = reply.send(snapshot);
            }
        }
        self.apply_effects();
    }

    fn handle_action(&mut self, player_id: PlayerId, action: PlayerAction) {
        if !self.machine.contains(player_id) {
            tracing::warn!(
                room_id = %self.machine.code(),
                %player_id,
                "action from non-member, ignoring"
            );
            return;
        }
        let m = &mut self.machine;
        match action {
            PlayerAction::StartGame => m.start_game(player_id),
            PlayerAction::ChooseWord(word) => m.choose_word(player_id, &word),
            PlayerAction::Draw(segment) => m.draw(player_id, segment),
            PlayerAction::ClearCanvas => m.clear_canvas(player_id),
            PlayerAction::FillBackground(color) => m.fill_background(player_id, color),
            PlayerAction::Guess(text) => m.submit_guess(player_id, &text),
            PlayerAction::Kick(target) => m.kick(player_id, target),
            PlayerAction::UpdateSettings(update) => m.update_settings(player_id, update),
        }
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        if event.expired {
            self.machine.on_timer_expired(event.phase);
        } else {
            self.machine.on_timer_tick(event.phase, event.remaining);
        }
        self.apply_effects();
    }

    /// Drains the state machine's effects until it is quiet.
    ///
    /// A recipient whose channel is closed is removed through the normal
    /// leave path after the batch, which may queue more effects.
    fn apply_effects(&mut self) {
        loop {
            let effects = self.machine.take_effects();
            if effects.is_empty() {
                return;
            }

            let mut gone: Vec<PlayerId> = Vec::new();
            for effect in effects {
                match effect {
                    Effect::Send(recipient, msg) => {
                        for (pid, tx) in &self.senders {
                            if recipient.includes(*pid) && tx.send(msg.clone()).is_err() {
                                gone.push(*pid);
                            }
                        }
                    }
                    Effect::Release(pid) => {
                        self.senders.remove(&pid);
                    }
                    Effect::ArmTimer(phase, seconds) => self.timer.arm(phase, seconds),
                    Effect::CancelTimer => self.timer.cancel(),
                }
            }

            gone.sort();
            gone.dedup();
            for pid in gone {
                tracing::warn!(
                    room_id = %self.machine.code(),
                    player_id = %pid,
                    "delivery failed, removing player"
                );
                self.senders.remove(&pid);
                self.machine.leave(pid);
            }
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.machine.code().clone(),
            phase: self.machine.phase(),
            round: self.machine.round(),
            player_count: self.machine.len(),
            max_players: self.machine.config().max_players,
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `config.channel_size` controls backpressure: if the queue fills up,
/// senders wait.
pub(crate) fn spawn_room(room_id: RoomCode, config: RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let timer = RoundTimer::new(TimerConfig {
        tick_interval: config.tick_interval,
    });

    let actor = RoomActor {
        machine: RoomStateMachine::new(room_id.clone(), config),
        timer,
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}
