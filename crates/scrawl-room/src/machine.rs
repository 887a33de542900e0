//! The authoritative state of one room.
//!
//! [`RoomStateMachine`] is plain synchronous code: every operation mutates
//! the room and queues [`Effect`]s (messages to deliver, timer changes,
//! channels to release) instead of performing I/O. The room actor drains
//! them with [`RoomStateMachine::take_effects`] after each operation. This
//! keeps every rule of the game testable without a runtime.
//!
//! Requests that are unauthorized or arrive in the wrong phase are dropped
//! with a `debug!` line and produce no effects, so a stale or misbehaving
//! client learns nothing from probing.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use scrawl_protocol::{
    Emotion, Phase, PlayerId, PlayerView, Recipient, RoomCode, RoomSnapshot, RoundResult,
    ServerMessage, Settings, SettingsUpdate, Standing, StrokeSegment,
};
use scrawl_tick::TimerPhase;
use tracing::{debug, info};

use crate::guess::{self, DRAWER_BONUS, GuessOutcome};
use crate::stroke::{self, StrokeLog};
use crate::{RoomConfig, RoomError, hint, words};

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Something the room actor must do on the state machine's behalf.
///
/// Effects are applied in the order they were queued.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver a message to every member `Recipient` selects.
    Send(Recipient, ServerMessage),
    /// Drop the player's outbound channel. Queued when a player is removed,
    /// after any message addressed to them alone.
    Release(PlayerId),
    /// Start a countdown, replacing the running one.
    ArmTimer(TimerPhase, u32),
    /// Stop the running countdown.
    CancelTimer,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A member of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub avatar: String,
    pub score: u32,
    pub emotion: Emotion,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// All authoritative state of one room, and the only code that changes it.
pub struct RoomStateMachine {
    code: RoomCode,
    config: RoomConfig,
    settings: Settings,
    rng: StdRng,

    /// Join order. Index 0 is the host.
    players: Vec<Player>,
    phase: Phase,
    /// 0 in the lobby, 1-based during a match.
    round: u32,
    /// Roster index of the next drawer. Shifted on removal so nobody is
    /// skipped.
    next_drawer: usize,
    drawer: Option<PlayerId>,
    word: Option<String>,
    options: Vec<String>,
    guessed: Vec<PlayerId>,
    strokes: StrokeLog,
    used_words: HashSet<String>,

    /// Countdown the actor's timer is running, as far as the room knows.
    timer: Option<TimerPhase>,
    seconds_remaining: Option<u32>,
    hint_reveals: usize,

    effects: Vec<Effect>,
}

impl RoomStateMachine {
    /// Creates an empty room in the lobby.
    pub fn new(code: RoomCode, config: RoomConfig) -> Self {
        let config = config.validated();
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            code,
            settings: config.default_settings,
            config,
            rng,
            players: Vec::new(),
            phase: Phase::Lobby,
            round: 0,
            next_drawer: 0,
            drawer: None,
            word: None,
            options: Vec::new(),
            guessed: Vec::new(),
            strokes: StrokeLog::new(),
            used_words: HashSet::new(),
            timer: None,
            seconds_remaining: None,
            hint_reveals: 0,
            effects: Vec::new(),
        }
    }

    /// Removes and returns every queued effect.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // -- Membership ---------------------------------------------------------

    /// Adds a player to the roster.
    ///
    /// The joiner gets `room_joined`, then everyone gets a fresh snapshot,
    /// then the joiner alone gets the stroke replay and whatever countdown
    /// or hint is currently showing.
    ///
    /// # Errors
    /// [`RoomError::AlreadyInRoom`] or [`RoomError::RoomFull`]; the room is
    /// unchanged.
    pub fn join(
        &mut self,
        id: PlayerId,
        username: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Result<(), RoomError> {
        if self.contains(id) {
            return Err(RoomError::AlreadyInRoom(id, self.code.clone()));
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        self.players.push(Player {
            id,
            username: username.into(),
            avatar: avatar.into(),
            score: 0,
            emotion: Emotion::Neutral,
        });
        info!(
            room_id = %self.code,
            player_id = %id,
            players = self.players.len(),
            "player joined"
        );

        self.send(
            Recipient::Player(id),
            ServerMessage::RoomJoined {
                room_id: self.code.clone(),
                player_id: id,
            },
        );
        self.broadcast_snapshots();
        self.replay_to(id);
        if let Some(hint) = self.snapshot_hint(id) {
            self.send(Recipient::Player(id), ServerMessage::WordHint { hint });
        }
        if let Some(seconds_remaining) = self.seconds_remaining {
            self.send(
                Recipient::Player(id),
                ServerMessage::TimerUpdate { seconds_remaining },
            );
        }
        Ok(())
    }

    /// Removes a player who left or whose connection failed.
    ///
    /// Returns `false` if they were not a member.
    pub fn leave(&mut self, id: PlayerId) -> bool {
        self.remove_player(id, "left")
    }

    /// Host-only: removes `target` after telling them they were kicked.
    pub fn kick(&mut self, host: PlayerId, target: PlayerId) {
        if self.host() != Some(host) {
            debug!(room_id = %self.code, player_id = %host, "kick from non-host ignored");
            return;
        }
        if target == host || !self.contains(target) {
            debug!(room_id = %self.code, target = %target, "kick target invalid");
            return;
        }
        info!(room_id = %self.code, target = %target, "player kicked");
        self.send(Recipient::Player(target), ServerMessage::Kicked);
        self.remove_player(target, "kicked");
    }

    fn remove_player(&mut self, id: PlayerId, reason: &'static str) -> bool {
        let Some(index) = self.players.iter().position(|p| p.id == id) else {
            debug!(room_id = %self.code, player_id = %id, "remove of non-member ignored");
            return false;
        };

        self.players.remove(index);
        if index < self.next_drawer {
            self.next_drawer -= 1;
        }
        self.guessed.retain(|p| *p != id);
        self.effects.push(Effect::Release(id));
        info!(
            room_id = %self.code,
            player_id = %id,
            reason,
            players = self.players.len(),
            "player removed"
        );

        if self.players.is_empty() {
            self.stop_timer();
            self.return_to_lobby();
            return true;
        }

        if self.drawer == Some(id) && self.phase.has_drawer() {
            self.abandon_turn();
        } else if self.phase == Phase::Drawing && self.all_guessed() {
            self.end_round();
        }
        self.broadcast_snapshots();
        true
    }

    // -- Match flow ---------------------------------------------------------

    /// Host-only, lobby-only: begins the first turn.
    pub fn start_game(&mut self, id: PlayerId) {
        if self.phase != Phase::Lobby {
            debug!(room_id = %self.code, phase = %self.phase, "start_game outside lobby ignored");
            return;
        }
        if self.host() != Some(id) {
            debug!(room_id = %self.code, player_id = %id, "start_game from non-host ignored");
            return;
        }
        if self.players.len() < self.config.min_players {
            debug!(room_id = %self.code, players = self.players.len(), "not enough players to start");
            return;
        }

        for p in &mut self.players {
            p.score = 0;
        }
        self.round = 1;
        self.next_drawer = 0;
        self.used_words.clear();
        info!(
            room_id = %self.code,
            players = self.players.len(),
            max_rounds = self.settings.max_rounds,
            "game started"
        );
        self.begin_choosing();
        self.broadcast_snapshots();
    }

    /// Drawer-only: picks one of the offered words (case-insensitive).
    pub fn choose_word(&mut self, id: PlayerId, word: &str) {
        if self.phase != Phase::ChoosingWord || self.drawer != Some(id) {
            debug!(room_id = %self.code, player_id = %id, "word choice ignored");
            return;
        }
        let wanted = guess::normalize(word);
        let Some(choice) = self
            .options
            .iter()
            .find(|o| guess::normalize(o) == wanted)
            .cloned()
        else {
            debug!(room_id = %self.code, player_id = %id, "word not among options");
            return;
        };
        self.begin_drawing(choice);
        self.broadcast_snapshots();
    }

    /// Host-only, lobby-only: applies a settings change if every provided
    /// field is in range.
    pub fn update_settings(&mut self, id: PlayerId, update: SettingsUpdate) {
        if self.phase != Phase::Lobby || self.host() != Some(id) {
            debug!(room_id = %self.code, player_id = %id, "settings change ignored");
            return;
        }
        let Some(next) = self.settings.with_update(&update) else {
            debug!(room_id = %self.code, ?update, "settings out of range");
            return;
        };
        self.settings = next;
        info!(
            room_id = %self.code,
            max_rounds = next.max_rounds,
            turn_time_secs = next.turn_time_secs,
            "settings updated"
        );
        self.broadcast_snapshots();
    }

    // -- Stroke relay -------------------------------------------------------

    /// Drawer-only, while drawing: records a segment and relays it to
    /// everyone else.
    pub fn draw(&mut self, id: PlayerId, segment: StrokeSegment) {
        if !self.is_drawing(id) {
            debug!(room_id = %self.code, player_id = %id, "draw from non-drawer ignored");
            return;
        }
        if !self.strokes.record(segment.clone()) {
            debug!(room_id = %self.code, "malformed segment ignored");
            return;
        }
        self.send(Recipient::AllExcept(id), ServerMessage::DrawUpdate { segment });
    }

    /// Drawer-only, while drawing: empties the stroke log.
    pub fn clear_canvas(&mut self, id: PlayerId) {
        if !self.is_drawing(id) {
            debug!(room_id = %self.code, player_id = %id, "clear from non-drawer ignored");
            return;
        }
        self.strokes.clear();
        self.send(Recipient::AllExcept(id), ServerMessage::CanvasCleared);
    }

    /// Drawer-only, while drawing: relays a background fill.
    ///
    /// Fills are not recorded, so a player joining afterwards does not see
    /// them until the next clear.
    pub fn fill_background(&mut self, id: PlayerId, color: String) {
        if !self.is_drawing(id) || !stroke::is_valid_color(&color) {
            debug!(room_id = %self.code, player_id = %id, "fill ignored");
            return;
        }
        self.send(Recipient::AllExcept(id), ServerMessage::FillBackground { color });
    }

    /// Sends `id` every segment drawn so far this turn, oldest first.
    pub fn replay_to(&mut self, id: PlayerId) {
        if !self.contains(id) {
            return;
        }
        let segments = self.strokes.segments().to_vec();
        self.send(Recipient::Player(id), ServerMessage::StrokeReplay { segments });
    }

    // -- Guessing -----------------------------------------------------------

    /// Evaluates a guess from a non-drawer during the drawing phase.
    ///
    /// A match credits the guesser once and may end the round; anything
    /// else is relayed as chat.
    pub fn submit_guess(&mut self, id: PlayerId, text: &str) {
        if self.phase != Phase::Drawing || self.drawer == Some(id) {
            debug!(room_id = %self.code, player_id = %id, "guess ignored");
            return;
        }
        if self.guessed.contains(&id) || text.trim().is_empty() {
            return;
        }
        if text.trim().chars().count() > self.config.max_chat_len {
            debug!(room_id = %self.code, player_id = %id, "oversized guess dropped");
            return;
        }
        let Some(username) = self.player(id).map(|p| p.username.clone()) else {
            return;
        };
        let Some(word) = self.word.as_deref() else {
            return;
        };

        match guess::evaluate(text, word) {
            GuessOutcome::Correct => self.credit_guess(id, username),
            GuessOutcome::Chat(message) => self.send(
                Recipient::All,
                ServerMessage::ChatMessage {
                    player_id: id,
                    username,
                    message,
                },
            ),
        }
    }

    fn credit_guess(&mut self, id: PlayerId, username: String) {
        let turn = self.settings.turn_time_secs;
        let elapsed = turn.saturating_sub(self.seconds_remaining.unwrap_or(turn));
        let points = guess::guess_points(elapsed, turn);

        self.guessed.push(id);
        if let Some(p) = self.player_mut(id) {
            p.score += points;
            p.emotion = Emotion::Happy;
        }
        if let Some(drawer) = self.drawer {
            if let Some(d) = self.player_mut(drawer) {
                d.score += DRAWER_BONUS;
                d.emotion = Emotion::Happy;
            }
        }
        info!(room_id = %self.code, player_id = %id, points, elapsed, "correct guess");

        self.send(
            Recipient::All,
            ServerMessage::CorrectGuess {
                player_id: id,
                username,
            },
        );
        if self.all_guessed() {
            self.end_round();
        }
        self.broadcast_snapshots();
    }

    // -- Timer --------------------------------------------------------------

    /// One countdown step for `phase`. Ignored if that countdown is no
    /// longer the room's.
    pub fn on_timer_tick(&mut self, phase: TimerPhase, remaining: u32) {
        if self.timer != Some(phase) {
            debug!(room_id = %self.code, %phase, "stale timer tick");
            return;
        }
        if phase.is_visible() {
            self.seconds_remaining = Some(remaining);
            self.send(
                Recipient::All,
                ServerMessage::TimerUpdate {
                    seconds_remaining: remaining,
                },
            );
        }
        if phase == TimerPhase::Drawing {
            self.advance_hint();
        }
    }

    /// The countdown for `phase` reached zero.
    pub fn on_timer_expired(&mut self, phase: TimerPhase) {
        if self.timer != Some(phase) {
            debug!(room_id = %self.code, %phase, "stale timer expiry");
            return;
        }
        self.timer = None;
        if phase.is_visible() {
            self.seconds_remaining = Some(0);
            self.send(
                Recipient::All,
                ServerMessage::TimerUpdate {
                    seconds_remaining: 0,
                },
            );
        }

        match (phase, self.phase) {
            (TimerPhase::WordSelection, Phase::ChoosingWord) => {
                match self.options.choose(&mut self.rng).cloned() {
                    Some(word) => {
                        debug!(room_id = %self.code, "drawer did not choose, picking for them");
                        self.begin_drawing(word);
                    }
                    None => self.advance_turn(),
                }
            }
            (TimerPhase::Drawing, Phase::Drawing) => self.end_round(),
            (TimerPhase::RoundEndPause, Phase::RoundEnd) => self.advance_turn(),
            (TimerPhase::GameOverPause, Phase::GameOver) => self.return_to_lobby(),
            (phase, room_phase) => {
                debug!(room_id = %self.code, %phase, %room_phase, "expiry does not match phase");
                return;
            }
        }
        self.broadcast_snapshots();
    }

    // -- Transitions --------------------------------------------------------

    fn begin_choosing(&mut self) {
        let index = self.next_drawer % self.players.len();
        let drawer = self.players[index].id;
        self.next_drawer = index + 1;

        self.phase = Phase::ChoosingWord;
        self.drawer = Some(drawer);
        self.word = None;
        self.guessed.clear();
        self.hint_reveals = 0;
        for p in &mut self.players {
            p.emotion = Emotion::Neutral;
        }
        self.options = words::pick_candidates(
            &mut self.rng,
            &self.config.word_bank,
            &mut self.used_words,
            self.config.word_choices,
        );

        info!(room_id = %self.code, round = self.round, drawer = %drawer, "turn started");
        self.send(
            Recipient::Player(drawer),
            ServerMessage::ChooseWordOptions {
                words: self.options.clone(),
            },
        );
        self.arm(TimerPhase::WordSelection, self.config.word_selection_secs);
    }

    fn begin_drawing(&mut self, word: String) {
        let Some(drawer) = self.drawer else {
            return;
        };
        self.used_words.insert(word.clone());
        self.options.clear();
        self.guessed.clear();
        self.hint_reveals = 0;
        self.strokes.clear();
        self.phase = Phase::Drawing;

        let word_length = word.chars().count();
        let hint = hint::mask(&word, 0);
        self.word = Some(word);

        info!(room_id = %self.code, round = self.round, drawer = %drawer, "drawing started");
        self.send(Recipient::All, ServerMessage::CanvasCleared);
        self.send(
            Recipient::All,
            ServerMessage::GameStarted {
                drawer_id: drawer,
                round: self.round,
                word_length,
            },
        );
        self.send(Recipient::AllExcept(drawer), ServerMessage::WordHint { hint });
        self.arm(TimerPhase::Drawing, self.settings.turn_time_secs);
    }

    fn end_round(&mut self) {
        let Some(word) = self.word.clone() else {
            return;
        };
        self.stop_timer();

        let drawer = self.drawer.take();
        for p in &mut self.players {
            if Some(p.id) != drawer && !self.guessed.contains(&p.id) {
                p.emotion = Emotion::Sad;
            }
        }
        self.phase = Phase::RoundEnd;

        let players = self
            .players
            .iter()
            .map(|p| RoundResult {
                id: p.id,
                username: p.username.clone(),
                score: p.score,
                guessed: self.guessed.contains(&p.id),
            })
            .collect();

        info!(
            room_id = %self.code,
            round = self.round,
            guessed = self.guessed.len(),
            "round ended"
        );
        self.send(Recipient::All, ServerMessage::RoundEnded { word, players });
        self.arm(TimerPhase::RoundEndPause, self.config.round_end_pause_secs);
    }

    /// Ends the turn without a reveal because the drawer is gone.
    fn abandon_turn(&mut self) {
        info!(room_id = %self.code, round = self.round, "drawer left, turn abandoned");
        self.stop_timer();
        self.drawer = None;
        self.word = None;
        self.options.clear();
        self.guessed.clear();
        self.advance_turn();
    }

    fn advance_turn(&mut self) {
        if self.round >= self.settings.max_rounds {
            self.enter_game_over();
        } else {
            self.round += 1;
            self.begin_choosing();
        }
    }

    fn enter_game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.drawer = None;
        self.word = None;
        self.options.clear();
        self.guessed.clear();

        let mut order: Vec<&Player> = self.players.iter().collect();
        // Stable: equal scores keep join order.
        order.sort_by(|a, b| b.score.cmp(&a.score));
        let ranking: Vec<Standing> = order
            .iter()
            .enumerate()
            .map(|(i, p)| Standing {
                rank: i as u32 + 1,
                id: p.id,
                username: p.username.clone(),
                score: p.score,
            })
            .collect();

        info!(
            room_id = %self.code,
            winner = ?ranking.first().map(|s| s.id),
            "game over"
        );
        self.send(Recipient::All, ServerMessage::GameOver { ranking });
        self.arm(TimerPhase::GameOverPause, self.config.game_over_pause_secs);
    }

    fn return_to_lobby(&mut self) {
        self.phase = Phase::Lobby;
        self.round = 0;
        self.next_drawer = 0;
        self.drawer = None;
        self.word = None;
        self.options.clear();
        self.guessed.clear();
        self.strokes.clear();
        self.used_words.clear();
        self.hint_reveals = 0;
        for p in &mut self.players {
            p.score = 0;
            p.emotion = Emotion::Neutral;
        }
        if !self.players.is_empty() {
            info!(room_id = %self.code, "back to lobby");
        }
    }

    fn advance_hint(&mut self) {
        let (Some(word), Some(remaining), Some(drawer)) =
            (self.word.as_deref(), self.seconds_remaining, self.drawer)
        else {
            return;
        };
        let turn = self.settings.turn_time_secs;
        let due = hint::reveals_due(word, turn.saturating_sub(remaining), turn);
        if due <= self.hint_reveals {
            return;
        }
        let hint = hint::mask(word, due);
        self.hint_reveals = due;
        self.send(Recipient::AllExcept(drawer), ServerMessage::WordHint { hint });
        // The mask is part of every guesser's snapshot.
        self.broadcast_snapshots();
    }

    fn arm(&mut self, phase: TimerPhase, seconds: u32) {
        self.timer = Some(phase);
        self.seconds_remaining = phase.is_visible().then_some(seconds);
        self.effects.push(Effect::ArmTimer(phase, seconds));
    }

    fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            self.effects.push(Effect::CancelTimer);
        }
        self.seconds_remaining = None;
    }

    // -- Snapshots ----------------------------------------------------------

    /// The room as `viewer` is allowed to see it.
    pub fn snapshot_for(&self, viewer: PlayerId) -> RoomSnapshot {
        let word = if self.can_see_word(viewer) {
            self.word.clone()
        } else {
            None
        };
        RoomSnapshot {
            room_id: self.code.clone(),
            phase: self.phase,
            round: self.round,
            max_rounds: self.settings.max_rounds,
            turn_time_secs: self.settings.turn_time_secs,
            players: self
                .players
                .iter()
                .enumerate()
                .map(|(i, p)| PlayerView {
                    id: p.id,
                    username: p.username.clone(),
                    avatar: p.avatar.clone(),
                    score: p.score,
                    emotion: p.emotion,
                    is_host: i == 0,
                })
                .collect(),
            current_drawer: self.drawer,
            guessed: self.guessed.clone(),
            word,
            hint: self.snapshot_hint(viewer),
            seconds_remaining: self.seconds_remaining,
        }
    }

    fn can_see_word(&self, viewer: PlayerId) -> bool {
        match self.phase {
            Phase::RoundEnd => true,
            Phase::Drawing => self.drawer == Some(viewer) || self.guessed.contains(&viewer),
            _ => false,
        }
    }

    fn snapshot_hint(&self, viewer: PlayerId) -> Option<String> {
        if self.phase != Phase::Drawing || self.can_see_word(viewer) {
            return None;
        }
        self.word.as_deref().map(|w| hint::mask(w, self.hint_reveals))
    }

    fn broadcast_snapshots(&mut self) {
        let ids: Vec<PlayerId> = self.players.iter().map(|p| p.id).collect();
        for id in ids {
            let snapshot = self.snapshot_for(id);
            self.send(Recipient::Player(id), ServerMessage::RoomUpdate(snapshot));
        }
    }

    // -- Helpers ------------------------------------------------------------

    fn send(&mut self, to: Recipient, msg: ServerMessage) {
        self.effects.push(Effect::Send(to, msg));
    }

    fn is_drawing(&self, id: PlayerId) -> bool {
        self.phase == Phase::Drawing && self.drawer == Some(id)
    }

    fn all_guessed(&self) -> bool {
        self.players
            .iter()
            .filter(|p| Some(p.id) != self.drawer)
            .all(|p| self.guessed.contains(&p.id))
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    // -- Accessors ----------------------------------------------------------

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn current_drawer(&self) -> Option<PlayerId> {
        self.drawer
    }

    /// The secret word, in `drawing` and `round_end` only.
    pub fn current_word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    /// Candidates offered to the drawer during `choosing_word`.
    pub fn word_options(&self) -> &[String] {
        &self.options
    }

    /// Players who guessed this turn, in guessing order.
    pub fn guessed(&self) -> &[PlayerId] {
        &self.guessed
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The host is whoever is first in join order.
    pub fn host(&self) -> Option<PlayerId> {
        self.players.first().map(|p| p.id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn strokes(&self) -> &[StrokeSegment] {
        self.strokes.segments()
    }

    pub fn timer_phase(&self) -> Option<TimerPhase> {
        self.timer
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.seconds_remaining
    }
}
