//! Rule-level tests for the room state machine.
//!
//! The machine is synchronous, so timers are simulated by calling
//! `on_timer_tick` / `on_timer_expired` directly.

use scrawl_protocol::{
    Emotion, Phase, PlayerId, Recipient, RoomCode, RoomSnapshot, ServerMessage, SettingsUpdate,
    StrokeSegment,
};
use scrawl_room::{Effect, RoomConfig, RoomError, RoomStateMachine};
use scrawl_tick::TimerPhase;

// =========================================================================
// Helpers
// =========================================================================

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);
const CAROL: PlayerId = PlayerId(3);
const DAVE: PlayerId = PlayerId(4);

fn config() -> RoomConfig {
    RoomConfig {
        word_bank: vec!["APPLE".into(), "BANANA".into(), "CHERRY".into()],
        rng_seed: Some(42),
        ..RoomConfig::default()
    }
}

fn room(players: &[PlayerId]) -> RoomStateMachine {
    room_with_config(players, config())
}

fn room_with_config(players: &[PlayerId], config: RoomConfig) -> RoomStateMachine {
    let mut m = RoomStateMachine::new(RoomCode::parse("ABC123").unwrap(), config);
    for id in players {
        m.join(*id, format!("player{}", id.0), "seed").unwrap();
    }
    m.take_effects();
    m
}

/// Every message the given player would receive from `effects`.
fn inbox(effects: &[Effect], player: PlayerId) -> Vec<ServerMessage> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Send(to, msg) if to.includes(player) => Some(msg.clone()),
            _ => None,
        })
        .collect()
}

fn last_snapshot(effects: &[Effect], player: PlayerId) -> RoomSnapshot {
    inbox(effects, player)
        .into_iter()
        .rev()
        .find_map(|m| match m {
            ServerMessage::RoomUpdate(s) => Some(s),
            _ => None,
        })
        .expect("no snapshot for player")
}

fn replay_of(effects: &[Effect], player: PlayerId) -> Vec<StrokeSegment> {
    inbox(effects, player)
        .into_iter()
        .find_map(|msg| match msg {
            ServerMessage::StrokeReplay { segments } => Some(segments),
            _ => None,
        })
        .expect("no replay for player")
}

fn seg(x: f32) -> StrokeSegment {
    StrokeSegment {
        x0: x,
        y0: x,
        x1: x + 5.0,
        y1: x + 5.0,
        color: "#ef4444".into(),
        line_width: 4.0,
    }
}

/// Starts the game and has the first drawer pick `word`.
fn start_drawing(m: &mut RoomStateMachine, host: PlayerId, word: &str) {
    m.start_game(host);
    let drawer = m.current_drawer().unwrap();
    m.choose_word(drawer, word);
    assert_eq!(m.phase(), Phase::Drawing);
    m.take_effects();
}

/// Runs a countdown of `steps` to completion.
fn run_timer(m: &mut RoomStateMachine, phase: TimerPhase, steps: u32) {
    for remaining in (1..steps).rev() {
        m.on_timer_tick(phase, remaining);
    }
    m.on_timer_expired(phase);
}

/// Finishes the current drawing turn by timeout and waits out the pause.
fn finish_turn(m: &mut RoomStateMachine) {
    let turn = m.settings().turn_time_secs;
    run_timer(m, TimerPhase::Drawing, turn);
    assert_eq!(m.phase(), Phase::RoundEnd);
    m.on_timer_expired(TimerPhase::RoundEndPause);
}

fn assert_invariants(m: &RoomStateMachine) {
    if m.phase().has_drawer() {
        let drawer = m.current_drawer().expect("drawer missing");
        assert!(m.contains(drawer), "drawer not in roster");
    } else {
        assert_eq!(m.current_drawer(), None, "drawer set in {}", m.phase());
    }
    if m.current_word().is_some() {
        assert!(matches!(m.phase(), Phase::Drawing | Phase::RoundEnd));
    }
    let mut g = m.guessed().to_vec();
    g.dedup();
    assert_eq!(g.len(), m.guessed().len(), "duplicate guessers");
}

// =========================================================================
// Membership
// =========================================================================

#[test]
fn test_join_sends_room_joined_then_snapshot_then_replay() {
    let mut m = room(&[ALICE]);
    m.join(BOB, "bob", "seed").unwrap();
    let effects = m.take_effects();

    let bob = inbox(&effects, BOB);
    assert!(matches!(bob[0], ServerMessage::RoomJoined { player_id, .. } if player_id == BOB));
    assert!(matches!(bob[1], ServerMessage::RoomUpdate(_)));
    assert!(matches!(bob[2], ServerMessage::StrokeReplay { ref segments } if segments.is_empty()));

    // Alice sees the new roster too.
    let snap = last_snapshot(&effects, ALICE);
    assert_eq!(snap.players.len(), 2);
    assert_eq!(snap.players[1].username, "bob");
}

#[test]
fn test_join_full_room_is_rejected() {
    let cfg = RoomConfig {
        max_players: 2,
        ..config()
    };
    let mut m = room_with_config(&[ALICE, BOB], cfg);
    let err = m.join(CAROL, "carol", "").unwrap_err();
    assert!(matches!(err, RoomError::RoomFull(_)));
    assert_eq!(m.len(), 2);
    assert!(m.take_effects().is_empty());
}

#[test]
fn test_join_twice_is_rejected() {
    let mut m = room(&[ALICE]);
    let err = m.join(ALICE, "again", "").unwrap_err();
    assert!(matches!(err, RoomError::AlreadyInRoom(p, _) if p == ALICE));
}

#[test]
fn test_host_is_first_in_join_order_and_succeeds_on_leave() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    assert_eq!(m.host(), Some(ALICE));

    assert!(m.leave(ALICE));
    let effects = m.take_effects();
    assert_eq!(m.host(), Some(BOB));
    let snap = last_snapshot(&effects, CAROL);
    assert!(snap.players[0].is_host);
    assert_eq!(snap.players[0].id, BOB);
    assert!(!snap.players[1].is_host);
}

#[test]
fn test_leave_unknown_player_is_noop() {
    let mut m = room(&[ALICE]);
    assert!(!m.leave(BOB));
    assert!(m.take_effects().is_empty());
}

#[test]
fn test_last_player_leaving_cancels_timer() {
    let mut m = room(&[ALICE]);
    m.start_game(ALICE);
    m.take_effects();

    m.leave(ALICE);
    let effects = m.take_effects();
    assert!(m.is_empty());
    assert!(effects.contains(&Effect::CancelTimer));
    assert!(effects.contains(&Effect::Release(ALICE)));
    assert_eq!(m.timer_phase(), None);
}

// =========================================================================
// Starting and word choice
// =========================================================================

#[test]
fn test_scenario_start_choose_and_guess_ends_round_early() {
    let mut m = room(&[ALICE, BOB]);

    // Alice starts: she draws first, Bob learns nothing about the word.
    m.start_game(ALICE);
    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::ChoosingWord);
    assert_eq!(m.current_drawer(), Some(ALICE));
    assert_eq!(m.round(), 1);
    let bob = inbox(&effects, BOB);
    assert!(!bob.iter().any(|msg| matches!(msg, ServerMessage::ChooseWordOptions { .. })));
    assert_eq!(last_snapshot(&effects, BOB).word, None);
    assert!(
        inbox(&effects, ALICE)
            .iter()
            .any(|msg| matches!(msg, ServerMessage::ChooseWordOptions { words } if words.len() == 3))
    );
    assert!(effects.contains(&Effect::ArmTimer(TimerPhase::WordSelection, 15)));

    // Alice picks APPLE: Bob gets five placeholders.
    m.choose_word(ALICE, "APPLE");
    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::Drawing);
    assert!(inbox(&effects, BOB).contains(&ServerMessage::WordHint { hint: "_____".into() }));
    assert!(!inbox(&effects, ALICE).iter().any(|msg| matches!(msg, ServerMessage::WordHint { .. })));
    let bob_view = last_snapshot(&effects, BOB);
    assert_eq!(bob_view.word, None);
    assert_eq!(bob_view.hint.as_deref(), Some("_____"));
    assert_eq!(last_snapshot(&effects, ALICE).word.as_deref(), Some("APPLE"));

    // Bob guesses: he is the only guesser, so the round ends at once.
    m.submit_guess(BOB, "apple");
    let effects = m.take_effects();
    assert_eq!(m.guessed(), &[BOB]);
    assert_eq!(m.phase(), Phase::RoundEnd);

    let reveal = last_snapshot(&effects, BOB);
    assert_eq!(reveal.word.as_deref(), Some("APPLE"));
    let bob_score = reveal.players.iter().find(|p| p.id == BOB).unwrap().score;
    assert!(bob_score > 0);
    assert!(inbox(&effects, BOB).iter().any(|msg| matches!(
        msg,
        ServerMessage::RoundEnded { word, players } if word == "APPLE"
            && players.iter().any(|p| p.id == BOB && p.guessed)
    )));
    assert!(effects.contains(&Effect::ArmTimer(TimerPhase::RoundEndPause, 5)));
    assert_invariants(&m);
}

#[test]
fn test_start_game_requires_host_and_lobby() {
    let mut m = room(&[ALICE, BOB]);
    m.start_game(BOB);
    assert_eq!(m.phase(), Phase::Lobby);
    assert!(m.take_effects().is_empty());

    m.start_game(ALICE);
    m.take_effects();
    m.start_game(ALICE);
    assert!(m.take_effects().is_empty());
    assert_eq!(m.round(), 1);
}

#[test]
fn test_start_game_respects_min_players() {
    let cfg = RoomConfig {
        min_players: 2,
        ..config()
    };
    let mut m = room_with_config(&[ALICE], cfg);
    m.start_game(ALICE);
    assert_eq!(m.phase(), Phase::Lobby);
}

#[test]
fn test_choose_word_only_from_drawer_and_options() {
    let mut m = room(&[ALICE, BOB]);
    m.start_game(ALICE);
    m.take_effects();

    m.choose_word(BOB, "APPLE");
    assert_eq!(m.phase(), Phase::ChoosingWord);
    m.choose_word(ALICE, "DURIAN");
    assert_eq!(m.phase(), Phase::ChoosingWord);
    assert!(m.take_effects().is_empty());

    // Case-insensitive, and the stored word is the offered spelling.
    m.choose_word(ALICE, "  banana ");
    assert_eq!(m.phase(), Phase::Drawing);
    assert_eq!(m.current_word(), Some("BANANA"));
}

#[test]
fn test_word_selection_timeout_picks_an_offered_word() {
    let mut m = room(&[ALICE, BOB]);
    m.start_game(ALICE);
    let options = m.word_options().to_vec();
    m.take_effects();

    run_timer(&mut m, TimerPhase::WordSelection, 15);
    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::Drawing);
    let word = m.current_word().unwrap().to_string();
    assert!(options.contains(&word));
    assert!(effects.contains(&Effect::ArmTimer(TimerPhase::Drawing, 60)));
    assert_eq!(
        inbox(&effects, BOB).iter().filter(|msg| matches!(msg, ServerMessage::TimerUpdate { .. })).count(),
        15
    );
}

#[test]
fn test_drawing_start_clears_canvas_for_everyone() {
    let mut m = room(&[ALICE, BOB]);
    m.start_game(ALICE);
    m.take_effects();
    m.choose_word(ALICE, "APPLE");
    let effects = m.take_effects();
    for p in [ALICE, BOB] {
        assert!(inbox(&effects, p).contains(&ServerMessage::CanvasCleared));
        assert!(inbox(&effects, p).contains(&ServerMessage::GameStarted {
            drawer_id: ALICE,
            round: 1,
            word_length: 5,
        }));
    }
}

// =========================================================================
// Settings
// =========================================================================

#[test]
fn test_update_settings_host_only_in_lobby() {
    let mut m = room(&[ALICE, BOB]);
    let update = SettingsUpdate {
        max_rounds: Some(5),
        turn_time_secs: Some(90),
    };

    m.update_settings(BOB, update);
    assert_eq!(m.settings().max_rounds, 3);

    m.update_settings(ALICE, update);
    let effects = m.take_effects();
    assert_eq!(m.settings().max_rounds, 5);
    assert_eq!(m.settings().turn_time_secs, 90);
    assert_eq!(last_snapshot(&effects, BOB).turn_time_secs, 90);

    m.start_game(ALICE);
    m.update_settings(ALICE, SettingsUpdate { max_rounds: Some(2), turn_time_secs: None });
    assert_eq!(m.settings().max_rounds, 5);
}

#[test]
fn test_update_settings_out_of_range_is_ignored() {
    let mut m = room(&[ALICE]);
    m.update_settings(ALICE, SettingsUpdate { max_rounds: Some(4), turn_time_secs: Some(1) });
    assert_eq!(m.settings().max_rounds, 3);
    assert!(m.take_effects().is_empty());
}

// =========================================================================
// Stroke relay
// =========================================================================

#[test]
fn test_draw_relays_to_everyone_but_drawer_in_order() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    start_drawing(&mut m, ALICE, "APPLE");

    for i in 0..4 {
        m.draw(ALICE, seg(i as f32));
    }
    let effects = m.take_effects();
    assert!(inbox(&effects, ALICE).is_empty());
    for p in [BOB, CAROL] {
        let xs: Vec<f32> = inbox(&effects, p)
            .into_iter()
            .filter_map(|msg| match msg {
                ServerMessage::DrawUpdate { segment } => Some(segment.x0),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }
}

#[test]
fn test_draw_from_non_drawer_or_outside_drawing_is_ignored() {
    let mut m = room(&[ALICE, BOB]);
    m.draw(ALICE, seg(0.0));
    assert!(m.take_effects().is_empty());

    m.start_game(ALICE);
    m.take_effects();
    // Choosing a word is not drawing yet.
    m.draw(ALICE, seg(0.0));
    assert!(m.take_effects().is_empty());

    m.choose_word(ALICE, "APPLE");
    m.take_effects();
    m.draw(BOB, seg(0.0));
    m.clear_canvas(BOB);
    m.fill_background(BOB, "#ffffff".into());
    assert!(m.take_effects().is_empty());
    assert!(m.strokes().is_empty());
}

#[test]
fn test_malformed_segment_is_dropped() {
    let mut m = room(&[ALICE, BOB]);
    start_drawing(&mut m, ALICE, "APPLE");
    let mut bad = seg(1.0);
    bad.x1 = f32::NAN;
    m.draw(ALICE, bad);
    assert!(m.take_effects().is_empty());
    assert!(m.strokes().is_empty());
}

#[test]
fn test_replay_is_identical_for_successive_joiners() {
    let mut m = room(&[ALICE, BOB]);
    start_drawing(&mut m, ALICE, "APPLE");
    let drawn: Vec<StrokeSegment> = (0..5).map(|i| seg(i as f32 * 10.0)).collect();
    for s in &drawn {
        m.draw(ALICE, s.clone());
    }
    m.take_effects();

    m.join(CAROL, "carol", "").unwrap();
    let first = replay_of(&m.take_effects(), CAROL);
    m.join(DAVE, "dave", "").unwrap();
    let second = replay_of(&m.take_effects(), DAVE);

    assert_eq!(first, drawn);
    assert_eq!(first, second);
}

#[test]
fn test_clear_canvas_empties_replay_and_fill_is_not_logged() {
    let mut m = room(&[ALICE, BOB]);
    start_drawing(&mut m, ALICE, "APPLE");
    m.draw(ALICE, seg(1.0));
    m.clear_canvas(ALICE);
    m.fill_background(ALICE, "#00ff00".into());
    let effects = m.take_effects();

    assert!(m.strokes().is_empty());
    let bob = inbox(&effects, BOB);
    assert!(bob.contains(&ServerMessage::CanvasCleared));
    assert!(bob.contains(&ServerMessage::FillBackground { color: "#00ff00".into() }));

    m.join(CAROL, "carol", "").unwrap();
    let carol = inbox(&m.take_effects(), CAROL);
    assert!(carol.contains(&ServerMessage::StrokeReplay { segments: vec![] }));
}

#[test]
fn test_late_joiner_during_drawing_gets_hint_and_countdown() {
    let mut m = room(&[ALICE, BOB]);
    start_drawing(&mut m, ALICE, "APPLE");
    m.on_timer_tick(TimerPhase::Drawing, 50);
    m.take_effects();

    m.join(CAROL, "carol", "").unwrap();
    let effects = m.take_effects();
    let carol = inbox(&effects, CAROL);
    assert!(carol.contains(&ServerMessage::WordHint { hint: "_____".into() }));
    assert!(carol.contains(&ServerMessage::TimerUpdate { seconds_remaining: 50 }));
    assert_eq!(last_snapshot(&effects, CAROL).word, None);
}

// =========================================================================
// Guessing
// =========================================================================

#[test]
fn test_correct_guess_is_credited_once() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    start_drawing(&mut m, ALICE, "APPLE");

    m.submit_guess(BOB, "APPLE");
    let score = m.player(BOB).unwrap().score;
    m.take_effects();

    m.submit_guess(BOB, "apple");
    assert!(m.take_effects().is_empty());
    assert_eq!(m.guessed(), &[BOB]);
    assert_eq!(m.player(BOB).unwrap().score, score);
    assert_eq!(m.phase(), Phase::Drawing, "Carol has not guessed yet");
}

#[test]
fn test_correct_guess_does_not_leak_word() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    start_drawing(&mut m, ALICE, "APPLE");
    m.submit_guess(BOB, " Apple ");
    let effects = m.take_effects();

    for msg in inbox(&effects, CAROL) {
        let json = format!("{msg:?}");
        assert!(!json.contains("APPLE"), "word leaked to Carol: {json}");
    }
    // Bob already knows it, so his snapshot shows it.
    let bob_view = last_snapshot(&effects, BOB);
    assert_eq!(bob_view.word.as_deref(), Some("APPLE"));
    assert_eq!(bob_view.hint, None);
    assert_eq!(m.player(BOB).unwrap().emotion, Emotion::Happy);
}

#[test]
fn test_wrong_guess_is_chat() {
    let mut m = room(&[ALICE, BOB]);
    start_drawing(&mut m, ALICE, "APPLE");
    m.submit_guess(BOB, "  pear? ");
    let effects = m.take_effects();
    assert!(inbox(&effects, ALICE).contains(&ServerMessage::ChatMessage {
        player_id: BOB,
        username: "player2".into(),
        message: "pear?".into(),
    }));
    assert!(m.guessed().is_empty());
}

#[test]
fn test_guesses_ignored_from_drawer_outside_drawing_and_when_blank() {
    let mut m = room(&[ALICE, BOB]);
    m.submit_guess(BOB, "APPLE");
    assert!(m.take_effects().is_empty());

    start_drawing(&mut m, ALICE, "APPLE");
    m.submit_guess(ALICE, "APPLE");
    m.submit_guess(BOB, "   ");
    assert!(m.take_effects().is_empty());
    assert!(m.guessed().is_empty());
}

#[test]
fn test_oversized_guess_is_dropped() {
    let mut m = room_with_config(
        &[ALICE, BOB],
        RoomConfig {
            max_chat_len: 10,
            ..config()
        },
    );
    start_drawing(&mut m, ALICE, "APPLE");

    m.submit_guess(BOB, &"x".repeat(11));
    assert!(m.take_effects().is_empty());

    m.submit_guess(BOB, &format!("  {}  ", "y".repeat(10)));
    let effects = m.take_effects();
    assert!(inbox(&effects, ALICE).contains(&ServerMessage::ChatMessage {
        player_id: BOB,
        username: "player2".into(),
        message: "y".repeat(10),
    }));
}

#[test]
fn test_guess_score_is_time_weighted() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    start_drawing(&mut m, ALICE, "APPLE");

    m.submit_guess(BOB, "apple");
    for remaining in (30..60).rev() {
        m.on_timer_tick(TimerPhase::Drawing, remaining);
    }
    m.submit_guess(CAROL, "apple");

    assert_eq!(m.player(BOB).unwrap().score, 500);
    assert_eq!(m.player(CAROL).unwrap().score, 275);
    assert_eq!(m.player(ALICE).unwrap().score, 50, "drawer bonus per guesser");
}

// =========================================================================
// Timer, hints, and round flow
// =========================================================================

#[test]
fn test_hint_reveals_progressively_to_guessers_only() {
    let mut m = room(&[ALICE, BOB]);
    start_drawing(&mut m, ALICE, "APPLE");

    for remaining in (41..60).rev() {
        m.on_timer_tick(TimerPhase::Drawing, remaining);
    }
    let effects = m.take_effects();
    assert!(!inbox(&effects, BOB).iter().any(|msg| matches!(msg, ServerMessage::WordHint { .. })));

    m.on_timer_tick(TimerPhase::Drawing, 40);
    let effects = m.take_effects();
    assert!(inbox(&effects, BOB).contains(&ServerMessage::WordHint { hint: "_P___".into() }));
    assert!(!inbox(&effects, ALICE).iter().any(|msg| matches!(msg, ServerMessage::WordHint { .. })));
    // The reveal also refreshes every snapshot.
    assert_eq!(last_snapshot(&effects, BOB).hint.as_deref(), Some("_P___"));
    assert_eq!(last_snapshot(&effects, ALICE).hint, None);

    // Nothing new until the next reveal is due.
    m.on_timer_tick(TimerPhase::Drawing, 39);
    let effects = m.take_effects();
    assert!(!inbox(&effects, BOB).iter().any(|msg| matches!(msg, ServerMessage::WordHint { .. })));

    for remaining in (1..39).rev() {
        m.on_timer_tick(TimerPhase::Drawing, remaining);
    }
    let effects = m.take_effects();
    let hints: Vec<_> = inbox(&effects, BOB)
        .into_iter()
        .filter_map(|msg| match msg {
            ServerMessage::WordHint { hint } => Some(hint),
            _ => None,
        })
        .collect();
    assert_eq!(hints, vec!["_P_L_".to_string()]);
}

#[test]
fn test_scenario_timeout_reveals_word_and_rotates_drawer() {
    let mut m = room(&[ALICE, BOB]);
    m.update_settings(ALICE, SettingsUpdate { max_rounds: None, turn_time_secs: Some(30) });
    start_drawing(&mut m, ALICE, "APPLE");

    let mut ticks = 0;
    for remaining in (1..30).rev() {
        m.on_timer_tick(TimerPhase::Drawing, remaining);
        ticks += 1;
        assert_eq!(m.phase(), Phase::Drawing);
    }
    m.on_timer_expired(TimerPhase::Drawing);
    ticks += 1;
    assert_eq!(ticks, 30);

    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::RoundEnd);
    assert!(inbox(&effects, BOB).iter().any(|msg| matches!(
        msg,
        ServerMessage::RoundEnded { word, .. } if word == "APPLE"
    )));
    assert_eq!(last_snapshot(&effects, BOB).word.as_deref(), Some("APPLE"));
    assert!(m.players().iter().all(|p| p.score == 0));
    assert_eq!(m.player(BOB).unwrap().emotion, Emotion::Sad);

    m.on_timer_expired(TimerPhase::RoundEndPause);
    assert_eq!(m.phase(), Phase::ChoosingWord);
    assert_eq!(m.current_drawer(), Some(BOB));
    assert_eq!(m.round(), 2);
    assert_invariants(&m);
}

#[test]
fn test_scenario_game_over_ranking_and_reset() {
    let mut m = room(&[ALICE, BOB]);
    m.update_settings(ALICE, SettingsUpdate { max_rounds: Some(2), turn_time_secs: None });

    // Round 1: Alice draws, Bob guesses at once.
    start_drawing(&mut m, ALICE, "APPLE");
    m.submit_guess(BOB, "apple");
    m.on_timer_expired(TimerPhase::RoundEndPause);

    // Round 2: Bob draws, Alice guesses at once. Both end on 525.
    assert_eq!(m.current_drawer(), Some(BOB));
    let word = m.word_options()[0].clone();
    m.choose_word(BOB, &word);
    m.submit_guess(ALICE, &word);
    m.take_effects();
    assert_eq!(m.phase(), Phase::RoundEnd);

    m.on_timer_expired(TimerPhase::RoundEndPause);
    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::GameOver);
    assert!(effects.contains(&Effect::ArmTimer(TimerPhase::GameOverPause, 8)));
    let ranking = inbox(&effects, ALICE)
        .into_iter()
        .find_map(|msg| match msg {
            ServerMessage::GameOver { ranking } => Some(ranking),
            _ => None,
        })
        .unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].score, 525);
    assert_eq!(ranking[1].score, 525);
    // Tie broken by join order.
    assert_eq!(ranking[0].id, ALICE);
    assert_eq!(ranking[0].rank, 1);
    assert_eq!(ranking[1].id, BOB);

    m.on_timer_expired(TimerPhase::GameOverPause);
    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::Lobby);
    assert_eq!(m.round(), 0);
    assert_eq!(m.len(), 2);
    let snap = last_snapshot(&effects, BOB);
    assert!(snap.players.iter().all(|p| p.score == 0));
    assert_invariants(&m);
}

#[test]
fn test_ranking_orders_by_score_descending() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    m.update_settings(ALICE, SettingsUpdate { max_rounds: Some(1), turn_time_secs: None });
    start_drawing(&mut m, ALICE, "APPLE");
    m.on_timer_tick(TimerPhase::Drawing, 59);
    m.submit_guess(CAROL, "apple");
    m.on_timer_tick(TimerPhase::Drawing, 30);
    m.submit_guess(BOB, "apple");
    m.on_timer_expired(TimerPhase::RoundEndPause);

    let effects = m.take_effects();
    let ranking = inbox(&effects, ALICE)
        .into_iter()
        .find_map(|msg| match msg {
            ServerMessage::GameOver { ranking } => Some(ranking),
            _ => None,
        })
        .unwrap();
    let ids: Vec<PlayerId> = ranking.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![CAROL, BOB, ALICE]);
}

#[test]
fn test_round_robin_visits_everyone_once() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    m.start_game(ALICE);
    let mut drawers = Vec::new();
    for _ in 0..3 {
        assert_invariants(&m);
        drawers.push(m.current_drawer().unwrap());
        run_timer(&mut m, TimerPhase::WordSelection, 15);
        assert_invariants(&m);
        finish_turn(&mut m);
    }
    assert_eq!(drawers, vec![ALICE, BOB, CAROL]);
    assert_eq!(m.phase(), Phase::GameOver);
}

#[test]
fn test_stale_timer_events_are_ignored() {
    let mut m = room(&[ALICE, BOB]);
    m.start_game(ALICE);
    m.take_effects();

    m.on_timer_expired(TimerPhase::Drawing);
    m.on_timer_tick(TimerPhase::RoundEndPause, 3);
    assert!(m.take_effects().is_empty());
    assert_eq!(m.phase(), Phase::ChoosingWord);
}

// =========================================================================
// Disruption
// =========================================================================

/// Alice hosts; Bob is drawing round 2 with `word`; Carol has not guessed.
fn bob_drawing_round_two() -> RoomStateMachine {
    let mut m = room(&[ALICE, BOB, CAROL]);
    m.start_game(ALICE);
    run_timer(&mut m, TimerPhase::WordSelection, 15);
    finish_turn(&mut m);
    assert_eq!(m.current_drawer(), Some(BOB));
    let word = m.word_options()[0].clone();
    m.choose_word(BOB, &word);
    assert_eq!(m.phase(), Phase::Drawing);
    m.take_effects();
    m
}

#[test]
fn test_kicking_drawer_abandons_turn_without_credit() {
    let mut m = bob_drawing_round_two();
    let word = m.current_word().unwrap().to_string();

    // Points earned before the kick are kept.
    m.submit_guess(CAROL, &word);
    let carol_score = m.player(CAROL).unwrap().score;
    assert!(carol_score > 0);
    m.take_effects();

    m.kick(ALICE, BOB);
    let effects = m.take_effects();

    // Bob is told, then released.
    let kicked_at = effects
        .iter()
        .position(|e| *e == Effect::Send(Recipient::Player(BOB), ServerMessage::Kicked))
        .unwrap();
    let released_at = effects.iter().position(|e| *e == Effect::Release(BOB)).unwrap();
    assert!(kicked_at < released_at);

    assert!(!m.contains(BOB));
    assert!(!inbox(&effects, CAROL).iter().any(|msg| matches!(
        msg,
        ServerMessage::RoundEnded { .. } | ServerMessage::CorrectGuess { .. }
    )));
    assert_eq!(m.player(CAROL).unwrap().score, carol_score);
    assert_eq!(m.player(ALICE).unwrap().score, 0);
    assert!(m.guessed().is_empty());

    // The abandoned word earns nothing afterwards.
    m.submit_guess(ALICE, &word);
    let effects = m.take_effects();
    assert!(!effects.iter().any(|e| matches!(
        e,
        Effect::Send(_, ServerMessage::CorrectGuess { .. })
    )));
    assert!(m.guessed().is_empty());
    assert_eq!(m.player(ALICE).unwrap().score, 0);

    // Carol slid into Bob's slot and draws next.
    assert_eq!(m.phase(), Phase::ChoosingWord);
    assert_eq!(m.current_drawer(), Some(CAROL));
    assert_eq!(m.round(), 3);
    assert_invariants(&m);
}

#[test]
fn test_drawer_leaving_on_last_round_goes_to_game_over() {
    let mut m = bob_drawing_round_two();
    m.update_settings(ALICE, SettingsUpdate { max_rounds: Some(2), turn_time_secs: None });
    // Settings are frozen mid-match, so shrink the match the long way.
    assert_eq!(m.settings().max_rounds, 3);

    m.leave(BOB);
    m.take_effects();
    assert_eq!(m.current_drawer(), Some(CAROL));
    m.leave(CAROL);
    let effects = m.take_effects();
    assert_eq!(m.phase(), Phase::GameOver);
    assert!(inbox(&effects, ALICE).iter().any(|msg| matches!(msg, ServerMessage::GameOver { .. })));
    assert_invariants(&m);
}

#[test]
fn test_kick_rules() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    m.kick(BOB, CAROL);
    m.kick(ALICE, ALICE);
    m.kick(ALICE, DAVE);
    assert!(m.take_effects().is_empty());
    assert_eq!(m.len(), 3);

    m.kick(ALICE, CAROL);
    assert_eq!(m.len(), 2);
}

#[test]
fn test_non_drawer_leaving_can_complete_the_round() {
    let mut m = room(&[ALICE, BOB, CAROL]);
    start_drawing(&mut m, ALICE, "APPLE");
    m.submit_guess(BOB, "apple");
    assert_eq!(m.phase(), Phase::Drawing);

    m.leave(CAROL);
    assert_eq!(m.phase(), Phase::RoundEnd);
    assert_invariants(&m);
}

#[test]
fn test_leaving_before_cursor_does_not_skip_anyone() {
    let mut m = room(&[ALICE, BOB, CAROL, DAVE]);
    m.start_game(ALICE);
    run_timer(&mut m, TimerPhase::WordSelection, 15);
    finish_turn(&mut m);
    assert_eq!(m.current_drawer(), Some(BOB));

    // Alice (already drew) leaves while Bob is choosing.
    m.leave(ALICE);
    assert_eq!(m.current_drawer(), Some(BOB));
    run_timer(&mut m, TimerPhase::WordSelection, 15);
    finish_turn(&mut m);
    assert_eq!(m.current_drawer(), Some(CAROL));
}
