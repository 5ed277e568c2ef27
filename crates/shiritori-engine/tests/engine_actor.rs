//! End-to-end tests for the engine actor with fake dictionaries and a
//! paused Tokio clock.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use shiritori_dictionary::{DictionaryError, DictionaryGateway, Lookup};
use shiritori_engine::{
    EngineBuilder, EngineError, EngineHandle, GameConfig, LetterSource, Transition,
};
use shiritori_protocol::{GameEvent, GameState, Outcome, Phase, RejectReason, Seat, TurnEpoch};
use tokio::sync::{Notify, mpsc};

// =========================================================================
// Test doubles
// =========================================================================

/// Always the same start letter.
struct Fixed(char);

impl LetterSource for Fixed {
    fn pick(&mut self, _alphabet: &[char]) -> char {
        self.0
    }
}

/// Answers instantly from a word list and counts its calls.
#[derive(Clone)]
struct Scripted {
    words: Arc<HashSet<&'static str>>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn knowing(words: &[&'static str]) -> Self {
        Self {
            words: Arc::new(words.iter().copied().collect()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DictionaryGateway for Scripted {
    async fn lookup(&self, word: &str) -> Result<Lookup, DictionaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.words.contains(word) {
            Ok(Lookup::found(format!("definition of {word}"), None))
        } else {
            Ok(Lookup::not_found())
        }
    }
}

/// Knows every word, but only answers once the test opens the gate.
#[derive(Clone, Default)]
struct Gated {
    gate: Arc<Notify>,
    calls: Arc<AtomicUsize>,
}

impl Gated {
    fn release_one(&self) {
        self.gate.notify_one();
    }
}

impl DictionaryGateway for Gated {
    async fn lookup(&self, word: &str) -> Result<Lookup, DictionaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(Lookup::found(format!("definition of {word}"), None))
    }
}

/// Always fails like an unreachable service.
struct Down;

impl DictionaryGateway for Down {
    async fn lookup(&self, _word: &str) -> Result<Lookup, DictionaryError> {
        Err(DictionaryError::Status(502))
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn spawn_with<D: DictionaryGateway>(gateway: D) -> EngineHandle {
    EngineBuilder::new()
        .config(GameConfig::default())
        .letters(Fixed('a'))
        .spawn(gateway)
}

/// Lets every ready task run without moving the paused clock far.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn subscribe(engine: &EngineHandle) -> mpsc::UnboundedReceiver<GameEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    engine.subscribe(tx).await.unwrap();
    rx
}

/// Next snapshot on `rx`, skipping clock events.
async fn next_snapshot(
    rx: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> (GameState, Option<String>) {
    loop {
        match rx.recv().await.expect("engine hung up") {
            GameEvent::Snapshot { state, notice } => return (state, notice),
            GameEvent::Clock { .. } => continue,
        }
    }
}

// =========================================================================
// Turn flow
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_valid_word_flows_through_engine() {
    let dict = Scripted::knowing(&["apple"]);
    let engine = spawn_with(dict.clone());

    engine.start_game().await.unwrap();
    let t = engine.submit_word("Apple", TurnEpoch(0)).await.unwrap();
    assert_eq!(
        t,
        Transition::LookupNeeded {
            word: "apple".into(),
            epoch: TurnEpoch(0)
        }
    );
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].outcome, Outcome::Valid);
    assert_eq!(
        state.history[0].definition.as_deref(),
        Some("definition of apple")
    );
    assert_eq!(state.players[0].score, 1);
    assert_eq!(state.required_letter, 'e');
    assert_eq!(state.turn, Seat::Second);
    assert_eq!(state.epoch, TurnEpoch(1));
    assert_eq!(dict.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_too_short_skips_dictionary() {
    let dict = Scripted::knowing(&["cat"]);
    let engine = spawn_with(dict.clone());

    engine.start_game().await.unwrap();
    let t = engine.submit_word("cat", TurnEpoch(0)).await.unwrap();
    assert!(matches!(t, Transition::Resolved(_)));
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(
        state.history[0].outcome,
        Outcome::Invalid(RejectReason::TooShort { min_length: 4 })
    );
    assert_eq!(dict.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dictionary_failure_counts_as_miss() {
    let engine = spawn_with(Down);
    engine.start_game().await.unwrap();
    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(
        state.history[0].outcome,
        Outcome::Invalid(RejectReason::NotInDictionary)
    );
    assert_eq!(state.players[0].score, -1);
}

#[tokio::test(start_paused = true)]
async fn test_submission_while_validating_is_refused() {
    let dict = Gated::default();
    let engine = spawn_with(dict.clone());
    engine.start_game().await.unwrap();

    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    let err = engine.submit_word("acorn", TurnEpoch(0)).await.unwrap_err();
    assert_eq!(err, EngineError::ValidationPending);
    settle().await;
    assert_eq!(dict.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_time_taken_counts_from_turn_start() {
    let dict = Gated::default();
    let engine = spawn_with(dict.clone());
    engine.start_game().await.unwrap();

    // Four seconds thinking, then two waiting on the dictionary.
    tokio::time::sleep(Duration::from_secs(4)).await;
    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    dict.release_one();
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history[0].outcome, Outcome::Valid);
    assert_eq!(state.history[0].time_taken_secs, 6);
}

// =========================================================================
// Races
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_beats_slow_dictionary() {
    let dict = Gated::default();
    let engine = spawn_with(dict.clone());
    engine.start_game().await.unwrap();

    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    // The dictionary stays silent past the end of the turn.
    tokio::time::sleep(Duration::from_secs(16)).await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].outcome, Outcome::Timeout);
    assert_eq!(state.epoch, TurnEpoch(1));

    // Now the verdict lands, one turn too late.
    dict.release_one();
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].outcome, Outcome::Timeout);
    assert_eq!(state.players[0].score, -1);
    assert_eq!(state.players[1].score, 0);
    assert_eq!(state.phase, Phase::AwaitingInput);
    assert_eq!(state.epoch, TurnEpoch(1));
}

#[tokio::test(start_paused = true)]
async fn test_pass_beats_slow_dictionary() {
    let dict = Gated::default();
    let engine = spawn_with(dict.clone());
    engine.start_game().await.unwrap();

    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    let t = engine.pass_turn().await.unwrap();
    assert!(matches!(t, Transition::Resolved(_)));

    dict.release_one();
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].outcome, Outcome::Passed);
    assert_eq!(state.required_letter, 'a');
}

#[tokio::test(start_paused = true)]
async fn test_idle_turns_keep_timing_out() {
    let engine = spawn_with(Scripted::knowing(&[]));
    engine.start_game().await.unwrap();

    // Three full turns with nobody typing.
    tokio::time::sleep(Duration::from_millis(45_500)).await;

    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history.len(), 3);
    assert!(state.history.iter().all(|e| e.outcome == Outcome::Timeout));
    assert_eq!(state.players[0].score, -2);
    assert_eq!(state.players[1].score, -1);
    assert_eq!(state.epoch, TurnEpoch(3));
}

#[tokio::test(start_paused = true)]
async fn test_resolution_restarts_the_clock() {
    let engine = spawn_with(Scripted::knowing(&[]));
    engine.start_game().await.unwrap();

    // Pass just before the first turn would expire.
    tokio::time::sleep(Duration::from_millis(14_500)).await;
    engine.pass_turn().await.unwrap();

    // The old clock would have fired at 15s; the new one fires at 29.5s.
    tokio::time::sleep(Duration::from_secs(10)).await;
    let state = engine.snapshot().await.unwrap();
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].outcome, Outcome::Passed);
    assert_eq!(state.history[0].time_taken_secs, 15);
}

// =========================================================================
// Events and lifecycle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_subscriber_gets_snapshot_then_updates() {
    let engine = spawn_with(Scripted::knowing(&["apple"]));
    let mut rx = subscribe(&engine).await;

    let (state, notice) = next_snapshot(&mut rx).await;
    assert_eq!(state.phase, Phase::NotStarted);
    assert_eq!(notice, None);

    engine.start_game().await.unwrap();
    let (state, _) = next_snapshot(&mut rx).await;
    assert_eq!(state.phase, Phase::AwaitingInput);

    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    let (state, notice) = next_snapshot(&mut rx).await;
    assert_eq!(state.phase, Phase::Validating);
    assert_eq!(notice.as_deref(), Some("Validating with dictionary…"));

    let (state, notice) = next_snapshot(&mut rx).await;
    assert_eq!(state.history.len(), 1);
    assert_eq!(notice.as_deref(), Some("Nice! +1 point."));
}

#[tokio::test(start_paused = true)]
async fn test_clock_ticks_are_broadcast() {
    let engine = spawn_with(Scripted::knowing(&[]));
    let mut rx = subscribe(&engine).await;
    next_snapshot(&mut rx).await;

    engine.start_game().await.unwrap();
    next_snapshot(&mut rx).await;

    let mut seen = Vec::new();
    while seen.len() < 3 {
        if let GameEvent::Clock {
            epoch,
            seconds_left,
        } = rx.recv().await.unwrap()
        {
            assert_eq!(epoch, TurnEpoch(0));
            seen.push(seconds_left);
        }
    }
    assert_eq!(seen, vec![14, 13, 12]);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_subscriber_is_pruned() {
    let engine = spawn_with(Scripted::knowing(&[]));
    let rx = subscribe(&engine).await;
    drop(rx);

    // Broadcasting to a closed channel must not disturb the engine.
    engine.start_game().await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.snapshot().await.unwrap().phase, Phase::AwaitingInput);
}

#[tokio::test(start_paused = true)]
async fn test_randomize_after_chain_started_rejected() {
    let engine = spawn_with(Scripted::knowing(&["apple"]));
    engine.start_game().await.unwrap();
    assert_eq!(
        engine.randomize_start_letter().await,
        Ok(Transition::Updated)
    );

    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    settle().await;

    let err = engine.randomize_start_letter().await.unwrap_err();
    assert_eq!(err.code(), "chain_already_started");
}

#[tokio::test(start_paused = true)]
async fn test_new_game_discards_in_flight_lookup() {
    let dict = Gated::default();
    let engine = spawn_with(dict.clone());
    engine.start_game().await.unwrap();
    engine.rename_player(Seat::First, "Ada").await.unwrap();

    engine.submit_word("apple", TurnEpoch(0)).await.unwrap();
    engine.new_game().await.unwrap();
    dict.release_one();
    settle().await;

    let state = engine.snapshot().await.unwrap();
    assert!(state.history.is_empty());
    assert_eq!(state.players[0].name, "Ada");
    assert_eq!(state.players[0].score, 0);
    assert_eq!(state.epoch, TurnEpoch(1));
    assert_eq!(state.phase, Phase::AwaitingInput);
}

#[tokio::test(start_paused = true)]
async fn test_stale_submission_rejected() {
    let engine = spawn_with(Scripted::knowing(&[]));
    engine.start_game().await.unwrap();
    engine.pass_turn().await.unwrap();

    let err = engine.submit_word("apple", TurnEpoch(0)).await.unwrap_err();
    assert_eq!(err.code(), "stale_command");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_makes_handle_unavailable() {
    let engine = spawn_with(Scripted::knowing(&[]));
    engine.start_game().await.unwrap();
    engine.shutdown().await.unwrap();
    settle().await;

    assert_eq!(engine.pass_turn().await, Err(EngineError::Unavailable));
    assert_eq!(engine.snapshot().await, Err(EngineError::Unavailable));
}
