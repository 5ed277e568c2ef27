//! The turn/validation/timer state machine.
//!
//! [`Game`] is synchronous: every method applies one command or one
//! signal, mutates the state at most once, and returns a [`Transition`]
//! telling the caller what to do next (arm the clock, start a lookup,
//! publish a snapshot). The engine actor is that caller; tests can drive
//! a `Game` directly and play the part of the clock and the dictionary.
//!
//! # Turn epochs
//!
//! Two independent signals can end a turn: the clock expiring and the
//! dictionary answering. Both are tagged with the epoch that was live when
//! they were requested. Resolving a turn bumps the epoch, so whichever
//! signal loses the race arrives with an old epoch and is dropped as
//! [`Transition::Stale`]. At most one resolution per turn, no locks.

use shiritori_dictionary::{DictionaryError, Lookup};
use shiritori_protocol::{
    Command, GameState, HistoryEntry, Outcome, Phase, Player, RejectReason, Seat, TurnEpoch,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::rules::{check_structure, last_letter, normalize};
use crate::{EngineError, GameConfig, LetterSource, UsedWords};

/// A turn that just resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The history entry that was appended.
    pub entry: HistoryEntry,
    /// One-line message for the players.
    pub notice: String,
}

/// What the caller must do after a [`Game`] step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A fresh game began: arm the clock for the live epoch.
    TurnStarted,
    /// The turn resolved and the next one began: cancel the old clock and
    /// arm a new one for the live epoch.
    Resolved(Resolution),
    /// Structural checks passed: look `word` up and report back with
    /// [`Game::apply_lookup`] using `epoch`. The clock keeps running.
    LookupNeeded { word: String, epoch: TurnEpoch },
    /// Something visible changed, but no turn moved.
    Updated,
    /// The signal belonged to a turn that already resolved. Nothing changed.
    Stale,
}

impl Transition {
    /// Whether the caller must (re)arm the turn clock.
    pub fn restarts_clock(&self) -> bool {
        matches!(self, Self::TurnStarted | Self::Resolved(_))
    }
}

/// Authoritative state for one table.
pub struct Game {
    config: GameConfig,
    state: GameState,
    used: UsedWords,
    letters: Box<dyn LetterSource>,
    /// Word awaiting its dictionary verdict, while `Validating`.
    pending: Option<String>,
    turn_started: Instant,
}

impl Game {
    /// A game waiting for `StartGame`, with a random start letter.
    pub fn new(config: GameConfig, letters: impl LetterSource) -> Self {
        let config = config.validated();
        let mut letters: Box<dyn LetterSource> = Box::new(letters);
        let state = fresh_state(&config, letters.as_mut(), TurnEpoch::default(), None);
        Self {
            config,
            state,
            used: UsedWords::new(),
            letters,
            pending: None,
            turn_started: Instant::now(),
        }
    }

    // -- Accessors --

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn used_words(&self) -> &UsedWords {
        &self.used
    }

    pub fn epoch(&self) -> TurnEpoch {
        self.state.epoch
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    // -- Commands --

    /// Applies one front-end command.
    pub fn handle(&mut self, command: Command) -> Result<Transition, EngineError> {
        match command {
            Command::StartGame => self.start(),
            Command::NewGame => Ok(self.new_game()),
            Command::SubmitWord { text, epoch } => self.submit(&text, epoch),
            Command::PassTurn => self.pass(),
            Command::RandomizeStartLetter => self.randomize_start_letter(),
            Command::RenamePlayer { seat, name } => self.rename(seat, &name),
        }
    }

    /// `NotStarted → AwaitingInput` with a freshly drawn start letter.
    pub fn start(&mut self) -> Result<Transition, EngineError> {
        if self.state.phase != Phase::NotStarted {
            return Err(EngineError::AlreadyStarted);
        }
        self.state.required_letter = self.letters.pick(&self.config.alphabet);
        self.state.phase = Phase::AwaitingInput;
        self.turn_started = Instant::now();
        info!(
            epoch = %self.state.epoch,
            letter = %self.state.required_letter,
            "game started"
        );
        Ok(Transition::TurnStarted)
    }

    /// Replaces the whole game: zero scores, empty history and ledger,
    /// first seat to move, new start letter. Names survive. The epoch
    /// moves forward, never back, so lookups from the old game stay stale.
    pub fn new_game(&mut self) -> Transition {
        let epoch = self.state.epoch.next();
        let names = self.state.players.clone().map(|p| p.name);
        let mut state = fresh_state(&self.config, self.letters.as_mut(), epoch, Some(names));
        state.phase = Phase::AwaitingInput;
        self.state = state;
        self.used.clear();
        self.pending = None;
        self.turn_started = Instant::now();
        info!(
            epoch = %epoch,
            letter = %self.state.required_letter,
            "new game"
        );
        Transition::TurnStarted
    }

    /// Submits `raw` for the turn identified by `epoch`.
    ///
    /// Structural failures resolve the turn on the spot. A structurally
    /// valid word moves the turn to `Validating` and asks for a lookup.
    pub fn submit(&mut self, raw: &str, epoch: TurnEpoch) -> Result<Transition, EngineError> {
        self.ensure_turn_open()?;
        if epoch != self.state.epoch {
            debug!(issued = %epoch, live = %self.state.epoch, "stale submission");
            return Err(EngineError::StaleCommand {
                issued: epoch,
                live: self.state.epoch,
            });
        }
        if self.state.phase == Phase::Validating {
            return Err(EngineError::ValidationPending);
        }

        match check_structure(
            raw,
            self.state.required_letter,
            self.config.min_word_length,
            &self.used,
        ) {
            Err(reason) => {
                let word = Some(normalize(raw)).filter(|w| !w.is_empty());
                Ok(self.resolve(Outcome::Invalid(reason), word, None))
            }
            Ok(word) => {
                debug!(epoch = %epoch, word = %word, "word passed structural checks");
                self.state.phase = Phase::Validating;
                self.pending = Some(word.clone());
                Ok(Transition::LookupNeeded { word, epoch })
            }
        }
    }

    /// Gives up the turn. Accepted while awaiting input *and* while a
    /// lookup is in flight; that lookup's verdict will arrive stale.
    pub fn pass(&mut self) -> Result<Transition, EngineError> {
        self.ensure_turn_open()?;
        Ok(self.resolve(Outcome::Passed, None, None))
    }

    /// Draws a new start letter. Only allowed before the first valid word.
    pub fn randomize_start_letter(&mut self) -> Result<Transition, EngineError> {
        if !self.used.is_empty() {
            return Err(EngineError::ChainAlreadyStarted);
        }
        self.state.required_letter = self.letters.pick(&self.config.alphabet);
        debug!(letter = %self.state.required_letter, "start letter re-rolled");
        Ok(Transition::Updated)
    }

    /// Changes a display name. Scores, turn and epoch are untouched.
    pub fn rename(&mut self, seat: Seat, name: &str) -> Result<Transition, EngineError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        self.state.player_mut(seat).name = name.to_string();
        Ok(Transition::Updated)
    }

    // -- Signals --

    /// Applies a dictionary verdict requested for `epoch`.
    ///
    /// Lookup failures count as "not in dictionary" but are logged with
    /// their kind so they can be told apart from genuine misses.
    pub fn apply_lookup(
        &mut self,
        epoch: TurnEpoch,
        result: Result<Lookup, DictionaryError>,
    ) -> Transition {
        if epoch != self.state.epoch || self.state.phase != Phase::Validating {
            debug!(
                issued = %epoch,
                live = %self.state.epoch,
                phase = %self.state.phase,
                "discarding stale dictionary verdict"
            );
            return Transition::Stale;
        }
        let Some(word) = self.pending.take() else {
            return Transition::Stale;
        };

        match result {
            Ok(lookup) if lookup.found => self.resolve(Outcome::Valid, Some(word), Some(lookup)),
            Ok(_) => self.resolve(
                Outcome::Invalid(RejectReason::NotInDictionary),
                Some(word),
                None,
            ),
            Err(e) => {
                warn!(
                    epoch = %epoch,
                    word = %word,
                    kind = e.kind(),
                    error = %e,
                    "dictionary lookup failed, scoring as not found"
                );
                self.resolve(
                    Outcome::Invalid(RejectReason::NotInDictionary),
                    Some(word),
                    None,
                )
            }
        }
    }

    /// Applies a clock expiry raised for `epoch`.
    pub fn apply_timeout(&mut self, epoch: TurnEpoch) -> Transition {
        if epoch != self.state.epoch || !self.state.phase.is_turn_open() {
            debug!(
                issued = %epoch,
                live = %self.state.epoch,
                phase = %self.state.phase,
                "discarding stale timeout"
            );
            return Transition::Stale;
        }
        self.resolve(Outcome::Timeout, None, None)
    }

    // -- Internals --

    fn ensure_turn_open(&self) -> Result<(), EngineError> {
        match self.state.phase {
            Phase::AwaitingInput | Phase::Validating => Ok(()),
            Phase::NotStarted => Err(EngineError::NotStarted),
            Phase::Ended => Err(EngineError::GameEnded),
        }
    }

    /// The single place a turn ends: history, score, ledger, start
    /// letter, epoch, seat, phase. The caller re-arms the clock.
    fn resolve(
        &mut self,
        outcome: Outcome,
        word: Option<String>,
        lookup: Option<Lookup>,
    ) -> Transition {
        let by = self.state.turn;
        let epoch = self.state.epoch;

        let time_taken_secs = match outcome {
            Outcome::Timeout => u64::from(self.config.turn_seconds),
            _ => {
                let elapsed = self.turn_started.elapsed();
                ((elapsed.as_millis() + 500) / 1000) as u64
            }
        };

        let (definition, phonetic) = match (&outcome, lookup) {
            (Outcome::Valid, Some(lookup)) => (lookup.definition, lookup.phonetic),
            _ => (None, None),
        };

        if outcome.is_valid() {
            if let Some(word) = &word {
                self.used.insert(word);
                if let Some(letter) = last_letter(word) {
                    self.state.required_letter = letter;
                }
            }
        }

        let player = self.state.player_mut(by);
        player.score += outcome.score_delta();
        let score = player.score;

        let entry = HistoryEntry {
            word,
            outcome,
            by,
            time_taken_secs,
            definition,
            phonetic,
        };
        self.state.history.push(entry.clone());

        self.state.epoch = epoch.next();
        self.state.turn = by.other();
        self.state.phase = Phase::AwaitingInput;
        self.pending = None;
        self.turn_started = Instant::now();

        info!(
            epoch = %epoch,
            seat = %by,
            outcome = ?entry.outcome,
            score,
            next_letter = %self.state.required_letter,
            "turn resolved"
        );

        let notice = entry.outcome.notice();
        Transition::Resolved(Resolution { entry, notice })
    }
}

fn fresh_state(
    config: &GameConfig,
    letters: &mut dyn LetterSource,
    epoch: TurnEpoch,
    names: Option<[String; 2]>,
) -> GameState {
    let [first, second] = names.unwrap_or_else(|| config.player_names.clone());
    GameState {
        players: [Player::new(first), Player::new(second)],
        turn: Seat::First,
        required_letter: letters.pick(&config.alphabet),
        epoch,
        phase: Phase::NotStarted,
        history: Vec::new(),
    }
}
