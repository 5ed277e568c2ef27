//! Core data model for a Shiritori game.
//!
//! Everything here is plain data: the engine mutates it, front ends read
//! snapshots of it. All types serialize with serde so a snapshot can be
//! shipped to any presentation layer through a [`Codec`](crate::Codec).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Counter identifying one turn of play.
///
/// Incremented exactly once per turn transition and never reset, not even
/// by a new game. Asynchronous signals (clock expiry, dictionary verdicts)
/// are tagged with the epoch that was live when they were requested; a
/// signal whose epoch no longer matches the game's is stale.
///
/// `#[serde(transparent)]` keeps it a plain number on the wire.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TurnEpoch(pub u64);

impl TurnEpoch {
    /// The epoch that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TurnEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E-{}", self.0)
    }
}

/// One of the two seats at the table.
///
/// Using an enum instead of a bare `usize` makes "turn index is always 0
/// or 1" a property of the type. On the wire it is still the plain index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Seat {
    #[default]
    First,
    Second,
}

impl Seat {
    /// Index into [`GameState::players`].
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// The opponent's seat.
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Seat for a zero-based index, if it exists.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            _ => None,
        }
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.index() as u8
    }
}

impl TryFrom<u8> for Seat {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or_else(|| {
            ProtocolError::InvalidMessage(format!("seat index {value} out of range (0-1)"))
        })
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index() + 1)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A participant. Scores move by exactly one point per resolved turn and
/// may go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: i32,
}

impl Player {
    /// A fresh player with zero points.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the current turn is in its lifecycle.
///
/// ```text
/// NotStarted → AwaitingInput ⇄ Validating
///                    ↓
///                  Ended   (reserved, no rule reaches it yet)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    NotStarted,
    AwaitingInput,
    Validating,
    Ended,
}

impl Phase {
    /// Returns `true` while a turn is open and can still be resolved.
    pub fn is_turn_open(&self) -> bool {
        matches!(self, Self::AwaitingInput | Self::Validating)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "NotStarted"),
            Self::AwaitingInput => write!(f, "AwaitingInput"),
            Self::Validating => write!(f, "Validating"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a submitted word was not accepted.
///
/// The first three are structural and detected before any dictionary call;
/// `NotInDictionary` covers both a genuine miss and a failed lookup.
/// Serialized with a stable snake_case `code` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectReason {
    TooShort { min_length: usize },
    WrongStartLetter { expected: char },
    AlreadyUsed,
    NotInDictionary,
}

impl RejectReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::WrongStartLetter { .. } => "wrong_start_letter",
            Self::AlreadyUsed => "already_used",
            Self::NotInDictionary => "not_in_dictionary",
        }
    }

    /// Returns `true` for rejections decided without the dictionary.
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::NotInDictionary)
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min_length } => write!(f, "min {min_length} letters"),
            Self::WrongStartLetter { expected } => write!(f, "must start with '{expected}'"),
            Self::AlreadyUsed => write!(f, "already used"),
            Self::NotInDictionary => write!(f, "not in dictionary"),
        }
    }
}

/// How a turn was resolved. Exactly one per turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason")]
pub enum Outcome {
    Valid,
    Invalid(RejectReason),
    Timeout,
    Passed,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Points awarded to the acting player: +1 for a valid word,
    /// −1 for everything else.
    pub fn score_delta(&self) -> i32 {
        if self.is_valid() { 1 } else { -1 }
    }

    /// The line a front end shows right after the turn resolves.
    pub fn notice(&self) -> String {
        match self {
            Self::Valid => "Nice! +1 point.".to_string(),
            Self::Invalid(reason) => format!("Oops ({reason}). -1 point."),
            Self::Timeout => "Time's up! -1 point.".to_string(),
            Self::Passed => "You passed your turn! -1 point.".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One resolved turn, appended to [`GameState::history`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The normalized submission. `None` for timeouts and passes.
    pub word: Option<String>,
    pub outcome: Outcome,
    pub by: Seat,
    /// Whole seconds from the start of the turn to its resolution.
    pub time_taken_secs: u64,
    /// Dictionary definition; only ever set for `Valid` entries.
    pub definition: Option<String>,
    /// Pronunciation from the dictionary, when it supplied one.
    pub phonetic: Option<String>,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The authoritative state of one game.
///
/// Owned and mutated by the engine alone; everyone else sees clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: [Player; 2],
    /// Whose move is pending.
    pub turn: Seat,
    /// Lowercase letter the next word must begin with.
    pub required_letter: char,
    pub epoch: TurnEpoch,
    pub phase: Phase,
    pub history: Vec<HistoryEntry>,
}

impl GameState {
    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player {
        &mut self.players[seat.index()]
    }

    /// The player whose move is pending.
    pub fn current_player(&self) -> &Player {
        self.player(self.turn)
    }

    /// The most recent accepted word, if the chain has started.
    pub fn last_valid_word(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|entry| entry.outcome.is_valid())
            .and_then(|entry| entry.word.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Commands and events
// ---------------------------------------------------------------------------

/// Everything a front end can ask the engine to do.
///
/// `SubmitWord` carries the epoch the player saw when they typed the word,
/// so a submission that arrives after its turn already ended is recognised
/// as stale instead of being scored against the next player.
///
/// Internally tagged: `{ "type": "SubmitWord", "text": "apple", "epoch": 0 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    StartGame,
    NewGame,
    SubmitWord { text: String, epoch: TurnEpoch },
    PassTurn,
    RandomizeStartLetter,
    RenamePlayer { seat: Seat, name: String },
}

/// Everything the engine pushes to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Full state after a transition, with the one-line outcome message
    /// for that transition when there is one.
    Snapshot {
        state: GameState,
        notice: Option<String>,
    },
    /// Countdown progress for the live turn.
    Clock { epoch: TurnEpoch, seconds_left: u32 },
}

// =========================================================================
// Tests
// =========================================================================
