//! The Shiritori game engine.
//!
//! Two layers:
//!
//! - [`Game`]: the synchronous state machine. It owns the authoritative
//!   [`GameState`](shiritori_protocol::GameState) and the used-word ledger,
//!   applies the lexical rules, and decides every turn resolution. It never
//!   waits on anything.
//! - The engine actor: an isolated Tokio task that owns one `Game`, the
//!   live [`TurnClock`](shiritori_clock::TurnClock) and the in-flight
//!   dictionary lookups, and feeds commands, clock signals and dictionary
//!   verdicts into the game one at a time. Talk to it through an
//!   [`EngineHandle`].
//!
//! # Key types
//!
//! - [`EngineBuilder`]: configure and spawn an engine
//! - [`EngineHandle`]: send commands, subscribe to events
//! - [`Game`] / [`Transition`]: the state machine and what it asks the
//!   actor to do next
//! - [`GameConfig`]: startup constants (turn length, minimum word length)
//! - [`rules`]: pure lexical helpers

mod config;
mod engine;
mod error;
mod game;
mod ledger;
mod letters;
pub mod rules;

pub use config::GameConfig;
pub use engine::{EngineBuilder, EngineHandle, EventSender};
pub use error::EngineError;
pub use game::{Game, Resolution, Transition};
pub use ledger::UsedWords;
pub use letters::{LetterSource, RngLetters};
