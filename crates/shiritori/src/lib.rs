//! # Shiritori
//!
//! Two players take turns naming words. Each word has to start with the
//! last letter of the previous accepted word, be long enough, be new to
//! the game, and be confirmed by a dictionary before the turn clock runs
//! out. Valid words score +1; everything else (including passing and
//! running out of time) scores −1.
//!
//! This crate re-exports the pieces:
//!
//! - [`protocol`]: game state, commands and events
//! - [`clock`]: the per-turn countdown
//! - [`dictionary`]: the lookup trait and the dictionaryapi.dev client
//! - [`engine`]: the state machine and the actor that runs it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shiritori::prelude::*;
//!
//! # async fn run() -> Result<(), ShiritoriError> {
//! shiritori::logging::init();
//!
//! let dictionary = FreeDictionaryClient::new(DictionaryConfig::default())?;
//! let engine = EngineBuilder::new()
//!     .config(GameConfig::default())
//!     .spawn(dictionary);
//!
//! engine.start_game().await?;
//! let state = engine.snapshot().await?;
//! engine.submit_word("apple", state.epoch).await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod logging;

pub use error::ShiritoriError;

pub use shiritori_clock as clock;
pub use shiritori_dictionary as dictionary;
pub use shiritori_engine as engine;
pub use shiritori_protocol as protocol;

/// Everything a front end needs, in one import.
pub mod prelude {
    pub use crate::ShiritoriError;

    pub use shiritori_protocol::{
        Codec, Command, GameEvent, GameState, HistoryEntry, JsonCodec, Outcome, Phase, Player,
        RejectReason, Seat, TurnEpoch,
    };

    pub use shiritori_dictionary::{
        DictionaryConfig, DictionaryError, DictionaryGateway, FreeDictionaryClient, Lookup,
    };

    pub use shiritori_engine::{
        EngineBuilder, EngineError, EngineHandle, EventSender, GameConfig, LetterSource,
        RngLetters, Transition,
    };
}
