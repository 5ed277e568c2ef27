//! Shared vocabulary for Shiritori.
//!
//! This crate defines everything that crosses the boundary between the
//! game engine and whoever is watching it:
//!
//! - **Types** ([`GameState`], [`HistoryEntry`], [`Outcome`], [`Seat`],
//!   [`TurnEpoch`], etc.): the authoritative data model.
//! - **Commands** ([`Command`]): what a front end may ask the engine to do.
//! - **Events** ([`GameEvent`]): what the engine pushes back out.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those values are
//!   turned into bytes for a presentation layer.
//!
//! ```text
//! Front end ── Command ──→ Engine ── GameEvent ──→ Front end
//! ```
//!
//! Nothing in here knows about clocks, dictionaries or tasks. The engine
//! crate owns the behaviour; this crate only owns the shapes.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Command, GameEvent, GameState, HistoryEntry, Outcome, Phase, Player,
    RejectReason, Seat, TurnEpoch,
};
