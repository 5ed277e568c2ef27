//! Dictionary gateway for Shiritori.
//!
//! The engine only needs one capability from the outside world: "is this
//! a real word?", answered asynchronously and allowed to fail. The
//! [`DictionaryGateway`] trait is that capability; [`FreeDictionaryClient`]
//! is the production implementation backed by dictionaryapi.dev.
//!
//! # Miss vs. failure
//!
//! A lookup ends in one of three ways:
//!
//! - `Ok(Lookup { found: true, .. })`: the word exists.
//! - `Ok(Lookup { found: false, .. })`: the service answered and the
//!   word is not there (HTTP 404, or an entry without a definition).
//! - `Err(DictionaryError)`: the service could not be asked or its
//!   answer could not be read.
//!
//! The engine scores the last two identically but logs them differently.

mod error;
mod free_dictionary;

pub use error::DictionaryError;
pub use free_dictionary::{DictionaryConfig, FreeDictionaryClient, parse_entries};

use std::future::Future;

/// What the dictionary knows about a word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub found: bool,
    /// First definition of the first meaning; only set when `found`.
    pub definition: Option<String>,
    pub phonetic: Option<String>,
}

impl Lookup {
    /// A hit with its definition.
    pub fn found(definition: impl Into<String>, phonetic: Option<String>) -> Self {
        Self {
            found: true,
            definition: Some(definition.into()),
            phonetic,
        }
    }

    /// A clean miss.
    pub fn not_found() -> Self {
        Self::default()
    }
}

/// Looks words up, asynchronously and fallibly.
///
/// The returned future must be `Send` because the engine awaits it on a
/// spawned task while the turn clock keeps running. Implementors can
/// still write a plain `async fn lookup`.
///
/// No latency bound is assumed: a lookup that outlives its turn is
/// discarded by the engine when it finally completes.
pub trait DictionaryGateway: Send + Sync + 'static {
    /// Looks up a normalized (lowercase, letters-only) word.
    fn lookup(&self, word: &str) -> impl Future<Output = Result<Lookup, DictionaryError>> + Send;
}
