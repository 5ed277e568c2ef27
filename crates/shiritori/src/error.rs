//! Unified error type.

use shiritori_dictionary::DictionaryError;
use shiritori_engine::EngineError;
use shiritori_protocol::ProtocolError;

/// Top-level error wrapping every crate-specific error, so callers of
/// the facade can use `?` across all of them.
#[derive(Debug, thiserror::Error)]
pub enum ShiritoriError {
    /// Encoding or decoding a message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Building the dictionary client failed.
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// The engine refused a command or has stopped.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
