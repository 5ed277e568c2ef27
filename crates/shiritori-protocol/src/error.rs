//! Error types for the protocol layer.
//!
//! Each Shiritori crate defines its own error enum. A `ProtocolError`
//! always means a problem with the *shape* of data (bytes that don't
//! decode, a seat number out of range), never a game rule violation.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: malformed JSON, missing fields, or a command
    /// type the engine doesn't know.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The value decoded but violates a protocol rule, e.g. a seat
    /// index other than 0 or 1.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
