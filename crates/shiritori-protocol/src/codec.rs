//! Codec trait and implementations for serializing game values.
//!
//! The engine emits plain Rust values ([`GameEvent`](crate::GameEvent)).
//! A presentation layer living in another process (a web page, a TUI
//! over a pipe) needs bytes instead. A "codec" is the strategy that turns
//! one into the other, so front ends can swap formats without the engine
//! noticing.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust values to bytes and decode them back.
///
/// `Send + Sync + 'static` lets a codec live inside a long-running
/// Tokio task that forwards engine events to a front end.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Human-readable, which is what a browser front end or a log line wants.
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use shiritori_protocol::{Codec, Command, JsonCodec, TurnEpoch};
///
/// let codec = JsonCodec;
/// let cmd = Command::SubmitWord { text: "apple".into(), epoch: TurnEpoch(0) };
///
/// let bytes = codec.encode(&cmd).unwrap();
/// let decoded: Command = codec.decode(&bytes).unwrap();
/// assert_eq!(cmd, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
