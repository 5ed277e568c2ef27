/// Errors that can occur while asking the dictionary.
///
/// None of these are fatal to a game: the engine turns every one of them
/// into a "not in dictionary" verdict. They exist so logs can tell a
/// flaky network apart from a word that simply doesn't exist.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// The base URL can't carry a word path.
    #[error("invalid dictionary url: {0}")]
    InvalidUrl(String),

    /// Connecting, sending, or reading the body failed (includes timeouts).
    #[error("dictionary request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The service answered with a status other than success or 404.
    #[error("dictionary returned HTTP {0}")]
    Status(u16),

    /// The body wasn't the JSON shape the service documents.
    #[error("malformed dictionary payload: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl DictionaryError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::Request(e) if e.is_timeout() => "timeout",
            Self::Request(_) => "request",
            Self::Status(_) => "status",
            Self::Malformed(_) => "malformed",
        }
    }
}
