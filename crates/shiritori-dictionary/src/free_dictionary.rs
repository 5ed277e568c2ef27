//! HTTP client for the Free Dictionary API (dictionaryapi.dev).
//!
//! One request per lookup: `GET {base_url}/{word}`. A 404 is a clean miss;
//! a 2xx body is an array of entries and the word counts as found when the
//! first entry's first meaning has a non-empty first definition.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{DictionaryError, DictionaryGateway, Lookup};

/// Where and how to reach the dictionary service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryConfig {
    /// Endpoint the word is appended to as the last path segment.
    pub base_url: String,
    /// Per-request timeout. A lookup that times out is scored as a miss,
    /// so this must not be shorter than the turn it validates.
    pub timeout: Duration,
}

impl DictionaryConfig {
    /// Default timeout in seconds. Matches the longest turn a game may be
    /// configured with.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Raises the timeout to at least `turn_seconds`. Never lowers it.
    pub fn covering_turn(mut self, turn_seconds: u32) -> Self {
        self.timeout = self
            .timeout
            .max(Duration::from_secs(u64::from(turn_seconds)));
        self
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// [`DictionaryGateway`] backed by dictionaryapi.dev.
#[derive(Debug, Clone)]
pub struct FreeDictionaryClient {
    base_url: Url,
    client: reqwest::Client,
}

impl FreeDictionaryClient {
    /// Builds a client for the given endpoint.
    pub fn new(config: DictionaryConfig) -> Result<Self, DictionaryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| DictionaryError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DictionaryError::InvalidUrl(config.base_url));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(DictionaryError::Request)?;
        Ok(Self { base_url, client })
    }

    /// The URL a lookup for `word` requests. The word is percent-encoded
    /// as a single path segment.
    pub fn url_for(&self, word: &str) -> Result<Url, DictionaryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DictionaryError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(word);
        Ok(url)
    }
}

impl DictionaryGateway for FreeDictionaryClient {
    async fn lookup(&self, word: &str) -> Result<Lookup, DictionaryError> {
        let url = self.url_for(word)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DictionaryError::Request)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(word, "dictionary has no entry");
            return Ok(Lookup::not_found());
        }
        if !status.is_success() {
            return Err(DictionaryError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(DictionaryError::Request)?;
        parse_entries(&body)
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: Option<String>,
}

/// Reads a success body from the service.
///
/// Only the first entry matters. Its first meaning's first definition
/// decides whether the word is found; the phonetic comes from the entry's
/// `phonetic` field, falling back to the first non-empty `phonetics[].text`.
pub fn parse_entries(body: &[u8]) -> Result<Lookup, DictionaryError> {
    let entries: Vec<Entry> = serde_json::from_slice(body).map_err(DictionaryError::Malformed)?;
    let Some(entry) = entries.into_iter().next() else {
        return Ok(Lookup::not_found());
    };

    let definition = entry
        .meanings
        .into_iter()
        .next()
        .and_then(|meaning| meaning.definitions.into_iter().next())
        .and_then(|d| d.definition)
        .filter(|text| !text.trim().is_empty());

    let Some(definition) = definition else {
        return Ok(Lookup::not_found());
    };

    let phonetic = entry
        .phonetic
        .filter(|p| !p.is_empty())
        .or_else(|| {
            entry
                .phonetics
                .into_iter()
                .filter_map(|p| p.text)
                .find(|t| !t.is_empty())
        });

    Ok(Lookup::found(definition, phonetic))
}
