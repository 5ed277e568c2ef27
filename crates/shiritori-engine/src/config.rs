//! Game configuration.

use shiritori_clock::ClockConfig;
use tracing::warn;

/// Startup constants for one engine. Fixed once the engine is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Seconds a player has for one turn.
    pub turn_seconds: u32,
    /// Fewest letters a word may have (after normalization).
    pub min_word_length: usize,
    /// Letters a random start letter is drawn from.
    pub alphabet: Vec<char>,
    /// Display names of the two players, in seat order.
    pub player_names: [String; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 15,
            min_word_length: 4,
            alphabet: ('a'..='z').collect(),
            player_names: ["Player 1".to_string(), "Player 2".to_string()],
        }
    }
}

impl GameConfig {
    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Game::new`](crate::Game::new). Rules:
    /// - `turn_seconds` clamped to `1..=ClockConfig::MAX_TURN_SECONDS`.
    /// - `min_word_length` at least 1.
    /// - `alphabet` reduced to distinct lowercase ASCII letters; `a`–`z`
    ///   if nothing is left.
    /// - blank player names replaced by the defaults.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        let clamped = self.turn_seconds.clamp(1, ClockConfig::MAX_TURN_SECONDS);
        if clamped != self.turn_seconds {
            warn!(
                turn_seconds = self.turn_seconds,
                clamped, "turn_seconds out of range, clamping"
            );
            self.turn_seconds = clamped;
        }

        if self.min_word_length == 0 {
            warn!("min_word_length is zero, using 1");
            self.min_word_length = 1;
        }

        let mut alphabet: Vec<char> = self
            .alphabet
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .filter(char::is_ascii_lowercase)
            .collect();
        alphabet.sort_unstable();
        alphabet.dedup();
        if alphabet.is_empty() {
            warn!("alphabet has no usable letters, using a-z");
            alphabet = defaults.alphabet;
        }
        self.alphabet = alphabet;

        for (name, default) in self.player_names.iter_mut().zip(defaults.player_names) {
            let trimmed = name.trim();
            *name = if trimmed.is_empty() {
                default
            } else {
                trimmed.to_string()
            };
        }

        self
    }

    /// Clock settings for one turn.
    pub fn clock_config(&self) -> ClockConfig {
        ClockConfig::with_seconds(self.turn_seconds)
    }
}
