//! Random start letters.
//!
//! The engine never reaches for a global RNG. It is handed a
//! [`LetterSource`] when it is built, so tests can pin the start letter
//! with a seed or a scripted source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks a start letter from an alphabet.
pub trait LetterSource: Send + 'static {
    /// Returns one letter of `alphabet`. Falls back to `'a'` if the
    /// alphabet is empty.
    fn pick(&mut self, alphabet: &[char]) -> char;
}

impl LetterSource for Box<dyn LetterSource> {
    fn pick(&mut self, alphabet: &[char]) -> char {
        (**self).pick(alphabet)
    }
}

/// [`LetterSource`] backed by a seedable `rand` generator.
#[derive(Debug, Clone)]
pub struct RngLetters {
    rng: StdRng,
}

impl RngLetters {
    /// Seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl LetterSource for RngLetters {
    fn pick(&mut self, alphabet: &[char]) -> char {
        if alphabet.is_empty() {
            return 'a';
        }
        alphabet[self.rng.random_range(0..alphabet.len())]
    }
}
