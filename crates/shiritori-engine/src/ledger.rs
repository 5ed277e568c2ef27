use std::collections::HashSet;

/// Normalized words accepted so far in the current game.
///
/// Written only when a turn resolves as valid; cleared only by a new game.
#[derive(Debug, Clone, Default)]
pub struct UsedWords {
    words: HashSet<String>,
}

impl UsedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Records a word. Returns `false` (and changes nothing) if it was
    /// already present.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.words.contains(word) {
            return false;
        }
        self.words.insert(word.to_string())
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut ledger = UsedWords::new();
        assert!(ledger.insert("apple"));
        assert!(!ledger.insert("apple"));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("apple"));
    }

    #[test]
    fn test_clear_empties() {
        let mut ledger = UsedWords::new();
        ledger.insert("apple");
        ledger.insert("eagle");
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.contains("apple"));
    }
}
