//! Lexical rules: pure functions over words, no state.

use shiritori_protocol::RejectReason;

use crate::UsedWords;

/// Lowercases `raw` and drops every character outside `a`–`z`.
///
/// `"Apple-Pie!"` becomes `"applepie"`. Idempotent, so a word and any
/// re-capitalised or re-punctuated form of it normalize to the same key.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// The final `a`–`z` letter of `word`, ignoring trailing non-letters.
pub fn last_letter(word: &str) -> Option<char> {
    word.to_lowercase()
        .chars()
        .rev()
        .find(|c| c.is_ascii_lowercase())
}

/// Checks everything about a submission that doesn't need the dictionary.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. at least `min_length` letters,
/// 2. starts with `required`,
/// 3. not already in `used`.
///
/// On success returns the normalized word.
pub fn check_structure(
    raw: &str,
    required: char,
    min_length: usize,
    used: &UsedWords,
) -> Result<String, RejectReason> {
    let word = normalize(raw);
    if word.len() < min_length {
        return Err(RejectReason::TooShort { min_length });
    }
    if !word.starts_with(required) {
        return Err(RejectReason::WrongStartLetter { expected: required });
    }
    if used.contains(&word) {
        return Err(RejectReason::AlreadyUsed);
    }
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used(words: &[&str]) -> UsedWords {
        let mut ledger = UsedWords::new();
        for w in words {
            ledger.insert(w);
        }
        ledger
    }

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize("  Apple-Pie! "), "applepie");
        assert_eq!(normalize("ÉCLAIR"), "clair");
        assert_eq!(normalize("42"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("Don't Stop");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_last_letter_ignores_trailing_punctuation() {
        assert_eq!(last_letter("apple"), Some('e'));
        assert_eq!(last_letter("Hello!!"), Some('o'));
        assert_eq!(last_letter("wow 123"), Some('w'));
    }

    #[test]
    fn test_last_letter_of_empty_or_letterless() {
        assert_eq!(last_letter(""), None);
        assert_eq!(last_letter("?!"), None);
    }

    #[test]
    fn test_check_structure_accepts() {
        let word = check_structure("Apple", 'a', 4, &UsedWords::new()).unwrap();
        assert_eq!(word, "apple");
    }

    #[test]
    fn test_check_structure_too_short() {
        let err = check_structure("cat", 'a', 4, &UsedWords::new()).unwrap_err();
        assert_eq!(err, RejectReason::TooShort { min_length: 4 });
    }

    #[test]
    fn test_check_structure_counts_letters_only() {
        // Four characters, three letters.
        let err = check_structure("a-ha", 'a', 4, &UsedWords::new()).unwrap_err();
        assert_eq!(err.code(), "too_short");
    }

    #[test]
    fn test_check_structure_wrong_letter() {
        let err = check_structure("banana", 'a', 4, &UsedWords::new()).unwrap_err();
        assert_eq!(err, RejectReason::WrongStartLetter { expected: 'a' });
    }

    #[test]
    fn test_check_structure_already_used_ignores_case_and_punctuation() {
        let ledger = used(&["apple"]);
        let err = check_structure("A.P.P.L.E", 'a', 4, &ledger).unwrap_err();
        assert_eq!(err, RejectReason::AlreadyUsed);
    }

    #[test]
    fn test_check_structure_first_failure_wins() {
        // Short, wrong letter, and used all at once: length is reported.
        let ledger = used(&["bee"]);
        let err = check_structure("bee", 'a', 4, &ledger).unwrap_err();
        assert_eq!(err.code(), "too_short");

        // Wrong letter and used: the letter is reported.
        let ledger = used(&["bees"]);
        let err = check_structure("bees", 'a', 4, &ledger).unwrap_err();
        assert_eq!(err.code(), "wrong_start_letter");
    }
}
