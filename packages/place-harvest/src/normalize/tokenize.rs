//! Token patterns for the two tokenization passes.

use regex::Regex;
use std::sync::LazyLock;

/// Maximal runs of letters, marks and numbers.
static ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{M}\p{N}]+").unwrap());

/// Alphanumeric runs, with inner hyphens kept inside the word.
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{M}\p{N}]+(?:-[\p{L}\p{M}\p{N}]+)*").unwrap()
});

/// Fused forms split into their two parts.
const FUSED: &[(&str, &str, &str)] = &[
    ("cannot", "can", "not"),
    ("gimme", "gim", "me"),
    ("gonna", "gon", "na"),
    ("gotta", "got", "ta"),
    ("lemme", "lem", "me"),
    ("wanna", "wan", "na"),
];

/// Lowercase `text` and split it into alphanumeric runs; everything else
/// separates.
pub fn alphanumeric_tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    ALPHANUMERIC
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Split `text` into words, keeping hyphenated words whole and splitting
/// fused forms.
pub fn word_tokens(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for m in WORD.find_iter(text) {
        let word = m.as_str();
        match FUSED.iter().find(|(fused, _, _)| *fused == word) {
            Some((_, head, tail)) => {
                words.push(head.to_string());
                words.push(tail.to_string());
            }
            None => words.push(word.to_string()),
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphanumeric_tokens() {
        assert_eq!(
            alphanumeric_tokens("Hello, World! It's 5 o'clock."),
            vec!["hello", "world", "it", "s", "5", "o", "clock"]
        );
        assert_eq!(alphanumeric_tokens("Café Zürich"), vec!["café", "zürich"]);
        assert!(alphanumeric_tokens(" -- ").is_empty());
    }

    #[test]
    fn test_word_tokens_keep_hyphens() {
        assert_eq!(
            word_tokens("forty-two stone steps"),
            vec!["forty-two", "stone", "steps"]
        );
    }

    #[test]
    fn test_word_tokens_split_fused_forms() {
        assert_eq!(word_tokens("you cannot go"), vec!["you", "can", "not", "go"]);
        assert_eq!(word_tokens("gonna"), vec!["gon", "na"]);
    }
}
