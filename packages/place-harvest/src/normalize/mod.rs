//! Text normalization for free-text fields.
//!
//! [`normalize`] turns optional text into an ordered list of stemmed tokens
//! in four fixed stages:
//!
//! 1. lowercase and split into alphanumeric runs
//! 2. spell purely numeric tokens as English words
//! 3. re-tokenize into words and drop stopwords
//! 4. stem every remaining word with Porter's algorithm
//!
//! A stage that fails is logged with the offending input, and the tokens
//! from the last completed stage are returned. Normalization never fails as
//! a whole, so one bad cell cannot stop a batch.

pub mod numbers;
pub mod stopwords;
pub mod tokenize;

use tracing::{debug, warn};

use crate::error::NormalizationError;

/// Normalize `text` into tokens. `None` gives an empty list.
pub fn normalize(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        debug!("No text to normalize");
        return Vec::new();
    };

    let tokens = tokenize::alphanumeric_tokens(text);

    let spelled = match spell_numbers(&tokens) {
        Ok(spelled) => spelled,
        Err(e) => {
            warn!(input = %text, error = %e, stage = "numerals", "Normalization stopped early");
            return tokens;
        }
    };

    let words = remove_stopwords(&spelled);
    stem(&words)
}

/// Replace every purely numeric token with its spelled-out words.
fn spell_numbers(tokens: &[String]) -> Result<Vec<String>, NormalizationError> {
    tokens
        .iter()
        .map(|token| {
            if numbers::is_numeric(token) {
                numbers::spell(token)
            } else {
                Ok(token.clone())
            }
        })
        .collect()
}

/// Re-tokenize the joined tokens into words and drop stopwords.
fn remove_stopwords(tokens: &[String]) -> Vec<String> {
    tokenize::word_tokens(&tokens.join(" "))
        .into_iter()
        .filter(|word| !stopwords::is_stopword(word))
        .collect()
}

/// Porter stems for ASCII words; words in other scripts pass through as is.
fn stem(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|word| {
            if word.is_ascii() {
                porter_stemmer::stem(word)
            } else {
                word.clone()
            }
        })
        .collect()
}
