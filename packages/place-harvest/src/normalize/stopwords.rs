//! English stopword list.
//!
//! The widely used 179-word English list, including the contraction stems
//! (`don`, `shouldn`, ...) that appear once apostrophes are stripped.

use std::collections::HashSet;
use std::sync::LazyLock;

pub const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOPWORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH.iter().copied().collect());

/// Check whether a lowercase token is a stopword.
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_size() {
        assert_eq!(ENGLISH.len(), 179);
        assert_eq!(STOPWORDS.len(), 179);
    }

    #[test]
    fn test_common_words() {
        assert!(is_stopword("the"));
        assert!(is_stopword("and"));
        assert!(is_stopword("shouldn"));
        assert!(!is_stopword("five"));
        assert!(!is_stopword("city"));
    }
}
