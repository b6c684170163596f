//! Stop-word filtering for candidate keywords.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an",
        "and", "any", "are", "as", "at", "be", "because", "been", "before", "being",
        "below", "between", "both", "but", "by", "can", "could", "did", "do", "does",
        "doing", "down", "during", "each", "few", "for", "from", "further", "had",
        "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
        "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more",
        "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
        "or", "other", "our", "ours", "out", "over", "own", "said", "same", "she",
        "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
        "them", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
        "where", "which", "while", "who", "whom", "why", "will", "with", "would",
        "you", "your", "yours",
    ]
    .into_iter()
    .collect()
});

/// Whether a single token is a stop word.
pub fn is_stop(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Whether a normalized keyword survives the pre-merge filters: minimum
/// length, not a stop word, and for phrases neither boundary word is a
/// stop word.
pub fn valid_candidate(keyword: &str, min_len: usize) -> bool {
    if keyword.len() < min_len {
        return false;
    }
    let words: Vec<&str> = keyword.split_whitespace().collect();
    match words.as_slice() {
        [] => false,
        [single] => !is_stop(single),
        [first, .., last] => !is_stop(first) && !is_stop(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words() {
        assert!(is_stop("the"));
        assert!(is_stop("between"));
        assert!(!is_stop("acquisition"));
    }

    #[test]
    fn test_valid_candidate() {
        assert!(valid_candidate("acquisition", 3));
        assert!(valid_candidate("market share", 3));
        assert!(!valid_candidate("ai", 3)); // below min length
        assert!(!valid_candidate("the", 3)); // stop word
        assert!(!valid_candidate("the market", 3)); // leading stop word
        assert!(!valid_candidate("market of", 3)); // trailing stop word
        assert!(valid_candidate("cost of capital", 3)); // interior stop word ok
    }
}
