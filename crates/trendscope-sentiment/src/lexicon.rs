//! Sentiment word lists and modifier handling.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "superb",
        "outstanding", "brilliant", "love", "loved", "best", "better", "positive",
        "happy", "beautiful", "perfect", "awesome", "strong", "strength", "gain",
        "gains", "gained", "growth", "growing", "grew", "improve", "improved",
        "improvement", "improving", "success", "successful", "win", "winning", "won",
        "record", "surge", "surged", "soar", "soared", "rally", "rallied", "boost",
        "boosted", "beat", "exceeded", "breakthrough", "profit", "profitable",
        "optimistic", "upbeat", "praised", "approval", "approved", "milestone",
        "robust", "momentum", "opportunity", "innovative", "leading", "thriving",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "poor", "worst", "worse", "hate",
        "hated", "dislike", "disappointing", "disappointed", "failure", "failed",
        "fail", "failing", "negative", "sad", "weak", "weakness", "loss", "losses",
        "lost", "decline", "declined", "declining", "drop", "dropped", "fall",
        "fell", "plunge", "plunged", "crash", "crashed", "slump", "slumped",
        "crisis", "risk", "risks", "risky", "fear", "fears", "concern", "concerns",
        "warning", "warned", "lawsuit", "fraud", "scandal", "layoffs", "cuts",
        "bankruptcy", "default", "recession", "downturn", "struggling", "trouble",
        "troubled", "missed", "shortfall", "penalty", "fined", "probe", "breach",
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "very", "extremely", "highly", "hugely", "massively", "sharply", "deeply",
        "significantly", "remarkably", "substantially", "strongly", "severely",
    ]
    .into_iter()
    .collect()
});

// Contractions stay single tokens (the tokenizer keeps apostrophes), so
// they are listed whole.
static NEGATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "neither", "nor", "hardly", "barely", "without",
        "don't", "doesn't", "didn't", "isn't", "aren't", "wasn't", "weren't",
        "won't", "can't", "cannot", "couldn't", "shouldn't", "wouldn't",
        "hasn't", "haven't", "hadn't",
    ]
    .into_iter()
    .collect()
});

/// Lexicon capability: positive/negative valence lookup plus modifier
/// classes. Constructed empty when the capability is unavailable, in which
/// case every reading is neutral.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    enabled: bool,
}

impl Lexicon {
    /// The built-in English lexicon.
    pub fn builtin() -> Self {
        Self { enabled: true }
    }

    /// An unavailable lexicon; all lookups miss.
    pub fn unavailable() -> Self {
        Self { enabled: false }
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    pub fn is_positive(&self, word: &str) -> bool {
        self.enabled && POSITIVE_WORDS.contains(word)
    }

    pub fn is_negative(&self, word: &str) -> bool {
        self.enabled && NEGATIVE_WORDS.contains(word)
    }

    pub fn is_intensifier(&self, word: &str) -> bool {
        self.enabled && INTENSIFIERS.contains(word)
    }

    pub fn is_negator(&self, word: &str) -> bool {
        self.enabled && NEGATORS.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let lex = Lexicon::builtin();
        assert!(lex.is_positive("surge"));
        assert!(lex.is_negative("lawsuit"));
        assert!(lex.is_intensifier("sharply"));
        assert!(lex.is_negator("not"));
        assert!(lex.is_negator("doesn't"));
        assert!(lex.is_negator("wasn't"));
        assert!(!lex.is_positive("table"));
    }

    #[test]
    fn test_unavailable_misses_everything() {
        let lex = Lexicon::unavailable();
        assert!(!lex.is_available());
        assert!(!lex.is_positive("surge"));
        assert!(!lex.is_negative("lawsuit"));
    }
}
