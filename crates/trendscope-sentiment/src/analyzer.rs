//! Contextual sentiment scoring of keyword mentions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexicon::Lexicon;
use trendscope_core::SampleSnippet;

/// Default classification threshold: |polarity| below this is neutral.
pub const MAGNITUDE_THRESHOLD: f64 = 0.05;

/// Sentiment reading of one piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSentiment {
    /// Overall polarity in [-1, 1].
    pub polarity: f64,
    /// Share of sentiment weight that is positive, in [0, 1].
    pub positive_strength: f64,
    /// Share of sentiment weight that is negative, in [0, 1].
    pub negative_strength: f64,
    /// Sentiment density in [0, 1]; how saturated the text is with
    /// sentiment-bearing words.
    pub magnitude: f64,
}

/// Discrete classification of a polarity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// A document handed to `analyze_keyword`; only content and identity are
/// needed here.
#[derive(Debug, Clone)]
pub struct ContextDocument {
    pub content_id: i64,
    pub content: String,
}

/// Aggregated sentiment profile of a keyword across a document set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordSentiment {
    /// Mean polarity over all contextual snippets, [-1, 1].
    pub sentiment_score: f64,
    /// Mean magnitude over all contextual snippets, [0, 1].
    pub sentiment_magnitude: f64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
    pub neutral_mentions: i64,
    /// The most polarized snippets, up to 5.
    pub sample_snippets: Vec<SampleSnippet>,
}

/// All occurrences of `keyword` in `text` (case-insensitive), each with
/// `window` characters of surrounding context on both sides.
pub fn extract_context(text: &str, keyword: &str, window: usize) -> Vec<String> {
    if keyword.is_empty() {
        return Vec::new();
    }
    let text_lower = text.to_lowercase();
    let kw_lower = keyword.to_lowercase();

    text_lower
        .match_indices(&kw_lower)
        .map(|(start, _)| {
            let from = floor_char_boundary(text, start.saturating_sub(window));
            let to = ceil_char_boundary(text, start + kw_lower.len() + window);
            text[from..to].trim().to_string()
        })
        .collect()
}

fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Lexicon-based sentiment analyzer with negation and intensifier
/// handling.
pub struct SentimentAnalyzer {
    lexicon: Lexicon,
    magnitude_threshold: f64,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::builtin(),
            magnitude_threshold: MAGNITUDE_THRESHOLD,
        }
    }

    /// Analyzer without a lexicon; every reading is neutral.
    pub fn unavailable() -> Self {
        Self {
            lexicon: Lexicon::unavailable(),
            magnitude_threshold: MAGNITUDE_THRESHOLD,
        }
    }

    /// Score a text. Neutral (all zeros) when no sentiment-bearing words
    /// are found or the lexicon capability is absent.
    pub fn score_text(&self, text: &str) -> TextSentiment {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();
        if tokens.is_empty() {
            return TextSentiment::default();
        }

        let mut positive = 0.0_f64;
        let mut negative = 0.0_f64;

        for (i, token) in tokens.iter().enumerate() {
            let valence = if self.lexicon.is_positive(token) {
                1.0
            } else if self.lexicon.is_negative(token) {
                -1.0
            } else {
                continue;
            };

            // Look back two tokens for modifiers: negators flip the
            // valence, intensifiers boost it.
            let mut weight = 1.0;
            let mut sign = valence;
            for prev in tokens[i.saturating_sub(2)..i].iter() {
                if self.lexicon.is_negator(prev) {
                    sign = -sign;
                } else if self.lexicon.is_intensifier(prev) {
                    weight *= 1.5;
                }
            }

            if sign > 0.0 {
                positive += weight;
            } else {
                negative += weight;
            }
        }

        let total = positive + negative;
        if total <= 0.0 {
            return TextSentiment::default();
        }

        TextSentiment {
            polarity: (positive - negative) / total,
            positive_strength: positive / total,
            negative_strength: negative / total,
            magnitude: (total / tokens.len() as f64 * 5.0).min(1.0),
        }
    }

    /// Classify a polarity value against the neutrality threshold.
    pub fn classify(&self, polarity: f64) -> SentimentClass {
        if polarity.abs() < self.magnitude_threshold {
            SentimentClass::Neutral
        } else if polarity > 0.0 {
            SentimentClass::Positive
        } else {
            SentimentClass::Negative
        }
    }

    /// Analyze a keyword's sentiment across a set of documents: contextual
    /// snippets from every document, per-snippet scores, aggregate
    /// polarity/magnitude, mention tallies, and the 5 most polarized
    /// snippets as samples.
    pub fn analyze_keyword(
        &self,
        keyword: &str,
        documents: &[ContextDocument],
        window: usize,
    ) -> KeywordSentiment {
        let mut snippets = Vec::new();
        for doc in documents {
            snippets.extend(extract_context(&doc.content, keyword, window));
        }
        self.analyze_snippets(keyword, &snippets)
    }

    /// Aggregate sentiment over context snippets already extracted
    /// elsewhere (e.g. accumulated during batch processing).
    pub fn analyze_snippets(&self, keyword: &str, snippets: &[String]) -> KeywordSentiment {
        let mut scored: Vec<(String, TextSentiment)> = snippets
            .iter()
            .map(|s| (s.clone(), self.score_text(s)))
            .collect();

        if scored.is_empty() {
            return KeywordSentiment::default();
        }

        let n = scored.len() as f64;
        let sentiment_score = scored.iter().map(|(_, s)| s.polarity).sum::<f64>() / n;
        let sentiment_magnitude = scored.iter().map(|(_, s)| s.magnitude).sum::<f64>() / n;

        let mut positive_mentions = 0;
        let mut negative_mentions = 0;
        let mut neutral_mentions = 0;
        for (_, sentiment) in &scored {
            match self.classify(sentiment.polarity) {
                SentimentClass::Positive => positive_mentions += 1,
                SentimentClass::Negative => negative_mentions += 1,
                SentimentClass::Neutral => neutral_mentions += 1,
            }
        }

        scored.sort_by(|a, b| {
            b.1.polarity
                .abs()
                .partial_cmp(&a.1.polarity.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let sample_snippets: Vec<SampleSnippet> = scored
            .into_iter()
            .take(5)
            .map(|(text, sentiment)| SampleSnippet {
                text,
                sentiment: sentiment.polarity,
                classification: self.classify(sentiment.polarity).to_string(),
            })
            .collect();

        debug!(
            "Keyword '{}': {} snippets, score={:.3}, magnitude={:.3}",
            keyword,
            positive_mentions + negative_mentions + neutral_mentions,
            sentiment_score,
            sentiment_magnitude
        );

        KeywordSentiment {
            sentiment_score,
            sentiment_magnitude,
            positive_mentions,
            negative_mentions,
            neutral_mentions,
            sample_snippets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.classify(-0.02), SentimentClass::Neutral);
        assert_eq!(analyzer.classify(0.2), SentimentClass::Positive);
        assert_eq!(analyzer.classify(-0.3), SentimentClass::Negative);
    }

    #[test]
    fn test_score_positive_text() {
        let analyzer = SentimentAnalyzer::new();
        let s = analyzer.score_text("Shares surged after the excellent earnings beat.");
        assert!(s.polarity > 0.5);
        assert!(s.magnitude > 0.0);
    }

    #[test]
    fn test_negation_flips() {
        let analyzer = SentimentAnalyzer::new();
        let plain = analyzer.score_text("The results were good.");
        let negated = analyzer.score_text("The results were not good.");
        assert!(plain.polarity > 0.0);
        assert!(negated.polarity < 0.0);
    }

    #[test]
    fn test_contracted_negation_flips() {
        let analyzer = SentimentAnalyzer::new();
        let contracted = analyzer.score_text("The results weren't good.");
        assert!(contracted.polarity < 0.0);
        let doubled = analyzer.score_text("The launch wasn't successful either.");
        assert!(doubled.polarity < 0.0);
    }

    #[test]
    fn test_intensifier_raises_magnitude() {
        let analyzer = SentimentAnalyzer::new();
        let plain = analyzer.score_text("revenue declined this quarter overall yes");
        let boosted = analyzer.score_text("revenue sharply declined this quarter overall");
        assert!(boosted.magnitude > plain.magnitude);
    }

    #[test]
    fn test_unavailable_lexicon_is_neutral() {
        let analyzer = SentimentAnalyzer::unavailable();
        let s = analyzer.score_text("Amazing wonderful excellent results!");
        assert_eq!(s, TextSentiment::default());
        assert_eq!(analyzer.classify(s.polarity), SentimentClass::Neutral);
    }

    #[test]
    fn test_extract_context_all_occurrences() {
        let text = "Acme rallied early. Critics doubted Acme. By close, ACME had recovered.";
        let snippets = extract_context(text, "acme", 10);
        assert_eq!(snippets.len(), 3);
        assert!(snippets[0].contains("Acme rallied"));
        assert!(snippets[2].contains("ACME had"));
    }

    #[test]
    fn test_extract_context_window_bounds() {
        let snippets = extract_context("keyword", "keyword", 50);
        assert_eq!(snippets, vec!["keyword".to_string()]);
    }

    #[test]
    fn test_analyze_keyword_counts_and_samples() {
        let analyzer = SentimentAnalyzer::new();
        let docs = vec![
            ContextDocument {
                content_id: 1,
                content: "The merger was an excellent success for everyone involved.".into(),
            },
            ContextDocument {
                content_id: 2,
                content: "Regulators warned the merger poses serious risks.".into(),
            },
            ContextDocument {
                content_id: 3,
                content: "The merger paperwork was filed on Tuesday.".into(),
            },
        ];

        let result = analyzer.analyze_keyword("merger", &docs, 100);
        assert_eq!(result.positive_mentions, 1);
        assert_eq!(result.negative_mentions, 1);
        assert_eq!(result.neutral_mentions, 1);
        assert_eq!(result.sample_snippets.len(), 3);
        // Samples ordered by |polarity| descending.
        assert!(result.sample_snippets[0].sentiment.abs() >= result.sample_snippets[1].sentiment.abs());
    }
}
