//! Shared domain types used across the scoring pipeline.

use serde::{Deserialize, Serialize};

/// The six component scores behind a composite importance value.
///
/// Each component is on the 0–100 scale; the composite is their weighted
/// sum with weights summing to 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Frequency/distribution (TF-IDF derived).
    pub frequency: f64,
    /// Contextual relevance (embedding similarity, neutral 50 without a provider).
    pub contextual_relevance: f64,
    /// Entity boost (tiered by entity category).
    pub entity_boost: f64,
    /// Temporal dynamics (velocity + acceleration around a neutral 50).
    pub temporal_dynamics: f64,
    /// Source diversity (diminishing returns in unique source count).
    pub source_diversity: f64,
    /// Sentiment magnitude (strong or polarized sentiment raises importance).
    pub sentiment_magnitude: f64,
}

/// A representative context snippet with its sentiment reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSnippet {
    pub text: String,
    /// Snippet polarity in [-1, 1].
    pub sentiment: f64,
    /// "positive" | "negative" | "neutral".
    pub classification: String,
}
