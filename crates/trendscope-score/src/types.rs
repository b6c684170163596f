//! Inputs and outputs of the importance calculator.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use trendscope_core::{ComponentScores, EntityCategory};

/// Component weights for the composite importance score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportanceWeights {
    pub frequency: f64,
    pub contextual_relevance: f64,
    pub entity_boost: f64,
    pub temporal_dynamics: f64,
    pub source_diversity: f64,
    pub sentiment_magnitude: f64,
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self {
            frequency: 0.25,
            contextual_relevance: 0.20,
            entity_boost: 0.15,
            temporal_dynamics: 0.20,
            source_diversity: 0.10,
            sentiment_magnitude: 0.10,
        }
    }
}

impl ImportanceWeights {
    /// Whether the weights sum to 1.0 (within tolerance).
    pub fn is_valid(&self) -> bool {
        let sum = self.frequency
            + self.contextual_relevance
            + self.entity_boost
            + self.temporal_dynamics
            + self.source_diversity
            + self.sentiment_magnitude;
        (sum - 1.0).abs() < 1e-6
    }
}

/// Everything the calculator needs to know about one keyword in one batch.
#[derive(Debug, Clone)]
pub struct KeywordSignals {
    pub keyword: String,
    /// Total occurrences across the batch.
    pub frequency: i64,
    /// Number of documents in the batch.
    pub corpus_size: i64,
    /// Store-wide document count, for the IDF denominator context.
    pub total_documents: i64,
    /// Documents in the batch mentioning this keyword.
    pub document_count: i64,
    /// Daily frequencies before the current day, oldest first.
    pub history: Vec<i64>,
    /// Distinct sources mentioning the keyword.
    pub source_count: usize,
    /// Mean polarity of contextual mentions, [-1, 1].
    pub sentiment_score: f64,
    /// Mean sentiment magnitude of contextual mentions, [0, 1].
    pub sentiment_magnitude: f64,
    pub entity_category: Option<EntityCategory>,
    pub is_phrase: bool,
    /// Contextual snippets for embedding similarity.
    pub snippets: Vec<String>,
}

/// Precomputed embeddings for a keyword and its snippets, produced in one
/// batch call before parallel scoring starts.
#[derive(Debug, Clone, Default)]
pub struct KeywordEmbeddings {
    pub keyword: Option<Array1<f32>>,
    pub snippets: Vec<Array1<f32>>,
}

/// The calculator's full output for one keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceBreakdown {
    /// Composite importance, [0, 100].
    pub importance: f64,
    pub components: ComponentScores,
    /// Percent change of current frequency against the historical mean.
    pub velocity: f64,
    /// Change in velocity between the recent and older halves of history.
    pub acceleration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_valid() {
        assert!(ImportanceWeights::default().is_valid());
    }

    #[test]
    fn test_unbalanced_weights_invalid() {
        let w = ImportanceWeights {
            frequency: 0.5,
            ..Default::default()
        };
        assert!(!w.is_valid());
    }
}
