//! The six-component importance calculator.

use std::sync::Arc;

use ndarray::Array1;
use tracing::trace;

use crate::types::{ImportanceBreakdown, ImportanceWeights, KeywordEmbeddings, KeywordSignals};
use trendscope_core::{ComponentScores, EmbeddingProvider, EntityCategory, NoopEmbedding};

/// Snippets considered for contextual relevance per keyword.
const MAX_CONTEXT_SNIPPETS: usize = 10;

/// Computes composite importance scores on a 0-100 scale.
pub struct ImportanceCalculator {
    weights: ImportanceWeights,
    /// Source count at which diversity saturates.
    max_sources: usize,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Default for ImportanceCalculator {
    fn default() -> Self {
        Self::new(Arc::new(NoopEmbedding::new(384)))
    }
}

impl ImportanceCalculator {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            weights: ImportanceWeights::default(),
            max_sources: 10,
            embedder,
        }
    }

    pub fn with_weights(mut self, weights: ImportanceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources.max(1);
        self
    }

    pub fn weights(&self) -> &ImportanceWeights {
        &self.weights
    }

    /// Score one keyword. `embeddings` carries vectors precomputed in a
    /// batch pass; when absent the calculator embeds on the fly, and when
    /// no provider is available the contextual component stays neutral.
    pub fn score(
        &self,
        signals: &KeywordSignals,
        embeddings: Option<&KeywordEmbeddings>,
    ) -> ImportanceBreakdown {
        let frequency = self.frequency_score(signals);
        let contextual_relevance = self.contextual_score(signals, embeddings);
        let entity_boost = self.entity_boost(signals);
        let (temporal_dynamics, velocity, acceleration) = self.temporal_dynamics(signals);
        let source_diversity = self.source_diversity(signals.source_count);
        let sentiment_magnitude =
            self.sentiment_score(signals.sentiment_score, signals.sentiment_magnitude);

        let components = ComponentScores {
            frequency,
            contextual_relevance,
            entity_boost,
            temporal_dynamics,
            source_diversity,
            sentiment_magnitude,
        };

        let w = &self.weights;
        let importance = (w.frequency * frequency
            + w.contextual_relevance * contextual_relevance
            + w.entity_boost * entity_boost
            + w.temporal_dynamics * temporal_dynamics
            + w.source_diversity * source_diversity
            + w.sentiment_magnitude * sentiment_magnitude)
            .clamp(0.0, 100.0);

        trace!(
            "'{}': importance={:.1} freq={:.1} ctx={:.1} ent={:.1} temp={:.1} div={:.1} sent={:.1}",
            signals.keyword,
            importance,
            frequency,
            contextual_relevance,
            entity_boost,
            temporal_dynamics,
            source_diversity,
            sentiment_magnitude
        );

        ImportanceBreakdown {
            importance,
            components,
            velocity,
            acceleration,
        }
    }

    /// TF-IDF derived frequency score with logarithmic damping.
    fn frequency_score(&self, signals: &KeywordSignals) -> f64 {
        if signals.frequency <= 0 || signals.corpus_size <= 0 {
            return 0.0;
        }
        let tf = signals.frequency as f64 / signals.corpus_size as f64;
        let idf = ((signals.total_documents as f64 + 1.0)
            / (signals.document_count as f64 + 1.0))
            .ln();
        let raw = (tf * idf * 1000.0).max(0.0);
        ((1.0 + (1.0 + raw).ln()) * 20.0).min(100.0)
    }

    /// Mean cosine similarity between the keyword and its context
    /// snippets, mapped from [-1, 1] onto [0, 100]. Neutral 50 without an
    /// embedding provider or without snippets.
    fn contextual_score(
        &self,
        signals: &KeywordSignals,
        embeddings: Option<&KeywordEmbeddings>,
    ) -> f64 {
        let owned;
        let vectors = match embeddings {
            Some(e) => e,
            None => {
                owned = self.embed_signals(signals);
                &owned
            }
        };

        let keyword_vec = match &vectors.keyword {
            Some(v) => v,
            None => return 50.0,
        };
        if vectors.snippets.is_empty() {
            return 50.0;
        }

        let sum: f64 = vectors
            .snippets
            .iter()
            .take(MAX_CONTEXT_SNIPPETS)
            .map(|s| (cosine_similarity(keyword_vec, s) + 1.0) * 50.0)
            .sum();
        let n = vectors.snippets.len().min(MAX_CONTEXT_SNIPPETS) as f64;
        (sum / n).clamp(0.0, 100.0)
    }

    fn embed_signals(&self, signals: &KeywordSignals) -> KeywordEmbeddings {
        if !self.embedder.is_available() {
            return KeywordEmbeddings::default();
        }
        let keyword = self.embedder.embed(&signals.keyword);
        let snippets = signals
            .snippets
            .iter()
            .take(MAX_CONTEXT_SNIPPETS)
            .filter_map(|s| self.embedder.embed(s))
            .collect();
        KeywordEmbeddings { keyword, snippets }
    }

    /// Tiered boost by entity category, with a middle tier for phrases.
    fn entity_boost(&self, signals: &KeywordSignals) -> f64 {
        match signals.entity_category {
            Some(
                EntityCategory::Person
                | EntityCategory::Organization
                | EntityCategory::Product
                | EntityCategory::Place
                | EntityCategory::Event
                | EntityCategory::Legal,
            ) => 85.0,
            Some(
                EntityCategory::Monetary
                | EntityCategory::Date
                | EntityCategory::Numeric
                | EntityCategory::Group,
            ) => 65.0,
            Some(EntityCategory::Other) => 55.0,
            None if signals.is_phrase => 60.0,
            None => 50.0,
        }
    }

    /// Velocity and acceleration around a neutral 50.
    ///
    /// Velocity is the percent change of today's frequency against the
    /// historical mean. Acceleration compares that change against the
    /// change between the recent and older halves of the history; fewer
    /// than 4 history points yield zero acceleration.
    fn temporal_dynamics(&self, signals: &KeywordSignals) -> (f64, f64, f64) {
        let history = &signals.history;
        let current = signals.frequency as f64;

        let velocity = percent_change(current, mean(history));

        let acceleration = if history.len() >= 4 {
            let mid = history.len() / 2;
            let older_mean = mean(&history[..mid]);
            let recent_mean = mean(&history[mid..]);
            let v_recent = percent_change(current, recent_mean);
            let v_older = percent_change(recent_mean, older_mean);
            v_recent - v_older
        } else {
            0.0
        };

        let score = (50.0 + (velocity / 2.0).clamp(-30.0, 30.0)
            + (acceleration / 5.0).clamp(-20.0, 20.0))
        .clamp(0.0, 100.0);

        (score, velocity, acceleration)
    }

    /// Diminishing-returns curve over the unique source count, saturating
    /// at `max_sources`.
    fn source_diversity(&self, source_count: usize) -> f64 {
        let ratio = (source_count as f64 / self.max_sources as f64).min(1.0);
        ((1.0 + (1.0 + ratio * 10.0).ln()) * 30.0).min(100.0)
    }

    /// Strong or polarized sentiment raises importance regardless of sign.
    fn sentiment_score(&self, polarity: f64, magnitude: f64) -> f64 {
        (magnitude * 100.0 + polarity.abs() * 20.0).min(100.0)
    }
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

/// Percent change of `current` against `baseline`. A zero baseline maps to
/// 100 when current is positive and 0 otherwise.
fn percent_change(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - baseline) / baseline * 100.0
    }
}

fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot = a.dot(b) as f64;
    let na = a.dot(a).sqrt() as f64;
    let nb = b.dot(b).sqrt() as f64;
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(keyword: &str) -> KeywordSignals {
        KeywordSignals {
            keyword: keyword.to_string(),
            frequency: 5,
            corpus_size: 10,
            total_documents: 100,
            document_count: 4,
            history: vec![3, 3, 4, 4, 5, 5],
            source_count: 3,
            sentiment_score: 0.2,
            sentiment_magnitude: 0.4,
            entity_category: None,
            is_phrase: false,
            snippets: Vec::new(),
        }
    }

    #[test]
    fn test_importance_in_range() {
        let calc = ImportanceCalculator::default();
        let b = calc.score(&signals("merger"), None);
        assert!(b.importance >= 0.0 && b.importance <= 100.0);
        let c = b.components;
        for v in [
            c.frequency,
            c.contextual_relevance,
            c.entity_boost,
            c.temporal_dynamics,
            c.source_diversity,
            c.sentiment_magnitude,
        ] {
            assert!(v >= 0.0 && v <= 100.0, "component {} out of range", v);
        }
    }

    #[test]
    fn test_importance_is_weighted_sum() {
        let calc = ImportanceCalculator::default();
        let b = calc.score(&signals("merger"), None);
        let w = calc.weights();
        let c = b.components;
        let expected = w.frequency * c.frequency
            + w.contextual_relevance * c.contextual_relevance
            + w.entity_boost * c.entity_boost
            + w.temporal_dynamics * c.temporal_dynamics
            + w.source_diversity * c.source_diversity
            + w.sentiment_magnitude * c.sentiment_magnitude;
        assert!((b.importance - expected).abs() < 1e-6);
    }

    #[test]
    fn test_contextual_neutral_without_provider() {
        let calc = ImportanceCalculator::default();
        let b = calc.score(&signals("merger"), None);
        assert_eq!(b.components.contextual_relevance, 50.0);
    }

    #[test]
    fn test_velocity_rising_and_falling() {
        let calc = ImportanceCalculator::default();

        let mut rising = signals("hot");
        rising.frequency = 20;
        rising.history = vec![2, 2, 2, 2];
        let b = calc.score(&rising, None);
        assert!(b.velocity > 0.0);
        assert!(b.components.temporal_dynamics > 50.0);

        let mut falling = signals("cold");
        falling.frequency = 1;
        falling.history = vec![20, 20, 20, 20];
        let b = calc.score(&falling, None);
        assert!(b.velocity < 0.0);
        assert!(b.components.temporal_dynamics < 50.0);
    }

    #[test]
    fn test_velocity_no_history() {
        let calc = ImportanceCalculator::default();
        let mut fresh = signals("new");
        fresh.history = Vec::new();
        let b = calc.score(&fresh, None);
        assert_eq!(b.velocity, 100.0);
        assert_eq!(b.acceleration, 0.0);
    }

    #[test]
    fn test_short_history_zero_acceleration() {
        let calc = ImportanceCalculator::default();
        let mut s = signals("brief");
        s.history = vec![1, 2, 3];
        let b = calc.score(&s, None);
        assert_eq!(b.acceleration, 0.0);
    }

    #[test]
    fn test_entity_tiers() {
        let calc = ImportanceCalculator::default();

        let mut s = signals("acme corp");
        s.entity_category = Some(EntityCategory::Organization);
        assert_eq!(calc.score(&s, None).components.entity_boost, 85.0);

        s.entity_category = Some(EntityCategory::Monetary);
        assert_eq!(calc.score(&s, None).components.entity_boost, 65.0);

        s.entity_category = Some(EntityCategory::Other);
        assert_eq!(calc.score(&s, None).components.entity_boost, 55.0);

        s.entity_category = None;
        s.is_phrase = true;
        assert_eq!(calc.score(&s, None).components.entity_boost, 60.0);

        s.is_phrase = false;
        assert_eq!(calc.score(&s, None).components.entity_boost, 50.0);
    }

    #[test]
    fn test_source_diversity_monotone_and_saturating() {
        let calc = ImportanceCalculator::default();
        let one = calc.source_diversity(1);
        let five = calc.source_diversity(5);
        let ten = calc.source_diversity(10);
        let twenty = calc.source_diversity(20);
        assert!(one < five && five < ten);
        assert_eq!(ten, twenty);
        assert!(twenty <= 100.0);
    }

    #[test]
    fn test_sentiment_magnitude_component() {
        let calc = ImportanceCalculator::default();
        assert_eq!(calc.sentiment_score(0.0, 0.0), 0.0);
        let strong_negative = calc.sentiment_score(-0.9, 0.8);
        let mild = calc.sentiment_score(0.1, 0.2);
        assert!(strong_negative > mild);
        assert!(calc.sentiment_score(1.0, 1.0) <= 100.0);
    }

    #[test]
    fn test_contextual_with_precomputed_embeddings() {
        use ndarray::arr1;
        let calc = ImportanceCalculator::default();
        let emb = KeywordEmbeddings {
            keyword: Some(arr1(&[1.0_f32, 0.0])),
            snippets: vec![arr1(&[1.0_f32, 0.0]), arr1(&[0.0_f32, 1.0])],
        };
        let b = calc.score(&signals("merger"), Some(&emb));
        // Identical vector gives 100, orthogonal gives 50; mean is 75.
        assert!((b.components.contextual_relevance - 75.0).abs() < 1e-9);
    }
}
