//! Merging the three candidate methods into one ranked list.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::HeuristicEntityRecognizer;
use crate::keyphrase::rake_scores;
use crate::linguistic::linguistic_scores;
use crate::statistical::tfidf_scores;
use crate::stopwords::valid_candidate;
use crate::types::{CandidateKeyword, KeywordType, MethodScores};
use trendscope_core::EntityRecognizer;

/// Weights for combining the three method scores. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MethodWeights {
    pub statistical: f64,
    pub linguistic: f64,
    pub unsupervised: f64,
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self {
            statistical: 0.3,
            linguistic: 0.4,
            unsupervised: 0.3,
        }
    }
}

impl MethodWeights {
    /// Whether the weights sum to 1.0 (within tolerance).
    pub fn is_valid(&self) -> bool {
        ((self.statistical + self.linguistic + self.unsupervised) - 1.0).abs() < 1e-6
    }
}

/// Extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub weights: MethodWeights,
    /// Ranked list cut-off.
    pub max_keywords: usize,
    /// Minimum keyword character length.
    pub min_keyword_len: usize,
    /// Maximum words per unsupervised keyphrase.
    pub max_phrase_len: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            weights: MethodWeights::default(),
            max_keywords: 20,
            min_keyword_len: 3,
            max_phrase_len: 3,
        }
    }
}

/// Multi-method keyword extractor.
pub struct KeywordExtractor {
    config: ExtractorConfig,
    recognizer: Arc<dyn EntityRecognizer>,
}

impl KeywordExtractor {
    pub fn new(config: ExtractorConfig, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { config, recognizer }
    }

    /// Default configuration with the regex-heuristic recognizer.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default(), Arc::new(HeuristicEntityRecognizer))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract ranked candidate keywords from one document. `corpus` holds
    /// sibling documents from the same batch for IDF context; it may be
    /// empty.
    pub fn extract(&self, text: &str, corpus: &[&str]) -> Vec<CandidateKeyword> {
        let statistical = tfidf_scores(text, corpus);
        let linguistic = linguistic_scores(text, self.recognizer.as_ref());
        let unsupervised = rake_scores(text, self.config.max_phrase_len);

        let mut merged: HashMap<String, CandidateKeyword> = HashMap::new();

        for (keyword, score) in statistical {
            if !valid_candidate(&keyword, self.config.min_keyword_len) {
                continue;
            }
            let kind = infer_kind(&keyword);
            merged
                .entry(keyword.clone())
                .or_insert_with(|| blank(&keyword, kind))
                .method_scores
                .statistical = score;
        }

        for (keyword, candidate) in linguistic {
            if !valid_candidate(&keyword, self.config.min_keyword_len) {
                continue;
            }
            let entry = merged
                .entry(keyword.clone())
                .or_insert_with(|| blank(&keyword, candidate.kind));
            entry.method_scores.linguistic = candidate.score;
            // Entity classification always wins over phrase/single.
            if candidate.kind == KeywordType::Entity {
                entry.kind = KeywordType::Entity;
                entry.entity_category = candidate.category;
            }
        }

        for (keyword, score) in unsupervised {
            if !valid_candidate(&keyword, self.config.min_keyword_len) {
                continue;
            }
            let kind = infer_kind(&keyword);
            merged
                .entry(keyword.clone())
                .or_insert_with(|| blank(&keyword, kind))
                .method_scores
                .unsupervised = score;
        }

        let w = &self.config.weights;
        let mut candidates: Vec<CandidateKeyword> = merged
            .into_values()
            .map(|mut c| {
                c.relevance_score = w.statistical * c.method_scores.statistical
                    + w.linguistic * c.method_scores.linguistic
                    + w.unsupervised * c.method_scores.unsupervised;
                c
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.config.max_keywords);

        debug!("Extracted {} candidate keywords", candidates.len());
        candidates
    }
}

fn infer_kind(keyword: &str) -> KeywordType {
    if keyword.contains(' ') {
        KeywordType::Phrase
    } else {
        KeywordType::Single
    }
}

fn blank(keyword: &str, kind: KeywordType) -> CandidateKeyword {
    CandidateKeyword {
        keyword: keyword.to_string(),
        kind,
        entity_category: None,
        method_scores: MethodScores::default(),
        relevance_score: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_core::EntityCategory;

    const ARTICLE: &str = "Acme Corp. announced a $2.5 billion acquisition of Beta Systems \
        on Monday. The acquisition gives Acme Corp. control of the cloud storage market. \
        Analysts called the acquisition a turning point for cloud storage.";

    #[test]
    fn test_extract_ranks_repeated_terms() {
        let extractor = KeywordExtractor::with_defaults();
        let keywords = extractor.extract(ARTICLE, &[]);
        assert!(!keywords.is_empty());

        let acq = keywords
            .iter()
            .find(|k| k.keyword == "acquisition")
            .expect("acquisition extracted");
        assert!(acq.method_scores.statistical > 0.0);
    }

    #[test]
    fn test_entity_takes_precedence() {
        let extractor = KeywordExtractor::with_defaults();
        let keywords = extractor.extract(ARTICLE, &[]);
        let acme = keywords
            .iter()
            .find(|k| k.keyword == "acme corp.")
            .expect("entity extracted");
        assert_eq!(acme.kind, KeywordType::Entity);
        assert_eq!(acme.entity_category, Some(EntityCategory::Organization));
    }

    #[test]
    fn test_relevance_is_weighted_sum() {
        let extractor = KeywordExtractor::with_defaults();
        let w = extractor.config().weights;
        for k in extractor.extract(ARTICLE, &[]) {
            let expected = w.statistical * k.method_scores.statistical
                + w.linguistic * k.method_scores.linguistic
                + w.unsupervised * k.method_scores.unsupervised;
            assert!((k.relevance_score - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sorted_and_truncated() {
        let config = ExtractorConfig {
            max_keywords: 5,
            ..Default::default()
        };
        let extractor =
            KeywordExtractor::new(config, Arc::new(HeuristicEntityRecognizer));
        let keywords = extractor.extract(ARTICLE, &[]);
        assert!(keywords.len() <= 5);
        for pair in keywords.windows(2) {
            assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
    }

    #[test]
    fn test_stop_words_filtered() {
        let extractor = KeywordExtractor::with_defaults();
        let keywords = extractor.extract(ARTICLE, &[]);
        assert!(!keywords.iter().any(|k| k.keyword == "the"));
        assert!(!keywords
            .iter()
            .any(|k| k.keyword.starts_with("the ") || k.keyword.ends_with(" of")));
    }

    #[test]
    fn test_default_weights_valid() {
        assert!(MethodWeights::default().is_valid());
    }
}
