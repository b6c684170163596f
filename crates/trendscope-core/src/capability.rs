//! Injected capability traits for optional heavy model dependencies.
//!
//! Embedding lookup and named-entity recognition are pluggable: the engine
//! works without them, falling back to neutral scores. Implementations are
//! injected as trait objects so absence degrades instead of failing.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Semantic category of a recognized entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityCategory {
    Person,
    Organization,
    Product,
    Place,
    Event,
    Legal,
    Monetary,
    Date,
    Numeric,
    Group,
    Other,
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Product => "product",
            Self::Place => "place",
            Self::Event => "event",
            Self::Legal => "legal",
            Self::Monetary => "monetary",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Group => "group",
            Self::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// An entity mention found in text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub category: EntityCategory,
}

/// Trait for embedding providers.
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a text string.
    /// Returns None if the provider is not available.
    fn embed(&self, text: &str) -> Option<Array1<f32>>;

    /// Generate embeddings for a batch of texts.
    fn embed_batch(&self, texts: &[&str]) -> Vec<Option<Array1<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Check if the provider is available (model loaded).
    fn is_available(&self) -> bool;
}

/// Placeholder provider that always returns None (neutral contextual scores).
pub struct NoopEmbedding {
    dim: usize,
}

impl NoopEmbedding {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl EmbeddingProvider for NoopEmbedding {
    fn embed(&self, _text: &str) -> Option<Array1<f32>> {
        None
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Trait for named-entity recognizers.
pub trait EntityRecognizer: Send + Sync {
    /// Find entity mentions in a text.
    fn recognize(&self, text: &str) -> Vec<RecognizedEntity>;

    /// Check if the recognizer is available.
    fn is_available(&self) -> bool;
}

/// Placeholder recognizer that finds nothing (entity boost stays neutral).
pub struct NoopEntityRecognizer;

impl EntityRecognizer for NoopEntityRecognizer {
    fn recognize(&self, _text: &str) -> Vec<RecognizedEntity> {
        Vec::new()
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_embedding() {
        let provider = NoopEmbedding::new(384);
        assert!(!provider.is_available());
        assert!(provider.embed("anything").is_none());
        assert_eq!(provider.dimension(), 384);
    }

    #[test]
    fn test_noop_recognizer() {
        let ner = NoopEntityRecognizer;
        assert!(!ner.is_available());
        assert!(ner.recognize("Acme Corp. was acquired").is_empty());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(EntityCategory::Organization.to_string(), "organization");
        assert_eq!(EntityCategory::Monetary.to_string(), "monetary");
    }
}
