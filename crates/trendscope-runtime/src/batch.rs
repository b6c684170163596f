//! In-memory accumulation of keyword signals across one batch.

use std::collections::{HashMap, HashSet};

use trendscope_core::EntityCategory;
use trendscope_extract::{CandidateKeyword, KeywordType};

/// Per-keyword signals folded across every document in the batch.
#[derive(Debug, Clone)]
pub struct BatchCacheEntry {
    pub keyword: String,
    pub kind: KeywordType,
    pub entity_category: Option<EntityCategory>,
    /// Total occurrences across the batch.
    pub frequency: i64,
    /// Documents that mentioned the keyword.
    pub content_ids: Vec<i64>,
    /// Distinct source names seen.
    pub sources: HashSet<String>,
    /// Context snippets collected around each mention.
    pub snippets: Vec<String>,
}

impl BatchCacheEntry {
    pub fn document_count(&self) -> i64 {
        self.content_ids.len() as i64
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

/// Batch-scoped keyword accumulator. Cleared after each flush so a cache
/// never spans two analysis batches.
#[derive(Debug, Default)]
pub struct BatchCache {
    entries: HashMap<String, BatchCacheEntry>,
    documents_seen: HashSet<i64>,
}

impl BatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's occurrences of a candidate into the cache.
    pub fn fold(
        &mut self,
        candidate: &CandidateKeyword,
        content_id: i64,
        source_name: &str,
        occurrences: i64,
        snippets: Vec<String>,
    ) {
        self.documents_seen.insert(content_id);
        if occurrences <= 0 {
            return;
        }

        let entry = self
            .entries
            .entry(candidate.keyword.clone())
            .or_insert_with(|| BatchCacheEntry {
                keyword: candidate.keyword.clone(),
                kind: candidate.kind,
                entity_category: candidate.entity_category,
                frequency: 0,
                content_ids: Vec::new(),
                sources: HashSet::new(),
                snippets: Vec::new(),
            });

        entry.frequency += occurrences;
        if !entry.content_ids.contains(&content_id) {
            entry.content_ids.push(content_id);
        }
        entry.sources.insert(source_name.to_string());
        entry.snippets.extend(snippets);
        // Later documents may carry a stronger classification.
        if entry.entity_category.is_none() {
            entry.entity_category = candidate.entity_category;
            if candidate.kind == KeywordType::Entity {
                entry.kind = KeywordType::Entity;
            }
        }
    }

    /// Mark a document as part of this batch even when nothing was cached
    /// from it; the batch corpus size counts every document.
    pub fn note_document(&mut self, content_id: i64) {
        self.documents_seen.insert(content_id);
    }

    /// Number of documents folded into this batch.
    pub fn corpus_size(&self) -> i64 {
        self.documents_seen.len() as i64
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drain all entries, leaving the cache empty for the next batch.
    pub fn drain(&mut self) -> Vec<BatchCacheEntry> {
        self.documents_seen.clear();
        self.entries.drain().map(|(_, v)| v).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_extract::MethodScores;

    fn candidate(keyword: &str) -> CandidateKeyword {
        CandidateKeyword {
            keyword: keyword.to_string(),
            kind: KeywordType::Single,
            entity_category: None,
            method_scores: MethodScores::default(),
            relevance_score: 0.5,
        }
    }

    #[test]
    fn test_fold_accumulates_across_documents() {
        let mut cache = BatchCache::new();
        let c = candidate("merger");

        cache.fold(&c, 1, "feed-a", 2, vec!["s1".into()]);
        cache.fold(&c, 2, "feed-a", 1, vec!["s2".into()]);
        cache.fold(&c, 3, "feed-b", 1, vec!["s3".into()]);
        cache.fold(&c, 4, "feed-c", 1, vec![]);
        cache.fold(&c, 5, "feed-c", 0, vec![]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.corpus_size(), 5);

        let entries = cache.drain();
        let entry = &entries[0];
        assert_eq!(entry.frequency, 5);
        assert_eq!(entry.document_count(), 4);
        assert_eq!(entry.source_count(), 3);
        assert_eq!(entry.snippets.len(), 3);

        // Drained cache is ready for the next batch.
        assert!(cache.is_empty());
        assert_eq!(cache.corpus_size(), 0);
    }

    #[test]
    fn test_entity_classification_upgrades() {
        let mut cache = BatchCache::new();
        cache.fold(&candidate("acme"), 1, "feed-a", 1, vec![]);

        let mut entity = candidate("acme");
        entity.kind = KeywordType::Entity;
        entity.entity_category = Some(EntityCategory::Organization);
        cache.fold(&entity, 2, "feed-b", 1, vec![]);

        let entries = cache.drain();
        assert_eq!(entries[0].kind, KeywordType::Entity);
        assert_eq!(
            entries[0].entity_category,
            Some(EntityCategory::Organization)
        );
    }

    #[test]
    fn test_same_document_not_double_counted() {
        let mut cache = BatchCache::new();
        let c = candidate("merger");
        cache.fold(&c, 1, "feed-a", 2, vec![]);
        cache.fold(&c, 1, "feed-a", 1, vec![]);

        let entries = cache.drain();
        assert_eq!(entries[0].document_count(), 1);
        assert_eq!(entries[0].frequency, 3);
    }
}
