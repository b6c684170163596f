//! The batch orchestrator: extract, accumulate, score in parallel,
//! persist.
//!
//! Store reads and writes happen on the calling thread; only the pure
//! scoring step fans out over the worker pool, so the connection mutex is
//! never contended.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::batch::BatchCache;
use crate::types::{BatchReport, DocumentReport, FlushReport};
use trendscope_core::{EmbeddingProvider, EngineConfig, Error, NoopEmbedding, Result};
use trendscope_extract::{KeywordExtractor, KeywordType};
use trendscope_score::{ImportanceBreakdown, ImportanceCalculator, KeywordEmbeddings, KeywordSignals};
use trendscope_sentiment::{extract_context, KeywordSentiment, SentimentAnalyzer};
use trendscope_store::{Document, NewImportanceRecord, SqliteStore};

/// Orchestrator knobs, usually derived from [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Minimum merged relevance for a candidate to enter the batch cache.
    pub storage_relevance_threshold: f64,
    /// Minimum batch frequency for a cached keyword to be scored.
    pub min_frequency: u32,
    /// Worker pool size for scoring (0 = available parallelism).
    pub max_workers: usize,
    /// Trailing window, in days, for velocity history lookups.
    pub history_days: u32,
    /// Characters of context kept on each side of a keyword mention.
    pub context_window: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            storage_relevance_threshold: 0.1,
            min_frequency: 1,
            max_workers: 0,
            history_days: 30,
            context_window: 100,
        }
    }
}

impl From<&EngineConfig> for OrchestratorConfig {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            storage_relevance_threshold: cfg.storage_relevance_threshold,
            min_frequency: cfg.min_frequency,
            max_workers: cfg.max_workers,
            history_days: cfg.history_days,
            context_window: cfg.context_window,
        }
    }
}

/// One keyword's inputs, assembled serially before the parallel fan-out.
struct ScoringUnit {
    signals: KeywordSignals,
    embeddings: Option<KeywordEmbeddings>,
    sentiment: KeywordSentiment,
    content_ids: Vec<i64>,
}

/// Drives document batches through the full scoring pipeline.
pub struct BatchOrchestrator {
    store: Arc<SqliteStore>,
    extractor: KeywordExtractor,
    analyzer: SentimentAnalyzer,
    calculator: ImportanceCalculator,
    embedder: Arc<dyn EmbeddingProvider>,
    config: OrchestratorConfig,
    cache: BatchCache,
}

impl BatchOrchestrator {
    pub fn new(store: Arc<SqliteStore>, config: OrchestratorConfig) -> Self {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(NoopEmbedding::new(384));
        Self {
            store,
            extractor: KeywordExtractor::with_defaults(),
            analyzer: SentimentAnalyzer::new(),
            calculator: ImportanceCalculator::new(embedder.clone()),
            embedder,
            config,
            cache: BatchCache::new(),
        }
    }

    /// Replace the embedding provider used for contextual relevance.
    pub fn with_embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.calculator = ImportanceCalculator::new(embedder.clone());
        self.embedder = embedder;
        self
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Extract one document into the batch cache. `siblings` holds the
    /// other documents of the batch for IDF context.
    pub fn process_document(
        &mut self,
        doc: &Document,
        siblings: &[&str],
    ) -> Result<DocumentReport> {
        let candidates = self.extractor.extract(&doc.content, siblings);
        let extracted = candidates.len();
        let content_lower = doc.content.to_lowercase();

        self.cache.note_document(doc.id);
        let mut cached = 0;
        for candidate in candidates {
            if candidate.relevance_score < self.config.storage_relevance_threshold {
                continue;
            }
            let occurrences = content_lower.matches(&candidate.keyword).count() as i64;
            let snippets =
                extract_context(&doc.content, &candidate.keyword, self.config.context_window);
            self.cache
                .fold(&candidate, doc.id, &doc.source_name, occurrences, snippets);
            cached += 1;
        }

        debug!(
            "Document {}: {} candidates, {} cached",
            doc.id, extracted, cached
        );
        Ok(DocumentReport {
            keywords_extracted: extracted,
            keywords_cached: cached,
        })
    }

    /// Score everything in the batch cache for `date` and persist one
    /// record per keyword. A failing keyword is logged and skipped; it
    /// never aborts the rest of the flush.
    pub fn flush(&mut self, date: NaiveDate, team_key: &str) -> Result<FlushReport> {
        if self.cache.is_empty() {
            self.cache.drain();
            return Ok(FlushReport::default());
        }

        let corpus_size = self.cache.corpus_size();
        let total_documents = self.store.count_documents()?;
        let entries = self.cache.drain();

        let mut units = Vec::new();
        for entry in entries {
            if entry.frequency < self.config.min_frequency as i64 {
                continue;
            }
            let history = self.store.frequency_history(
                &entry.keyword,
                team_key,
                date,
                self.config.history_days,
            )?;
            let sentiment = self.analyzer.analyze_snippets(&entry.keyword, &entry.snippets);
            let signals = KeywordSignals {
                keyword: entry.keyword.clone(),
                frequency: entry.frequency,
                corpus_size,
                total_documents,
                document_count: entry.document_count(),
                history,
                source_count: entry.source_count(),
                sentiment_score: sentiment.sentiment_score,
                sentiment_magnitude: sentiment.sentiment_magnitude,
                entity_category: entry.entity_category,
                is_phrase: entry.kind == KeywordType::Phrase,
                snippets: entry.snippets,
            };
            let embeddings = self.precompute_embeddings(&signals);
            units.push(ScoringUnit {
                signals,
                embeddings,
                sentiment,
                content_ids: entry.content_ids,
            });
        }

        let scored = self.score_parallel(units)?;
        let keywords_scored = scored.len();

        let mut saved = 0;
        let mut failed = 0;
        for (unit, breakdown) in scored {
            let record = NewImportanceRecord {
                keyword: unit.signals.keyword,
                date,
                team_key: team_key.to_string(),
                importance_score: breakdown.importance,
                component_scores: breakdown.components,
                frequency: unit.signals.frequency,
                document_count: unit.signals.document_count,
                source_diversity: unit.signals.source_count as i64,
                velocity: breakdown.velocity,
                acceleration: breakdown.acceleration,
                sentiment_score: unit.sentiment.sentiment_score,
                sentiment_magnitude: unit.sentiment.sentiment_magnitude,
                positive_mentions: unit.sentiment.positive_mentions,
                negative_mentions: unit.sentiment.negative_mentions,
                neutral_mentions: unit.sentiment.neutral_mentions,
                content_ids: unit.content_ids,
                sample_snippets: unit.sentiment.sample_snippets,
            };
            match self.store.upsert_importance(&record) {
                Ok(()) => saved += 1,
                Err(e) => {
                    warn!("Failed to persist '{}': {}", record.keyword, e);
                    failed += 1;
                }
            }
        }

        info!(
            "Flushed batch for {}: {} scored, {} saved, {} failed",
            date, keywords_scored, saved, failed
        );
        Ok(FlushReport {
            keywords_scored,
            keywords_saved: saved,
            failed,
        })
    }

    /// Run a full batch: extract every document, flush, and mark the
    /// successfully extracted documents processed. Extraction failures
    /// leave their documents unprocessed for a later retry.
    pub fn process_batch(
        &mut self,
        docs: &[Document],
        date: NaiveDate,
        team_key: &str,
    ) -> Result<BatchReport> {
        let mut report = BatchReport {
            documents: docs.len(),
            ..Default::default()
        };
        let mut extracted_ids = Vec::new();

        for (i, doc) in docs.iter().enumerate() {
            let siblings: Vec<&str> = docs
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, d)| d.content.as_str())
                .collect();
            match self.process_document(doc, &siblings) {
                Ok(doc_report) => {
                    report.keywords_extracted += doc_report.keywords_extracted;
                    report.keywords_cached += doc_report.keywords_cached;
                    extracted_ids.push(doc.id);
                }
                Err(e) => {
                    warn!("Skipping document {}: {}", doc.id, e);
                    report.documents_failed += 1;
                }
            }
        }

        report.flush = self.flush(date, team_key)?;

        for id in extracted_ids {
            self.store.mark_processed(id)?;
        }
        Ok(report)
    }

    /// Fetch unprocessed documents and run them as one batch dated today.
    pub fn run(&mut self, limit: usize, team_key: &str) -> Result<BatchReport> {
        let docs = self.store.get_unprocessed(limit, None)?;
        if docs.is_empty() {
            return Ok(BatchReport::default());
        }
        self.process_batch(&docs, Utc::now().date_naive(), team_key)
    }

    /// Embed the keyword and its snippets in one provider call before the
    /// parallel fan-out, so workers never touch the provider.
    fn precompute_embeddings(&self, signals: &KeywordSignals) -> Option<KeywordEmbeddings> {
        if !self.embedder.is_available() {
            return None;
        }
        let mut texts: Vec<&str> = vec![signals.keyword.as_str()];
        texts.extend(signals.snippets.iter().take(10).map(|s| s.as_str()));
        let mut vectors = self.embedder.embed_batch(&texts);

        let keyword = vectors.remove(0);
        let snippets = vectors.into_iter().flatten().collect();
        Some(KeywordEmbeddings { keyword, snippets })
    }

    fn score_parallel(
        &self,
        units: Vec<ScoringUnit>,
    ) -> Result<Vec<(ScoringUnit, ImportanceBreakdown)>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .build()
            .map_err(|e| Error::Internal(format!("worker pool: {}", e)))?;

        let calculator = &self.calculator;
        Ok(pool.install(|| {
            units
                .into_par_iter()
                .map(|unit| {
                    let breakdown = calculator.score(&unit.signals, unit.embeddings.as_ref());
                    (unit, breakdown)
                })
                .collect()
        }))
    }
}
