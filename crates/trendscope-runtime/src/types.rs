//! Batch processing reports.

use serde::Serialize;

/// Outcome of extracting one document into the batch cache.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DocumentReport {
    /// Candidates the extractor produced.
    pub keywords_extracted: usize,
    /// Candidates above the relevance threshold that entered the cache.
    pub keywords_cached: usize,
}

/// Outcome of scoring and persisting the accumulated batch cache.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FlushReport {
    /// Keywords that met the frequency floor and were scored.
    pub keywords_scored: usize,
    /// Records written to the importance repository.
    pub keywords_saved: usize,
    /// Keywords whose persistence failed; the rest of the batch continues.
    pub failed: usize,
}

/// Outcome of a full batch run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchReport {
    pub documents: usize,
    /// Documents whose extraction failed; they stay unprocessed.
    pub documents_failed: usize,
    pub keywords_extracted: usize,
    pub keywords_cached: usize,
    pub flush: FlushReport,
}
