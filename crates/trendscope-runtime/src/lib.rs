//! TrendScope Runtime — the batch orchestrator tying the pipeline
//! together: extract keywords per document, accumulate batch-level
//! signals, fan scoring out over a bounded worker pool, and persist one
//! importance record per keyword and day.

pub mod batch;
pub mod orchestrator;
pub mod types;

pub use batch::{BatchCache, BatchCacheEntry};
pub use orchestrator::{BatchOrchestrator, OrchestratorConfig};
pub use types::{BatchReport, DocumentReport, FlushReport};
