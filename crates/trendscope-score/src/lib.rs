//! TrendScope Score — composite keyword importance on a 0-100 scale plus
//! an Okapi BM25 relevance scorer.
//!
//! Importance combines six weighted component signals: frequency,
//! contextual relevance, entity boost, temporal dynamics, source
//! diversity, and sentiment magnitude.

pub mod bm25;
pub mod importance;
pub mod types;

pub use bm25::Bm25;
pub use importance::ImportanceCalculator;
pub use types::{ImportanceBreakdown, ImportanceWeights, KeywordEmbeddings, KeywordSignals};
