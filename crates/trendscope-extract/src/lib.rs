//! TrendScope Extract — multi-method candidate keyword extraction.
//!
//! Three independently scored methods feed one merged, ranked list:
//! statistical TF-IDF, linguistic entity/noun-phrase detection, and an
//! unsupervised RAKE-style keyphrase ranker.

pub mod entities;
pub mod extractor;
pub mod keyphrase;
pub mod linguistic;
pub mod statistical;
pub mod stopwords;
pub mod tokenize;
pub mod types;

pub use entities::HeuristicEntityRecognizer;
pub use extractor::{ExtractorConfig, KeywordExtractor, MethodWeights};
pub use types::{CandidateKeyword, KeywordType, MethodScores};
