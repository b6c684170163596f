//! Candidate keyword types, ephemeral per document.

use serde::{Deserialize, Serialize};
use trendscope_core::EntityCategory;

/// Shape of a candidate keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordType {
    Single,
    Phrase,
    Entity,
}

/// Per-method scores, each normalized to [0, 1]; 0 when a method did not
/// propose the keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodScores {
    pub statistical: f64,
    pub linguistic: f64,
    pub unsupervised: f64,
}

/// A candidate keyword produced for one document. Never persisted on its
/// own; folded into the batch cache by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateKeyword {
    pub keyword: String,
    pub kind: KeywordType,
    pub entity_category: Option<EntityCategory>,
    pub method_scores: MethodScores,
    pub relevance_score: f64,
}
