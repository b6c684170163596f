//! TrendScope Core — error taxonomy, configuration, shared domain types,
//! and injected capability traits.

pub mod capability;
pub mod config;
pub mod error;
pub mod types;

pub use capability::{
    EmbeddingProvider, EntityCategory, EntityRecognizer, NoopEmbedding, NoopEntityRecognizer,
    RecognizedEntity,
};
pub use config::{DataPaths, EngineConfig};
pub use error::{Error, Result};
pub use types::{ComponentScores, SampleSnippet};
