//! TrendScope Sentiment — lexicon-based contextual sentiment for keyword
//! mentions. Scores text windows around each occurrence of a keyword,
//! aggregates polarity and magnitude, and keeps representative snippets.

pub mod analyzer;
pub mod lexicon;

pub use analyzer::{
    extract_context, ContextDocument, KeywordSentiment, SentimentAnalyzer, SentimentClass,
    TextSentiment,
};
pub use lexicon::Lexicon;
