//! Data types for documents, importance records, and time-series rollups.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use trendscope_core::{ComponentScores, SampleSnippet};

/// A document row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub url: String,
    pub source_type: String,
    pub source_name: String,
    pub published_at: NaiveDateTime,
    pub content_hash: String,
    pub processed: bool,
    pub created_at: i64,
}

/// An incoming document from an ingestion collaborator, before storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub url: String,
    pub published_at: NaiveDateTime,
}

/// Outcome of a batched save.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchSaveReport {
    pub saved: usize,
    pub duplicates: usize,
    pub total: usize,
}

/// Fields for creating or updating a keyword importance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImportanceRecord {
    pub keyword: String,
    pub date: NaiveDate,
    pub team_key: String,
    pub importance_score: f64,
    pub component_scores: ComponentScores,
    pub frequency: i64,
    pub document_count: i64,
    pub source_diversity: i64,
    pub velocity: f64,
    pub acceleration: f64,
    pub sentiment_score: f64,
    pub sentiment_magnitude: f64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
    pub neutral_mentions: i64,
    pub content_ids: Vec<i64>,
    pub sample_snippets: Vec<SampleSnippet>,
}

/// A persisted keyword importance row, unique per (keyword, date, team_key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordImportanceRecord {
    pub id: i64,
    pub keyword: String,
    pub date: NaiveDate,
    pub team_key: String,
    pub importance_score: f64,
    pub component_scores: ComponentScores,
    pub frequency: i64,
    pub document_count: i64,
    pub source_diversity: i64,
    pub velocity: f64,
    pub acceleration: f64,
    pub sentiment_score: f64,
    pub sentiment_magnitude: f64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
    pub neutral_mentions: i64,
    pub content_ids: Vec<i64>,
    pub sample_snippets: Vec<SampleSnippet>,
    pub updated_at: i64,
}

impl KeywordImportanceRecord {
    /// Serialize into the presentation contract consumed by API collaborators.
    pub fn to_report(&self) -> KeywordReport {
        KeywordReport {
            keyword: self.keyword.clone(),
            date: self.date,
            importance: self.importance_score,
            sentiment: SentimentReport {
                score: self.sentiment_score,
                magnitude: self.sentiment_magnitude,
                breakdown: MentionBreakdown {
                    positive: self.positive_mentions,
                    negative: self.negative_mentions,
                    neutral: self.neutral_mentions,
                },
            },
            metrics: MetricsReport {
                frequency: self.frequency,
                document_count: self.document_count,
                source_diversity: self.source_diversity,
                velocity: self.velocity,
            },
            content_ids: self.content_ids.clone(),
            sample_snippets: self.sample_snippets.clone(),
        }
    }
}

/// Presentation shape of an importance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordReport {
    pub keyword: String,
    pub date: NaiveDate,
    pub importance: f64,
    pub sentiment: SentimentReport,
    pub metrics: MetricsReport,
    pub content_ids: Vec<i64>,
    pub sample_snippets: Vec<SampleSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub score: f64,
    pub magnitude: f64,
    pub breakdown: MentionBreakdown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MentionBreakdown {
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsReport {
    pub frequency: i64,
    pub document_count: i64,
    pub source_diversity: i64,
    pub velocity: f64,
}

/// Direction label for a keyword's importance series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Emerging,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rising => write!(f, "rising"),
            Self::Falling => write!(f, "falling"),
            Self::Emerging => write!(f, "emerging"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

impl std::str::FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rising" => Ok(Self::Rising),
            "falling" => Ok(Self::Falling),
            "emerging" => Ok(Self::Emerging),
            "stable" => Ok(Self::Stable),
            other => Err(format!("unknown trend: {}", other)),
        }
    }
}

/// One day in a keyword's time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub importance: f64,
    pub sentiment: f64,
    pub frequency: i64,
}

/// Derived per-keyword series with summary statistics, rebuilt on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTimeSeries {
    pub keyword: String,
    pub team_key: String,
    pub period: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub points: Vec<TimeSeriesPoint>,
    pub avg_importance: f64,
    pub max_importance: f64,
    pub trend: Trend,
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_documents: i64,
    pub unprocessed_documents: i64,
    pub importance_records: i64,
    pub timeseries_records: i64,
    pub db_path: String,
    pub db_size_mb: f64,
}
