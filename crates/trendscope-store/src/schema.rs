//! Database schema SQL.

/// Core tables: documents, keyword importance records, time-series rollups.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    url TEXT NOT NULL,
    source_type TEXT NOT NULL,
    source_name TEXT NOT NULL,
    published_at INTEGER NOT NULL,
    content_hash TEXT NOT NULL UNIQUE,
    processed INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_hash ON documents(content_hash);
CREATE INDEX IF NOT EXISTS idx_documents_processed ON documents(processed, source_type);
CREATE INDEX IF NOT EXISTS idx_documents_published ON documents(published_at);

CREATE TABLE IF NOT EXISTS keyword_importance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword TEXT NOT NULL,
    date TEXT NOT NULL,
    team_key TEXT NOT NULL,
    importance_score REAL NOT NULL,
    component_scores_json TEXT NOT NULL,
    frequency INTEGER NOT NULL,
    document_count INTEGER NOT NULL,
    source_diversity INTEGER NOT NULL,
    velocity REAL NOT NULL,
    acceleration REAL NOT NULL,
    sentiment_score REAL NOT NULL,
    sentiment_magnitude REAL NOT NULL,
    positive_mentions INTEGER NOT NULL,
    negative_mentions INTEGER NOT NULL,
    neutral_mentions INTEGER NOT NULL,
    content_ids_json TEXT NOT NULL,
    snippets_json TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(keyword, date, team_key)
);

CREATE INDEX IF NOT EXISTS idx_importance_team_date ON keyword_importance(team_key, date);
CREATE INDEX IF NOT EXISTS idx_importance_keyword ON keyword_importance(keyword, team_key);

CREATE TABLE IF NOT EXISTS keyword_timeseries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    keyword TEXT NOT NULL,
    team_key TEXT NOT NULL,
    period TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    points_json TEXT NOT NULL,
    avg_importance REAL NOT NULL,
    max_importance REAL NOT NULL,
    trend TEXT NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(keyword, team_key, period, start_date, end_date)
);

CREATE INDEX IF NOT EXISTS idx_timeseries_keyword ON keyword_timeseries(keyword, team_key);
"#;
