//! SQLite store shared by the content side and the importance repository.
//!
//! One connection behind a mutex, WAL journal, cached statements. The
//! content operations live in `content.rs` and the importance repository
//! in `importance.rs`; both are impl blocks on [`SqliteStore`].

use std::path::{Path, PathBuf};

use chrono::DateTime;
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::*;
use trendscope_core::{Error, Result};

/// SQLite-backed store for documents, importance records, and rollups.
pub struct SqliteStore {
    pub(crate) conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the SQLite store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be
    /// `db_dir/trendscope.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("trendscope.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let doc_count = store.count_documents()?;
        info!(
            "SqliteStore initialized: {} documents, path={}",
            doc_count,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    /// Current time in epoch milliseconds.
    pub(crate) fn now_millis() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0)
    }

    /// Get store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let total_documents: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        let unprocessed_documents: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE processed = 0",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let importance_records: i64 = conn
            .query_row("SELECT COUNT(*) FROM keyword_importance", [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        let timeseries_records: i64 = conn
            .query_row("SELECT COUNT(*) FROM keyword_timeseries", [], |row| {
                row.get(0)
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        drop(conn);

        let db_size = std::fs::metadata(&self.db_path).map(|m| m.len()).unwrap_or(0);

        Ok(StoreStats {
            total_documents,
            unprocessed_documents,
            importance_records,
            timeseries_records,
            db_path: self.db_path.to_string_lossy().to_string(),
            db_size_mb: db_size as f64 / (1024.0 * 1024.0),
        })
    }

    // ---------------------------------------------------------------
    // Row Mapping Helpers
    // ---------------------------------------------------------------

    pub(crate) fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
        let published_millis: i64 = row.get("published_at")?;
        let published_at = DateTime::from_timestamp_millis(published_millis)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default();
        Ok(Document {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            url: row.get("url")?,
            source_type: row.get("source_type")?,
            source_name: row.get("source_name")?,
            published_at,
            content_hash: row.get("content_hash")?,
            processed: row.get::<_, i64>("processed")? != 0,
            created_at: row.get("created_at")?,
        })
    }

    pub(crate) fn row_to_importance(
        row: &rusqlite::Row<'_>,
    ) -> rusqlite::Result<KeywordImportanceRecord> {
        let date_str: String = row.get("date")?;
        let components_json: String = row.get("component_scores_json")?;
        let content_ids_json: String = row.get("content_ids_json")?;
        let snippets_json: String = row.get("snippets_json")?;

        Ok(KeywordImportanceRecord {
            id: row.get("id")?,
            keyword: row.get("keyword")?,
            date: date_str.parse().unwrap_or_default(),
            team_key: row.get("team_key")?,
            importance_score: row.get("importance_score")?,
            component_scores: serde_json::from_str(&components_json).unwrap_or_default(),
            frequency: row.get("frequency")?,
            document_count: row.get("document_count")?,
            source_diversity: row.get("source_diversity")?,
            velocity: row.get("velocity")?,
            acceleration: row.get("acceleration")?,
            sentiment_score: row.get("sentiment_score")?,
            sentiment_magnitude: row.get("sentiment_magnitude")?,
            positive_mentions: row.get("positive_mentions")?,
            negative_mentions: row.get("negative_mentions")?,
            neutral_mentions: row.get("neutral_mentions")?,
            content_ids: serde_json::from_str(&content_ids_json).unwrap_or_default(),
            sample_snippets: serde_json::from_str(&snippets_json).unwrap_or_default(),
            updated_at: row.get("updated_at")?,
        })
    }
}
