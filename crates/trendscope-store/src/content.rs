//! Content store operations: dedup-by-hash saves, processed-flag
//! tracking, and date-range queries over ingested documents.

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::sqlite::SqliteStore;
use crate::types::*;
use trendscope_core::{Error, Result};

/// Deduplication key: sha256 over whitespace-normalized, lowercased
/// content plus the origin URL.
pub fn content_hash(content: &str, url: &str) -> String {
    let normalized = content
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

impl SqliteStore {
    /// Save a document, deduplicating by content hash.
    ///
    /// Returns the stored row and whether it was newly inserted. A hash
    /// collision with an existing row is not an error: the existing row
    /// comes back with `is_new = false`.
    pub fn save_document(
        &self,
        doc: &NewDocument,
        source_type: &str,
        source_name: &str,
    ) -> Result<(Document, bool)> {
        let hash = content_hash(&doc.content, &doc.url);
        let now = Self::now_millis();
        let published_millis = doc.published_at.and_utc().timestamp_millis();

        let conn = self.conn.lock();
        let insert = conn
            .prepare_cached(
                "INSERT INTO documents \
                 (title, content, url, source_type, source_name, published_at, \
                  content_hash, processed, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .insert(params![
                doc.title,
                doc.content,
                doc.url,
                source_type,
                source_name,
                published_millis,
                hash,
                now,
            ]);

        match insert {
            Ok(id) => {
                drop(conn);
                let stored = self
                    .get_document(id)?
                    .ok_or_else(|| Error::Internal(format!("document {} vanished", id)))?;
                Ok((stored, true))
            }
            Err(e) if e.to_string().contains("UNIQUE constraint") => {
                drop(conn);
                debug!("Duplicate content hash {}, returning existing row", hash);
                let existing = self
                    .find_document_by_hash(&hash)?
                    .ok_or_else(|| Error::DuplicateContent(hash))?;
                Ok((existing, false))
            }
            Err(e) => Err(Error::Database(e.to_string())),
        }
    }

    /// Save a batch of documents, accumulating saved/duplicate counts.
    pub fn save_documents(
        &self,
        docs: &[NewDocument],
        source_type: &str,
        source_name: &str,
    ) -> Result<BatchSaveReport> {
        let mut report = BatchSaveReport {
            total: docs.len(),
            ..Default::default()
        };
        for doc in docs {
            let (_, is_new) = self.save_document(doc, source_type, source_name)?;
            if is_new {
                report.saved += 1;
            } else {
                report.duplicates += 1;
            }
        }
        Ok(report)
    }

    /// Find a document by content hash.
    pub fn find_document_by_hash(&self, hash: &str) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM documents WHERE content_hash = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![hash], Self::row_to_document)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Get a document by ID.
    pub fn get_document(&self, doc_id: i64) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached("SELECT * FROM documents WHERE id = ?1")
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![doc_id], Self::row_to_document)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    /// Get unprocessed documents, newest first, optionally filtered by
    /// source type.
    pub fn get_unprocessed(
        &self,
        limit: usize,
        source_type: Option<&str>,
    ) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut out = Vec::new();
        match source_type {
            Some(st) => {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT * FROM documents WHERE processed = 0 AND source_type = ?1 \
                         ORDER BY published_at DESC LIMIT ?2",
                    )
                    .map_err(|e| Error::Database(e.to_string()))?;
                let rows = stmt
                    .query_map(params![st, limit as i64], Self::row_to_document)
                    .map_err(|e| Error::Database(e.to_string()))?;
                for row in rows {
                    out.push(row.map_err(|e| Error::Database(e.to_string()))?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT * FROM documents WHERE processed = 0 \
                         ORDER BY published_at DESC LIMIT ?1",
                    )
                    .map_err(|e| Error::Database(e.to_string()))?;
                let rows = stmt
                    .query_map(params![limit as i64], Self::row_to_document)
                    .map_err(|e| Error::Database(e.to_string()))?;
                for row in rows {
                    out.push(row.map_err(|e| Error::Database(e.to_string()))?);
                }
            }
        }
        Ok(out)
    }

    /// Get documents published within `[start, end]`, optionally filtered
    /// by source type.
    pub fn get_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        source_type: Option<&str>,
    ) -> Result<Vec<Document>> {
        let start_ms = start.and_utc().timestamp_millis();
        let end_ms = end.and_utc().timestamp_millis();

        let conn = self.conn.lock();
        let mut out = Vec::new();
        match source_type {
            Some(st) => {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT * FROM documents \
                         WHERE published_at BETWEEN ?1 AND ?2 AND source_type = ?3 \
                         ORDER BY published_at DESC",
                    )
                    .map_err(|e| Error::Database(e.to_string()))?;
                let rows = stmt
                    .query_map(params![start_ms, end_ms, st], Self::row_to_document)
                    .map_err(|e| Error::Database(e.to_string()))?;
                for row in rows {
                    out.push(row.map_err(|e| Error::Database(e.to_string()))?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare_cached(
                        "SELECT * FROM documents \
                         WHERE published_at BETWEEN ?1 AND ?2 \
                         ORDER BY published_at DESC",
                    )
                    .map_err(|e| Error::Database(e.to_string()))?;
                let rows = stmt
                    .query_map(params![start_ms, end_ms], Self::row_to_document)
                    .map_err(|e| Error::Database(e.to_string()))?;
                for row in rows {
                    out.push(row.map_err(|e| Error::Database(e.to_string()))?);
                }
            }
        }
        Ok(out)
    }

    /// Flip a document's processed flag. One-way, no undo path.
    pub fn mark_processed(&self, doc_id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE documents SET processed = 1 WHERE id = ?1",
                params![doc_id],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count total documents.
    pub fn count_documents(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn doc(title: &str, content: &str, url: &str) -> NewDocument {
        NewDocument {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            published_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_save_and_get() {
        let (store, _dir) = test_store();
        let (stored, is_new) = store
            .save_document(&doc("Title", "Body text", "https://a.example/1"), "rss", "feed-a")
            .unwrap();
        assert!(is_new);
        assert!(!stored.processed);

        let fetched = store.get_document(stored.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Title");
        assert_eq!(fetched.source_name, "feed-a");
    }

    #[test]
    fn test_duplicate_returns_existing() {
        let (store, _dir) = test_store();
        let d = doc("First", "Same body", "https://a.example/1");
        let (first, is_new) = store.save_document(&d, "rss", "feed-a").unwrap();
        assert!(is_new);

        // Same normalized content and URL, different title.
        let d2 = doc("Second", "  SAME   body ", "https://a.example/1");
        let (second, is_new) = store.save_document(&d2, "rss", "feed-b").unwrap();
        assert!(!is_new);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_save_batch_counts() {
        let (store, _dir) = test_store();
        let docs = vec![
            doc("A", "identical content", "https://a.example/x"),
            doc("B", "Identical   CONTENT", "https://a.example/x"),
        ];
        let report = store.save_documents(&docs, "rss", "feed").unwrap();
        assert_eq!(report.saved, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_unprocessed_and_mark() {
        let (store, _dir) = test_store();
        let (stored, _) = store
            .save_document(&doc("A", "one", "https://a/1"), "rss", "feed")
            .unwrap();
        store
            .save_document(&doc("B", "two", "https://a/2"), "api", "feed")
            .unwrap();

        assert_eq!(store.get_unprocessed(10, None).unwrap().len(), 2);
        assert_eq!(store.get_unprocessed(10, Some("rss")).unwrap().len(), 1);

        assert!(store.mark_processed(stored.id).unwrap());
        assert_eq!(store.get_unprocessed(10, None).unwrap().len(), 1);
        assert!(store.get_document(stored.id).unwrap().unwrap().processed);
    }

    #[test]
    fn test_date_range() {
        let (store, _dir) = test_store();
        store
            .save_document(&doc("A", "one", "https://a/1"), "rss", "feed")
            .unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 5, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(store.get_by_date_range(start, end, None).unwrap().len(), 1);

        let early_end = NaiveDate::from_ymd_opt(2025, 5, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        assert!(store
            .get_by_date_range(start, early_end, None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_content_hash_normalization() {
        let a = content_hash("Breaking  News\nToday", "https://x/1");
        let b = content_hash("breaking news today", "https://x/1");
        let c = content_hash("breaking news today", "https://x/2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
