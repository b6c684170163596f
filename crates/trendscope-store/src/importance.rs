//! Importance repository: idempotent upserts keyed by
//! (keyword, date, team_key), top-N and history queries, and time-series
//! derivation with trend classification.

use chrono::{Days, NaiveDate};
use rusqlite::params;
use tracing::debug;

use crate::sqlite::SqliteStore;
use crate::types::*;
use trendscope_core::{Error, Result};

/// Classify the direction of an importance series (oldest → newest).
///
/// Rising when the recent window clearly outgrows the oldest one, falling
/// when it clearly shrinks, emerging when the series is still small overall
/// but trending up.
pub fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let k = values.len().min(3);
    let first_avg = values[..k].iter().sum::<f64>() / k as f64;
    let last_avg = values[values.len() - k..].iter().sum::<f64>() / k as f64;

    if first_avg <= f64::EPSILON {
        return if last_avg > 0.0 { Trend::Rising } else { Trend::Stable };
    }
    if last_avg > first_avg * 1.5 {
        return Trend::Rising;
    }
    if last_avg < first_avg * 0.7 {
        return Trend::Falling;
    }
    let overall = values.iter().sum::<f64>() / values.len() as f64;
    if overall < 30.0 && last_avg > first_avg {
        Trend::Emerging
    } else {
        Trend::Stable
    }
}

impl SqliteStore {
    /// Create or update an importance record.
    ///
    /// Update-in-place on key conflict: exactly one row per
    /// (keyword, date, team_key), always reflecting the latest write.
    pub fn upsert_importance(&self, rec: &NewImportanceRecord) -> Result<()> {
        let components = serde_json::to_string(&rec.component_scores)?;
        let content_ids = serde_json::to_string(&rec.content_ids)?;
        let snippets = serde_json::to_string(&rec.sample_snippets)?;
        let now = Self::now_millis();

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO keyword_importance \
             (keyword, date, team_key, importance_score, component_scores_json, \
              frequency, document_count, source_diversity, velocity, acceleration, \
              sentiment_score, sentiment_magnitude, positive_mentions, \
              negative_mentions, neutral_mentions, content_ids_json, snippets_json, \
              updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18) \
             ON CONFLICT(keyword, date, team_key) DO UPDATE SET \
               importance_score = excluded.importance_score, \
               component_scores_json = excluded.component_scores_json, \
               frequency = excluded.frequency, \
               document_count = excluded.document_count, \
               source_diversity = excluded.source_diversity, \
               velocity = excluded.velocity, \
               acceleration = excluded.acceleration, \
               sentiment_score = excluded.sentiment_score, \
               sentiment_magnitude = excluded.sentiment_magnitude, \
               positive_mentions = excluded.positive_mentions, \
               negative_mentions = excluded.negative_mentions, \
               neutral_mentions = excluded.neutral_mentions, \
               content_ids_json = excluded.content_ids_json, \
               snippets_json = excluded.snippets_json, \
               updated_at = excluded.updated_at",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            rec.keyword,
            rec.date.to_string(),
            rec.team_key,
            rec.importance_score,
            components,
            rec.frequency,
            rec.document_count,
            rec.source_diversity,
            rec.velocity,
            rec.acceleration,
            rec.sentiment_score,
            rec.sentiment_magnitude,
            rec.positive_mentions,
            rec.negative_mentions,
            rec.neutral_mentions,
            content_ids,
            snippets,
            now,
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }

    /// Top keywords for a team on a date, descending by importance.
    pub fn top_keywords(
        &self,
        team_key: &str,
        date: NaiveDate,
        limit: usize,
        min_importance: f64,
    ) -> Result<Vec<KeywordImportanceRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM keyword_importance \
                 WHERE team_key = ?1 AND date = ?2 AND importance_score >= ?3 \
                 ORDER BY importance_score DESC LIMIT ?4",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(
                params![team_key, date.to_string(), min_importance, limit as i64],
                Self::row_to_importance,
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| Error::Database(e.to_string()))?);
        }
        Ok(out)
    }

    /// A keyword's records between two dates (inclusive), oldest first.
    pub fn importance_history(
        &self,
        keyword: &str,
        team_key: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<KeywordImportanceRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT * FROM keyword_importance \
                 WHERE keyword = ?1 AND team_key = ?2 AND date BETWEEN ?3 AND ?4 \
                 ORDER BY date ASC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(
                params![keyword, team_key, start.to_string(), end.to_string()],
                Self::row_to_importance,
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| Error::Database(e.to_string()))?);
        }
        Ok(out)
    }

    /// Daily frequencies for the trailing window strictly before `as_of`,
    /// oldest first. Velocity input for the temporal signal.
    pub fn frequency_history(
        &self,
        keyword: &str,
        team_key: &str,
        as_of: NaiveDate,
        days: u32,
    ) -> Result<Vec<i64>> {
        let start = as_of
            .checked_sub_days(Days::new(days as u64))
            .unwrap_or(as_of);

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT frequency FROM keyword_importance \
                 WHERE keyword = ?1 AND team_key = ?2 AND date >= ?3 AND date < ?4 \
                 ORDER BY date ASC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(
                params![keyword, team_key, start.to_string(), as_of.to_string()],
                |row| row.get::<_, i64>(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| Error::Database(e.to_string()))?);
        }
        Ok(out)
    }

    /// Rebuild a keyword's daily time series over the trailing `days`
    /// window ending at `as_of`, persist the rollup, and return it.
    pub fn compute_timeseries(
        &self,
        keyword: &str,
        team_key: &str,
        days: u32,
        as_of: NaiveDate,
    ) -> Result<KeywordTimeSeries> {
        let start = as_of
            .checked_sub_days(Days::new(days.saturating_sub(1) as u64))
            .unwrap_or(as_of);
        let history = self.importance_history(keyword, team_key, start, as_of)?;

        let points: Vec<TimeSeriesPoint> = history
            .iter()
            .map(|r| TimeSeriesPoint {
                date: r.date,
                importance: r.importance_score,
                sentiment: r.sentiment_score,
                frequency: r.frequency,
            })
            .collect();

        let importances: Vec<f64> = points.iter().map(|p| p.importance).collect();
        let avg_importance = if importances.is_empty() {
            0.0
        } else {
            importances.iter().sum::<f64>() / importances.len() as f64
        };
        let max_importance = importances.iter().copied().fold(0.0, f64::max);
        let trend = classify_trend(&importances);

        let series = KeywordTimeSeries {
            keyword: keyword.to_string(),
            team_key: team_key.to_string(),
            period: "daily".to_string(),
            start_date: start,
            end_date: as_of,
            points,
            avg_importance,
            max_importance,
            trend,
        };

        self.upsert_timeseries(&series)?;
        debug!(
            "Time series for '{}' ({}): {} points, trend={}",
            keyword,
            team_key,
            series.points.len(),
            series.trend
        );
        Ok(series)
    }

    /// Persist a rollup, update-in-place per
    /// (keyword, team_key, period, start_date, end_date).
    pub fn upsert_timeseries(&self, series: &KeywordTimeSeries) -> Result<()> {
        let points = serde_json::to_string(&series.points)?;
        let now = Self::now_millis();

        let conn = self.conn.lock();
        conn.prepare_cached(
            "INSERT INTO keyword_timeseries \
             (keyword, team_key, period, start_date, end_date, points_json, \
              avg_importance, max_importance, trend, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
             ON CONFLICT(keyword, team_key, period, start_date, end_date) DO UPDATE SET \
               points_json = excluded.points_json, \
               avg_importance = excluded.avg_importance, \
               max_importance = excluded.max_importance, \
               trend = excluded.trend, \
               updated_at = excluded.updated_at",
        )
        .map_err(|e| Error::Database(e.to_string()))?
        .execute(params![
            series.keyword,
            series.team_key,
            series.period,
            series.start_date.to_string(),
            series.end_date.to_string(),
            points,
            series.avg_importance,
            series.max_importance,
            series.trend.to_string(),
            now,
        ])
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use trendscope_core::ComponentScores;

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn record(keyword: &str, date: NaiveDate, importance: f64, frequency: i64) -> NewImportanceRecord {
        NewImportanceRecord {
            keyword: keyword.into(),
            date,
            team_key: "team-a".into(),
            importance_score: importance,
            component_scores: ComponentScores {
                frequency: importance,
                contextual_relevance: 50.0,
                entity_boost: 50.0,
                temporal_dynamics: 50.0,
                source_diversity: 30.0,
                sentiment_magnitude: 10.0,
            },
            frequency,
            document_count: frequency,
            source_diversity: 2,
            velocity: 0.0,
            acceleration: 0.0,
            sentiment_score: 0.1,
            sentiment_magnitude: 0.2,
            positive_mentions: 1,
            negative_mentions: 0,
            neutral_mentions: 2,
            content_ids: vec![1, 2],
            sample_snippets: Vec::new(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_upsert_twice_keeps_one_row() {
        let (store, _dir) = test_store();
        store.upsert_importance(&record("merger", day(1), 40.0, 3)).unwrap();
        store.upsert_importance(&record("merger", day(1), 75.0, 9)).unwrap();

        let rows = store
            .importance_history("merger", "team-a", day(1), day(1))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].importance_score, 75.0);
        assert_eq!(rows[0].frequency, 9);
    }

    #[test]
    fn test_top_keywords_ordering_and_filter() {
        let (store, _dir) = test_store();
        store.upsert_importance(&record("alpha", day(1), 80.0, 5)).unwrap();
        store.upsert_importance(&record("beta", day(1), 60.0, 5)).unwrap();
        store.upsert_importance(&record("gamma", day(1), 20.0, 5)).unwrap();

        let top = store.top_keywords("team-a", day(1), 10, 30.0).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].keyword, "alpha");
        assert_eq!(top[1].keyword, "beta");
    }

    #[test]
    fn test_history_ascending() {
        let (store, _dir) = test_store();
        store.upsert_importance(&record("alpha", day(3), 30.0, 2)).unwrap();
        store.upsert_importance(&record("alpha", day(1), 10.0, 1)).unwrap();

        let history = store
            .importance_history("alpha", "team-a", day(1), day(5))
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, day(1));
        assert_eq!(history[1].date, day(3));
    }

    #[test]
    fn test_frequency_history_excludes_as_of() {
        let (store, _dir) = test_store();
        store.upsert_importance(&record("alpha", day(1), 10.0, 4)).unwrap();
        store.upsert_importance(&record("alpha", day(2), 10.0, 6)).unwrap();
        store.upsert_importance(&record("alpha", day(3), 10.0, 9)).unwrap();

        let freqs = store
            .frequency_history("alpha", "team-a", day(3), 30)
            .unwrap();
        assert_eq!(freqs, vec![4, 6]);
    }

    #[test]
    fn test_trend_rising_from_spec_series() {
        assert_eq!(
            classify_trend(&[10.0, 10.0, 10.0, 30.0, 30.0, 30.0]),
            Trend::Rising
        );
    }

    #[test]
    fn test_trend_falling_and_stable() {
        assert_eq!(
            classify_trend(&[50.0, 50.0, 50.0, 20.0, 20.0, 20.0]),
            Trend::Falling
        );
        assert_eq!(
            classify_trend(&[40.0, 41.0, 42.0, 41.0, 40.0, 42.0]),
            Trend::Stable
        );
    }

    #[test]
    fn test_trend_emerging() {
        // Low overall average, mild upward drift short of the rising bar.
        assert_eq!(
            classify_trend(&[10.0, 10.0, 10.0, 12.0, 13.0, 14.0]),
            Trend::Emerging
        );
    }

    #[test]
    fn test_compute_timeseries_persists_rollup() {
        let (store, _dir) = test_store();
        for (i, imp) in [10.0, 10.0, 10.0, 30.0, 30.0, 30.0].iter().enumerate() {
            store
                .upsert_importance(&record("alpha", day(1 + i as u32), *imp, 3))
                .unwrap();
        }

        let series = store
            .compute_timeseries("alpha", "team-a", 30, day(6))
            .unwrap();
        assert_eq!(series.points.len(), 6);
        assert_eq!(series.trend, Trend::Rising);
        assert!((series.avg_importance - 20.0).abs() < 1e-9);
        assert_eq!(series.max_importance, 30.0);

        let stats = store.stats().unwrap();
        assert_eq!(stats.timeseries_records, 1);

        // Recomputing updates in place rather than adding a row.
        store.compute_timeseries("alpha", "team-a", 30, day(6)).unwrap();
        assert_eq!(store.stats().unwrap().timeseries_records, 1);
    }

    #[test]
    fn test_report_shape() {
        let (store, _dir) = test_store();
        store.upsert_importance(&record("merger", day(1), 40.0, 3)).unwrap();
        let rows = store
            .importance_history("merger", "team-a", day(1), day(1))
            .unwrap();
        let report = rows[0].to_report();
        assert_eq!(report.keyword, "merger");
        assert_eq!(report.metrics.frequency, 3);
        assert_eq!(report.sentiment.breakdown.neutral, 2);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("sentiment").and_then(|s| s.get("breakdown")).is_some());
        assert!(json.get("metrics").and_then(|m| m.get("velocity")).is_some());
    }
}
