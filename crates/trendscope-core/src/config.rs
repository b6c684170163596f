//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all TrendScope data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// SQLite database directory (`data/db/`).
    pub db: PathBuf,
    /// Document drop-off directory for batch ingestion (`data/inbox/`).
    pub inbox: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            db: root.join("db"),
            inbox: root.join("inbox"),
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.db)?;
        std::fs::create_dir_all(&self.inbox)?;
        Ok(())
    }
}

/// Top-level engine configuration.
///
/// Thresholds that the source system applied inconsistently (storage
/// relevance vs. query-side importance, min-frequency 1 vs. 2) are kept
/// as explicit knobs here rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Maximum keywords kept per document after extraction.
    pub max_keywords: usize,
    /// Minimum merged relevance for a candidate to enter the batch cache.
    pub storage_relevance_threshold: f64,
    /// Minimum batch frequency for a cached keyword to be scored.
    pub min_frequency: u32,
    /// Worker pool size for the scoring fan-out (0 = available parallelism).
    pub max_workers: usize,
    /// Trailing window, in days, for velocity history lookups.
    pub history_days: u32,
    /// Characters of context kept on each side of a keyword mention.
    pub context_window: usize,
}

impl EngineConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self {
            data_paths,
            max_keywords: env_or("TRENDSCOPE_MAX_KEYWORDS", 20),
            storage_relevance_threshold: env_or("TRENDSCOPE_RELEVANCE_THRESHOLD", 0.1),
            min_frequency: env_or("TRENDSCOPE_MIN_FREQUENCY", 1),
            max_workers: env_or("TRENDSCOPE_MAX_WORKERS", 0),
            history_days: env_or("TRENDSCOPE_HISTORY_DAYS", 30),
            context_window: env_or("TRENDSCOPE_CONTEXT_WINDOW", 100),
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_created() {
        let dir = std::env::temp_dir().join("trendscope-config-test");
        let _ = std::fs::remove_dir_all(&dir);
        let paths = DataPaths::new(&dir).unwrap();
        assert!(paths.db.exists());
        assert!(paths.inbox.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_defaults() {
        let dir = std::env::temp_dir().join("trendscope-config-defaults");
        let cfg = EngineConfig::from_env(&dir).unwrap();
        assert_eq!(cfg.max_keywords, 20);
        assert_eq!(cfg.min_frequency, 1);
        assert_eq!(cfg.history_days, 30);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
