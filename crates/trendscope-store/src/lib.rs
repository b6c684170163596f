//! TrendScope Store — SQLite-backed content store and importance repository.

pub mod content;
pub mod importance;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use importance::classify_trend;
pub use sqlite::SqliteStore;
pub use types::*;
