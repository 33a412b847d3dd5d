//! # Matchlog - match history tracker
//!
//! Persists win/loss match records per player and champion, imports them in
//! bulk from loosely structured spreadsheets and derives statistics.
//!
//! Matchlog provides:
//! - SQLite-backed record store with additive, versioned schema migration
//! - Tolerant tabular import (unknown column order, optional header, mixed date formats)
//! - Pure champion/player aggregation with deterministic best/worst selection

pub mod record;
pub mod storage;
pub mod import;
pub mod stats;
pub mod catalog;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{MatchRecord, NewMatch, Outcome, UNKNOWN_PLAYER, DEFAULT_CATEGORY};
pub use storage::MatchStore;
pub use import::{ImportOptions, ImportReport, Importer};
pub use stats::{ChampionSummary, Dashboard, PlayerSummary, Tally};

/// Result type alias for Matchlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Matchlog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error reading {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("{field} column not found. Expected column header: {expected}")]
    MissingColumn { field: &'static str, expected: String },

    #[error("Invalid match: {0}")]
    Validation(String),
}
