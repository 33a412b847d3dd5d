//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - matches(id, player_name, champion, is_win, played_at, category)
//! - settings(key, value)
//! - players(player_name)
//!
//! The schema version is kept in `PRAGMA user_version`.

pub mod schema;
pub mod sqlite;

pub use schema::{ColumnChange, MatchColumns, SchemaReport, SCHEMA_VERSION};
pub use sqlite::{MatchStore, SUMMONER_NAME_KEY};
