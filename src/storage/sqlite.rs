//! SQLite storage implementation

use std::path::Path;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params, OptionalExtension};
use rusqlite::types::Value;
use crate::{Error, Result};
use crate::record::{self, MatchRecord, NewMatch, DEFAULT_CATEGORY, UNKNOWN_PLAYER};
use super::schema::{self, MatchColumns, SchemaReport};

/// Settings key holding the user's own summoner name
pub const SUMMONER_NAME_KEY: &str = "SummonerName";

/// SQLite-backed storage for matches, settings and the player roster
pub struct MatchStore {
    conn: Connection,
    columns: MatchColumns,
}

impl MatchStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let mut store = Self {
            conn,
            columns: MatchColumns::current(),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Re-run the schema check and refresh the known column set
    pub fn ensure_schema(&mut self) -> Result<SchemaReport> {
        let report = schema::ensure_schema(&self.conn)?;
        if !report.is_noop() {
            tracing::debug!(
                "schema v{} -> v{}, added {:?}, backfilled {}",
                report.from_version,
                report.to_version,
                report.added,
                report.backfilled
            );
        }
        self.columns = MatchColumns::probe(&self.conn)?;
        Ok(report)
    }

    /// Columns of the matches table this store reads and writes
    pub fn columns(&self) -> MatchColumns {
        self.columns
    }

    // ========== Match Operations ==========

    /// Insert a match and return its id.
    ///
    /// Optional columns missing from the live table are skipped for this call.
    pub fn insert(&self, new_match: &NewMatch) -> Result<i64> {
        let champion = new_match.champion.trim();
        if champion.is_empty() {
            return Err(Error::Validation("champion name is required".to_string()));
        }

        let mut columns = vec!["champion", "is_win", "played_at"];
        let mut values: Vec<Value> = vec![
            Value::Text(champion.to_string()),
            Value::Integer(i64::from(new_match.is_win)),
            Value::Text(record::format_timestamp(&new_match.played_at)),
        ];
        if self.columns.player {
            columns.push("player_name");
            values.push(Value::Text(new_match.resolved_player().to_string()));
        }
        if self.columns.category {
            columns.push("category");
            values.push(Value::Text(new_match.resolved_category().to_string()));
        } else if self.columns.notes {
            columns.push("notes");
            values.push(Value::Text(new_match.resolved_category().to_string()));
        }

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO matches ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        self.conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All matches, newest first.
    ///
    /// Fields whose column is not present yet come back as sentinels.
    pub fn list_all(&self) -> Result<Vec<MatchRecord>> {
        let player_expr = if self.columns.player { "player_name" } else { "NULL" };
        let category_expr = if self.columns.category {
            "category"
        } else if self.columns.notes {
            "notes"
        } else {
            "NULL"
        };
        let sql = format!(
            "SELECT id, {}, champion, is_win, played_at, {} FROM matches ORDER BY played_at DESC, id DESC",
            player_expr, category_expr
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let matches = stmt
            .query_map([], |row| self.row_to_match(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(matches)
    }

    /// Helper to convert a row to a MatchRecord
    fn row_to_match(&self, row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
        let player: Option<String> = row.get(1)?;
        let is_win: i64 = row.get(3)?;
        let played_at: String = row.get(4)?;
        let category: Option<String> = row.get(5)?;

        Ok(MatchRecord {
            id: row.get(0)?,
            player: non_blank_or(player, UNKNOWN_PLAYER),
            champion: row.get(2)?,
            is_win: is_win != 0,
            played_at: parse_stored_timestamp(&played_at),
            category: non_blank_or(category, DEFAULT_CATEGORY),
        })
    }

    /// Delete one match. Returns whether a row was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM matches WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    /// Delete every match; settings and the roster are kept
    pub fn clear_all(&self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM matches", [])?;
        tracing::debug!("cleared {} matches", removed);
        Ok(removed)
    }

    /// Count all matches
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM matches", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Player Operations ==========

    /// Roster entries plus every player seen in a match, each once,
    /// ordered case-insensitively
    pub fn list_player_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        if self.columns.player {
            let mut stmt = self.conn.prepare(
                "SELECT DISTINCT player_name FROM matches WHERE player_name IS NOT NULL AND TRIM(player_name) != ''"
            )?;
            let seen = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            names.extend(seen);
        }

        let mut stmt = self.conn.prepare(
            "SELECT player_name FROM players WHERE TRIM(player_name) != ''"
        )?;
        let roster = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        names.extend(roster);

        names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        names.dedup();
        Ok(names)
    }

    /// Register a player. Blank names are ignored; returns whether a new
    /// roster entry was created.
    pub fn add_player(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO players (player_name) VALUES (?1)",
            [name],
        )?;
        Ok(inserted > 0)
    }

    // ========== Settings Operations ==========

    /// Read a setting; `None` if the key was never written
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<Option<String>> = self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    /// Insert or replace a setting
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn summoner_name(&self) -> Result<Option<String>> {
        self.get_setting(SUMMONER_NAME_KEY)
    }

    pub fn set_summoner_name(&self, name: &str) -> Result<()> {
        self.set_setting(SUMMONER_NAME_KEY, name)
    }
}

fn non_blank_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

/// Stored timestamps are written in [`record::TIMESTAMP_FORMAT`]; rows
/// written by other tools go through the lenient import parser.
fn parse_stored_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, record::TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| crate::import::parse::parse_date(raw))
        .unwrap_or_else(|| {
            tracing::debug!("unparseable stored timestamp {:?}, using now", raw);
            record::now()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::LEGACY_MATCHES_TABLE;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    /// Store over a matches table that has not been migrated
    fn lagging_store(columns: MatchColumns) -> MatchStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(LEGACY_MATCHES_TABLE, []).unwrap();
        conn.execute(schema::CREATE_SETTINGS_TABLE, []).unwrap();
        conn.execute(schema::CREATE_PLAYERS_TABLE, []).unwrap();
        conn.execute_batch(
            "INSERT INTO matches (champion, is_win, played_at, notes) VALUES ('Ahri', 1, '2024-03-01 10:00:00', 'Ranked');
             INSERT INTO matches (champion, is_win, played_at, notes) VALUES ('Zed', 0, '2024-03-02 10:00:00', NULL);",
        )
        .unwrap();
        MatchStore { conn, columns }
    }

    #[test]
    fn test_insert_then_list_roundtrip() {
        let store = MatchStore::open_in_memory().unwrap();

        let id = store.insert(&NewMatch::new("Ahri", true).at(at(1, 12))).unwrap();
        let all = store.list_all().unwrap();

        assert_eq!(all.len(), 1);
        let m = &all[0];
        assert_eq!(m.id, id);
        assert_eq!(m.champion, "Ahri");
        assert!(m.is_win);
        assert_eq!(m.played_at, at(1, 12));
        assert_eq!(m.player, UNKNOWN_PLAYER);
        assert_eq!(m.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_insert_keeps_supplied_player_and_category() {
        let store = MatchStore::open_in_memory().unwrap();
        store
            .insert(&NewMatch::new("Jinx", false).with_player(" Faker ").with_category("ARAM"))
            .unwrap();

        let m = &store.list_all().unwrap()[0];
        assert_eq!(m.player, "Faker");
        assert_eq!(m.category, "ARAM");
        assert!(!m.is_win);
    }

    #[test]
    fn test_insert_rejects_blank_champion() {
        let store = MatchStore::open_in_memory().unwrap();
        let err = store.insert(&NewMatch::new("  ", true)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_is_newest_first() {
        let store = MatchStore::open_in_memory().unwrap();
        store.insert(&NewMatch::new("A", true).at(at(2, 9))).unwrap();
        store.insert(&NewMatch::new("B", true).at(at(5, 9))).unwrap();
        store.insert(&NewMatch::new("C", true).at(at(3, 9))).unwrap();

        let champions: Vec<String> = store.list_all().unwrap().into_iter().map(|m| m.champion).collect();
        assert_eq!(champions, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_delete_and_ids_are_not_reused() {
        let store = MatchStore::open_in_memory().unwrap();
        let first = store.insert(&NewMatch::new("A", true)).unwrap();
        let second = store.insert(&NewMatch::new("B", true)).unwrap();

        assert!(store.delete(second).unwrap());
        assert!(!store.delete(second).unwrap());
        assert!(!store.delete(9999).unwrap());

        let third = store.insert(&NewMatch::new("C", true)).unwrap();
        assert!(third > second);

        let ids: Vec<i64> = store.list_all().unwrap().iter().map(|m| m.id).collect();
        assert!(ids.contains(&first));
        assert!(!ids.contains(&second));
    }

    #[test]
    fn test_clear_all_keeps_settings_and_roster() {
        let store = MatchStore::open_in_memory().unwrap();
        store.insert(&NewMatch::new("A", true).with_player("Alice")).unwrap();
        store.insert(&NewMatch::new("B", false)).unwrap();
        store.add_player("Bob").unwrap();
        store.set_summoner_name("Me").unwrap();

        assert_eq!(store.clear_all().unwrap(), 2);
        assert!(store.list_all().unwrap().is_empty());
        assert_eq!(store.summoner_name().unwrap().as_deref(), Some("Me"));
        assert_eq!(store.list_player_names().unwrap(), vec!["Bob"]);
    }

    #[test]
    fn test_settings_upsert_and_absent_key() {
        let store = MatchStore::open_in_memory().unwrap();
        assert_eq!(store.get_setting(SUMMONER_NAME_KEY).unwrap(), None);

        store.set_setting(SUMMONER_NAME_KEY, "X").unwrap();
        assert_eq!(store.get_setting(SUMMONER_NAME_KEY).unwrap(), Some("X".to_string()));

        store.set_setting(SUMMONER_NAME_KEY, "Y").unwrap();
        assert_eq!(store.get_setting(SUMMONER_NAME_KEY).unwrap(), Some("Y".to_string()));

        store.set_setting("Empty", "").unwrap();
        assert_eq!(store.get_setting("Empty").unwrap(), Some(String::new()));
        assert_eq!(store.get_setting("never-set").unwrap(), None);
    }

    #[test]
    fn test_player_names_union_and_order() {
        let store = MatchStore::open_in_memory().unwrap();
        store.insert(&NewMatch::new("A", true).with_player("bob")).unwrap();
        store.insert(&NewMatch::new("A", true).with_player("Carol")).unwrap();
        store.insert(&NewMatch::new("A", true).with_player("Carol")).unwrap();
        store.add_player("alice").unwrap();
        store.add_player("Bob").unwrap();
        store.add_player("Carol").unwrap();

        assert_eq!(
            store.list_player_names().unwrap(),
            vec!["alice", "Bob", "bob", "Carol"]
        );
    }

    #[test]
    fn test_add_player_is_idempotent_and_ignores_blank() {
        let store = MatchStore::open_in_memory().unwrap();
        assert!(store.add_player(" Dave ").unwrap());
        assert!(!store.add_player("Dave").unwrap());
        assert!(!store.add_player("   ").unwrap());

        assert_eq!(store.list_player_names().unwrap(), vec!["Dave"]);
    }

    #[test]
    fn test_list_tolerates_missing_late_columns() {
        let store = lagging_store(MatchColumns { player: false, category: false, notes: false });

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|m| m.player == UNKNOWN_PLAYER));
        assert!(all.iter().all(|m| m.category == DEFAULT_CATEGORY));
        assert_eq!(all[0].champion, "Zed");
    }

    #[test]
    fn test_list_reads_notes_when_category_missing() {
        let store = lagging_store(MatchColumns { player: false, category: false, notes: true });

        let all = store.list_all().unwrap();
        assert_eq!(all[1].champion, "Ahri");
        assert_eq!(all[1].category, "Ranked");
        assert_eq!(all[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_insert_skips_missing_columns() {
        let store = lagging_store(MatchColumns { player: false, category: false, notes: false });
        store
            .insert(&NewMatch::new("Lux", true).with_player("Eve").with_category("ARAM"))
            .unwrap();

        assert_eq!(store.count().unwrap(), 3);
        assert!(store.list_player_names().unwrap().is_empty());
    }

    #[test]
    fn test_open_migrates_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(LEGACY_MATCHES_TABLE, []).unwrap();
            conn.execute(
                "INSERT INTO matches (champion, is_win, played_at, notes) VALUES ('Ahri', 1, '2024-03-01 10:00:00', 'Ranked')",
                [],
            )
            .unwrap();
        }

        let mut store = MatchStore::open(&path).unwrap();
        assert_eq!(store.columns(), MatchColumns { player: true, category: true, notes: true });

        let all = store.list_all().unwrap();
        assert_eq!(all[0].player, UNKNOWN_PLAYER);
        assert_eq!(all[0].category, "Ranked");

        assert!(store.ensure_schema().unwrap().is_noop());
    }

    #[test]
    fn test_open_keeps_working_when_a_migration_step_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stuck.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(LEGACY_MATCHES_TABLE, []).unwrap();
            conn.execute_batch(
                "INSERT INTO matches (champion, is_win, played_at, notes) VALUES ('Ahri', 1, '2024-03-01 10:00:00', 'Ranked');
                 INSERT INTO matches (champion, is_win, played_at, notes) VALUES ('Zed', 0, '2024-03-02 10:00:00', NULL);
                 CREATE TRIGGER block_updates BEFORE UPDATE ON matches
                 BEGIN SELECT RAISE(ABORT, 'matches are read-only'); END;",
            )
            .unwrap();
        }

        let store = MatchStore::open(&path).unwrap();
        assert_eq!(store.columns(), MatchColumns { player: true, category: false, notes: true });
        assert_eq!(schema::user_version(&store.conn).unwrap(), 1);

        store.insert(&NewMatch::new("Lux", true).at(at(3, 10)).with_category("ARAM")).unwrap();

        let all = store.list_all().unwrap();
        let summary: Vec<(&str, &str, &str)> = all
            .iter()
            .map(|m| (m.champion.as_str(), m.player.as_str(), m.category.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Lux", UNKNOWN_PLAYER, "ARAM"),
                ("Zed", UNKNOWN_PLAYER, DEFAULT_CATEGORY),
                ("Ahri", UNKNOWN_PLAYER, "Ranked"),
            ]
        );
    }

    #[test]
    fn test_open_fails_when_storage_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("db.sqlite");
        assert!(matches!(MatchStore::open(&path), Err(Error::Storage(_))));
    }
}
