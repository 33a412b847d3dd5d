//! Database schema definitions and the additive migration ladder
//!
//! The schema version lives in `PRAGMA user_version`. Every step only adds
//! columns, so a database written by any earlier release stays readable and
//! a step that fails can simply be retried on the next open.

use rusqlite::{Connection, params};
use crate::Result;
use crate::record::{DEFAULT_CATEGORY, UNKNOWN_PLAYER};

/// Version written once every migration step has been applied
pub const SCHEMA_VERSION: i32 = 2;

/// SQL to create the matches table in its current shape
pub const CREATE_MATCHES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_name TEXT NOT NULL DEFAULT 'Unknown',
    champion TEXT NOT NULL,
    is_win INTEGER NOT NULL,
    played_at TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'Selected'
)
"#;

/// SQL to create the settings table
pub const CREATE_SETTINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT
)
"#;

/// SQL to create the player roster table
pub const CREATE_PLAYERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    player_name TEXT PRIMARY KEY
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_matches_played_at ON matches(played_at)",
    "CREATE INDEX IF NOT EXISTS idx_matches_champion ON matches(champion)",
];

/// Base table statements. Failure here means the store is unusable.
pub fn base_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_MATCHES_TABLE,
        CREATE_SETTINGS_TABLE,
        CREATE_PLAYERS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Outcome of an additive column change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnChange {
    Added,
    AlreadyPresent,
}

/// Which late-added columns of `matches` exist in an open database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchColumns {
    pub player: bool,
    pub category: bool,
    /// Free-text column that predates `category`
    pub notes: bool,
}

impl MatchColumns {
    /// Shape of a freshly created database
    pub fn current() -> Self {
        Self { player: true, category: true, notes: false }
    }

    /// Read the column set from the live table
    pub fn probe(conn: &Connection) -> Result<Self> {
        let columns = table_columns(conn, "matches")?;
        let has = |name: &str| columns.iter().any(|c| c.eq_ignore_ascii_case(name));
        Ok(Self {
            player: has("player_name"),
            category: has("category"),
            notes: has("notes"),
        })
    }
}

/// What a call to [`ensure_schema`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub from_version: i32,
    pub to_version: i32,
    /// Columns created by this run
    pub added: Vec<&'static str>,
    /// Rows whose category was copied from a legacy note
    pub backfilled: usize,
    /// Steps that failed and will be retried on the next open
    pub degraded: Vec<String>,
}

impl SchemaReport {
    pub fn is_noop(&self) -> bool {
        self.from_version == self.to_version && self.added.is_empty() && self.backfilled == 0
    }
}

struct Migration {
    version: i32,
    description: &'static str,
    apply: fn(&Connection, &mut SchemaReport) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "add matches.player_name",
        apply: add_player_column,
    },
    Migration {
        version: 2,
        description: "add matches.category, backfill from notes",
        apply: add_category_column,
    },
];

/// Create missing tables and walk the migration ladder.
///
/// Idempotent: a second call finds every table and column in place and
/// reports no changes.
pub fn ensure_schema(conn: &Connection) -> Result<SchemaReport> {
    for stmt in base_statements() {
        conn.execute(stmt, [])?;
    }

    let from_version = user_version(conn)?;
    let mut report = SchemaReport {
        from_version,
        to_version: from_version,
        ..Default::default()
    };

    for step in MIGRATIONS.iter().filter(|m| m.version > from_version) {
        match (step.apply)(conn, &mut report) {
            Ok(()) => {
                tracing::debug!("schema step {} applied: {}", step.version, step.description);
                report.to_version = step.version;
            }
            Err(e) => {
                tracing::warn!("schema step {} ({}) failed: {}", step.version, step.description, e);
                report.degraded.push(format!("{}: {}", step.description, e));
                break;
            }
        }
    }

    if report.to_version > from_version {
        set_user_version(conn, report.to_version)?;
    }
    if from_version > SCHEMA_VERSION {
        tracing::debug!("database schema v{} is newer than v{}", from_version, SCHEMA_VERSION);
    }

    Ok(report)
}

fn add_player_column(conn: &Connection, report: &mut SchemaReport) -> Result<()> {
    let definition = format!("TEXT NOT NULL DEFAULT '{}'", UNKNOWN_PLAYER);
    if add_column(conn, "matches", "player_name", &definition)? == ColumnChange::Added {
        report.added.push("player_name");
    }
    Ok(())
}

fn add_category_column(conn: &Connection, report: &mut SchemaReport) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let definition = format!("TEXT NOT NULL DEFAULT '{}'", DEFAULT_CATEGORY);
    let added = add_column(&tx, "matches", "category", &definition)? == ColumnChange::Added;
    let mut backfilled = 0;
    if added && has_column(&tx, "matches", "notes")? {
        backfilled = tx.execute(
            "UPDATE matches SET category = TRIM(notes) WHERE notes IS NOT NULL AND TRIM(notes) != ''",
            [],
        )?;
    }
    tx.commit()?;

    // only reported once the column and backfill are committed
    if added {
        report.added.push("category");
    }
    report.backfilled += backfilled;
    Ok(())
}

/// Add a column unless it already exists.
///
/// A concurrent or repeated add that hits "duplicate column name" also
/// yields [`ColumnChange::AlreadyPresent`]; every other failure propagates.
pub fn add_column(conn: &Connection, table: &str, column: &str, definition: &str) -> Result<ColumnChange> {
    if has_column(conn, table, column)? {
        return Ok(ColumnChange::AlreadyPresent);
    }

    let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition);
    match conn.execute(&sql, []) {
        Ok(_) => Ok(ColumnChange::Added),
        Err(e) if is_duplicate_column(&e) => Ok(ColumnChange::AlreadyPresent),
        Err(e) => Err(e.into()),
    }
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("duplicate column name"))
}

pub fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    Ok(table_columns(conn, table)?
        .iter()
        .any(|c| c.eq_ignore_ascii_case(column)))
}

/// Column names of `table`, empty if the table does not exist
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

pub fn user_version(conn: &Connection) -> Result<i32> {
    let version = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}

fn set_user_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {}", version))?;
    Ok(())
}

/// Shape of the matches table before players and categories existed
#[cfg(test)]
pub(crate) const LEGACY_MATCHES_TABLE: &str = r#"
CREATE TABLE matches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    champion TEXT NOT NULL,
    is_win INTEGER NOT NULL,
    played_at TEXT NOT NULL,
    notes TEXT
)
"#;
