//! Column layout detection
//!
//! A sheet either starts with a header row, in which case columns are found
//! by synonym, or it follows the fixed order
//! `player, champion, outcome, date, category`.

use crate::{Error, Result};
use super::sheet::Sheet;

/// First-cell fragments that mark row 1 as a header
pub const HEADER_MARKERS: &[&str] = &["player", "champion", "iswin", "date"];

pub const PLAYER_HEADERS: &[&str] = &["playername", "player"];
pub const CHAMPION_HEADERS: &[&str] = &["champion", "champ"];
pub const OUTCOME_HEADERS: &[&str] = &["iswin", "win", "victory", "result"];
pub const DATE_HEADERS: &[&str] = &["date", "datetime", "time"];
pub const CATEGORY_HEADERS: &[&str] = &["gamemode", "game mode", "mode", "notes", "note"];

/// Zero-based column index of every field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub player: Option<usize>,
    pub champion: usize,
    pub outcome: usize,
    pub date: usize,
    pub category: Option<usize>,
}

impl ColumnMap {
    /// Layout of a headerless sheet
    pub fn positional() -> Self {
        Self {
            player: Some(0),
            champion: 1,
            outcome: 2,
            date: 3,
            category: Some(4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub has_header: bool,
    pub columns: ColumnMap,
}

impl Layout {
    /// Zero-based index of the first data row
    pub fn first_data_row(&self) -> usize {
        if self.has_header { 1 } else { 0 }
    }
}

/// Work out where each field lives.
///
/// Fails only when a header is present but the champion, outcome or date
/// column cannot be found.
pub fn detect(sheet: &Sheet) -> Result<Layout> {
    if !has_header(sheet) {
        return Ok(Layout {
            has_header: false,
            columns: ColumnMap::positional(),
        });
    }

    let header = sheet.row(0);
    let columns = ColumnMap {
        player: find_column(header, PLAYER_HEADERS),
        champion: require(header, "Champion", CHAMPION_HEADERS)?,
        outcome: require(header, "Win/Loss", OUTCOME_HEADERS)?,
        date: require(header, "Date", DATE_HEADERS)?,
        category: find_column(header, CATEGORY_HEADERS),
    };
    tracing::debug!("header layout: {:?}", columns);

    Ok(Layout { has_header: true, columns })
}

pub fn has_header(sheet: &Sheet) -> bool {
    let first = sheet.cell(0, 0).to_lowercase();
    HEADER_MARKERS.iter().any(|marker| first.contains(marker))
}

/// First column whose header contains any of `terms`
pub fn find_column(header: &[String], terms: &[&str]) -> Option<usize> {
    header.iter().position(|cell| {
        let cell = cell.trim().to_lowercase();
        terms.iter().any(|term| cell.contains(term))
    })
}

fn require(header: &[String], field: &'static str, terms: &[&str]) -> Result<usize> {
    find_column(header, terms).ok_or_else(|| Error::MissingColumn {
        field,
        expected: expected_headers(terms),
    })
}

/// "'Champion' or 'Champ'", "'A', 'B', or 'C'"
fn expected_headers(terms: &[&str]) -> String {
    let quoted: Vec<String> = terms.iter().map(|t| format!("'{}'", title_case(t))).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        [rest @ .., last] => format!("{}, or {}", rest.join(", "), last),
    }
}

fn title_case(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
