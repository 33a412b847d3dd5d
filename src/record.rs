//! Match records - the single fact type the tracker persists
//!
//! A match ties one player to one champion with a win/loss outcome, a
//! timestamp and a free-form category label (game mode, notes).

use crate::{Error, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Player name used when none was supplied
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Category label used when none was supplied
pub const DEFAULT_CATEGORY: &str = "Selected";

/// On-disk timestamp layout
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Result of a match as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

impl From<bool> for Outcome {
    fn from(is_win: bool) -> Self {
        if is_win { Outcome::Win } else { Outcome::Loss }
    }
}

impl FromStr for Outcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "win" | "w" | "victory" => Ok(Outcome::Win),
            "loss" | "l" | "lose" | "defeat" => Ok(Outcome::Loss),
            _ => Err(Error::Validation(format!("Unknown outcome: {}", s))),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Store-assigned identifier, never reused
    pub id: i64,
    pub player: String,
    pub champion: String,
    pub is_win: bool,
    /// Local time, second precision
    pub played_at: NaiveDateTime,
    /// Game mode or legacy note
    pub category: String,
}

impl MatchRecord {
    pub fn outcome(&self) -> Outcome {
        Outcome::from(self.is_win)
    }
}

/// Insert payload for a match. `player` and `category` fall back to
/// [`UNKNOWN_PLAYER`] and [`DEFAULT_CATEGORY`] when missing or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub player: Option<String>,
    pub champion: String,
    pub is_win: bool,
    pub played_at: NaiveDateTime,
    pub category: Option<String>,
}

impl NewMatch {
    /// Create a match played now with no player or category
    pub fn new(champion: impl Into<String>, is_win: bool) -> Self {
        Self {
            player: None,
            champion: champion.into(),
            is_win,
            played_at: now(),
            category: None,
        }
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn at(mut self, played_at: NaiveDateTime) -> Self {
        self.played_at = played_at;
        self
    }

    /// Player name after trimming and sentinel substitution
    pub fn resolved_player(&self) -> &str {
        non_blank(self.player.as_deref()).unwrap_or(UNKNOWN_PLAYER)
    }

    /// Category label after trimming and sentinel substitution
    pub fn resolved_category(&self) -> &str {
        non_blank(self.category.as_deref()).unwrap_or(DEFAULT_CATEGORY)
    }
}

/// Current local time truncated to whole seconds, matching storage precision
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
