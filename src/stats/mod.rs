//! Statistics - pure aggregation over match records
//!
//! Every function takes the full record set and recomputes from scratch.
//! Nothing here touches storage or mutates its input; results are plain
//! values the caller owns.

pub mod champion;
pub mod player;

use serde::Serialize;
use crate::record::MatchRecord;

pub use champion::{
    best_champion, champion_summaries, sort_by_net, sort_by_wins, worst_champion, ChampionSummary,
};
pub use player::{player_summaries, sort_players, PlayerSummary};

/// Win and loss counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub wins: usize,
    pub losses: usize,
}

impl Tally {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        let mut tally = Tally::default();
        for record in records {
            tally.record(record.is_win);
        }
        tally
    }

    pub fn record(&mut self, is_win: bool) {
        if is_win {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    pub fn games(&self) -> usize {
        self.wins + self.losses
    }

    /// Percentage in `0.0..=100.0`; zero when no games were played
    pub fn win_rate(&self) -> f64 {
        if self.games() == 0 {
            0.0
        } else {
            self.wins as f64 / self.games() as f64 * 100.0
        }
    }

    pub fn net(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }
}

/// Totals across every record
pub fn overview(records: &[MatchRecord]) -> Tally {
    Tally::from_records(records)
}

/// Totals for records whose category equals `label` exactly
pub fn category_tally(records: &[MatchRecord], label: &str) -> Tally {
    Tally::from_records(records.iter().filter(|r| r.category == label))
}

/// Everything the dashboard view shows, computed in one pass over the records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub overview: Tally,
    pub overall_win_rate: f64,
    /// Sorted by wins minus losses
    pub champions: Vec<ChampionSummary>,
    pub best_champion: Option<String>,
    pub worst_champion: Option<String>,
    /// Sorted by win rate, then games played
    pub players: Vec<PlayerSummary>,
}

impl Dashboard {
    pub fn build(records: &[MatchRecord]) -> Self {
        let overview = overview(records);
        let grouped = champion_summaries(records);
        let best = best_champion(&grouped).map(|s| s.champion.clone());
        let worst = worst_champion(&grouped).map(|s| s.champion.clone());

        let mut champions = grouped;
        sort_by_net(&mut champions);

        let mut players = player_summaries(records);
        sort_players(&mut players);

        Dashboard {
            overview,
            overall_win_rate: overview.win_rate(),
            champions,
            best_champion: best,
            worst_champion: worst,
            players,
        }
    }
}
