use std::collections::HashMap;
use serde::Serialize;
use crate::record::MatchRecord;
use super::Tally;
use super::champion::{self, champion_summaries};

/// Win/loss totals for one player plus their strongest and weakest champion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    pub player: String,
    #[serde(flatten)]
    pub tally: Tally,
    /// Champion with the most wins for this player
    pub best_champion: String,
    /// Champion with the most losses for this player
    pub worst_champion: String,
}

impl PlayerSummary {
    pub fn games(&self) -> usize {
        self.tally.games()
    }

    pub fn win_rate(&self) -> f64 {
        self.tally.win_rate()
    }
}

/// Group records by player, in the order each player first appears
pub fn player_summaries<'a, I>(records: I) -> Vec<PlayerSummary>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&MatchRecord>)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.player.as_str()).or_insert_with(|| {
            groups.push((record.player.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    groups
        .into_iter()
        .map(|(player, played)| {
            let per_champion = champion_summaries(played.iter().copied());
            let name_of = |s: Option<&champion::ChampionSummary>| {
                s.map(|s| s.champion.clone()).unwrap_or_default()
            };

            PlayerSummary {
                player: player.to_string(),
                tally: Tally::from_records(played.iter().copied()),
                best_champion: name_of(champion::best_champion(&per_champion)),
                worst_champion: name_of(champion::worst_champion(&per_champion)),
            }
        })
        .collect()
}

/// Highest win rate first, then most games; remaining ties keep grouped order
pub fn sort_players(players: &mut [PlayerSummary]) {
    players.sort_by(|a, b| {
        b.win_rate()
            .total_cmp(&a.win_rate())
            .then_with(|| b.games().cmp(&a.games()))
    });
}
