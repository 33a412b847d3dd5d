use std::cmp::Reverse;
use std::collections::HashMap;
use serde::Serialize;
use crate::record::MatchRecord;
use super::Tally;

/// Win/loss totals for one champion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChampionSummary {
    pub champion: String,
    #[serde(flatten)]
    pub tally: Tally,
}

impl ChampionSummary {
    pub fn new(champion: String) -> Self {
        ChampionSummary {
            champion,
            tally: Tally::default(),
        }
    }

    pub fn wins(&self) -> usize {
        self.tally.wins
    }

    pub fn losses(&self) -> usize {
        self.tally.losses
    }

    pub fn win_rate(&self) -> f64 {
        self.tally.win_rate()
    }

    /// Dashboard sort key: wins minus losses
    pub fn net(&self) -> i64 {
        self.tally.net()
    }
}

/// Group records by champion, in the order each champion first appears
pub fn champion_summaries<'a, I>(records: I) -> Vec<ChampionSummary>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<ChampionSummary> = Vec::new();

    for record in records {
        let slot = *index.entry(record.champion.as_str()).or_insert_with(|| {
            summaries.push(ChampionSummary::new(record.champion.clone()));
            summaries.len() - 1
        });
        summaries[slot].tally.record(record.is_win);
    }

    summaries
}

/// Descending by wins minus losses; ties keep grouped order
pub fn sort_by_net(summaries: &mut [ChampionSummary]) {
    summaries.sort_by_key(|s| Reverse(s.net()));
}

/// Descending by wins; ties keep grouped order
pub fn sort_by_wins(summaries: &mut [ChampionSummary]) {
    summaries.sort_by_key(|s| Reverse(s.wins()));
}

/// Most wins; the earliest summary wins a tie
pub fn best_champion(summaries: &[ChampionSummary]) -> Option<&ChampionSummary> {
    first_max_by(summaries, ChampionSummary::wins)
}

/// Most losses; the earliest summary wins a tie
pub fn worst_champion(summaries: &[ChampionSummary]) -> Option<&ChampionSummary> {
    first_max_by(summaries, ChampionSummary::losses)
}

fn first_max_by<F>(summaries: &[ChampionSummary], key: F) -> Option<&ChampionSummary>
where
    F: Fn(&ChampionSummary) -> usize,
{
    summaries.iter().fold(None, |best, s| match best {
        Some(b) if key(b) >= key(s) => Some(b),
        _ => Some(s),
    })
}
