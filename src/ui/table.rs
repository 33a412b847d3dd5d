use tabled::{settings::Style, Table, Tabled};
use crate::record::{self, MatchRecord};
use crate::stats::{ChampionSummary, PlayerSummary};
use crate::ui::{outcome_label, rate_label};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    id: i64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Champion")]
    champion: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Mode")]
    category: String,
}

#[derive(Tabled)]
struct ChampionRow {
    #[tabled(rename = "Champion")]
    champion: String,
    #[tabled(rename = "W")]
    wins: usize,
    #[tabled(rename = "L")]
    losses: usize,
    #[tabled(rename = "Win Rate")]
    win_rate: String,
}

#[derive(Tabled)]
struct PlayerRow {
    #[tabled(rename = "Player")]
    player: String,
    #[tabled(rename = "Games")]
    games: usize,
    #[tabled(rename = "W")]
    wins: usize,
    #[tabled(rename = "L")]
    losses: usize,
    #[tabled(rename = "Win Rate")]
    win_rate: String,
    #[tabled(rename = "Best")]
    best: String,
    #[tabled(rename = "Worst")]
    worst: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    render(
        stats
            .iter()
            .map(|(label, value)| TableRow {
                metric: label.to_string(),
                value: value.to_string(),
            })
            .collect(),
    )
}

pub fn match_table(matches: &[MatchRecord]) -> String {
    render(
        matches
            .iter()
            .map(|m| MatchRow {
                id: m.id,
                date: record::format_timestamp(&m.played_at),
                player: m.player.clone(),
                champion: m.champion.clone(),
                result: outcome_label(m.outcome()),
                category: m.category.clone(),
            })
            .collect(),
    )
}

pub fn champion_table(champions: &[ChampionSummary]) -> String {
    render(
        champions
            .iter()
            .map(|c| ChampionRow {
                champion: c.champion.clone(),
                wins: c.wins(),
                losses: c.losses(),
                win_rate: rate_label(c.win_rate()),
            })
            .collect(),
    )
}

pub fn player_table(players: &[PlayerSummary]) -> String {
    render(
        players
            .iter()
            .map(|p| PlayerRow {
                player: p.player.clone(),
                games: p.games(),
                wins: p.tally.wins,
                losses: p.tally.losses,
                win_rate: rate_label(p.win_rate()),
                best: p.best_champion.clone(),
                worst: p.worst_champion.clone(),
            })
            .collect(),
    )
}
