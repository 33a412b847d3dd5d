use crate::record::Outcome;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::STATS, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// "Win"/"Loss" in the theme's win or loss color
pub fn outcome_label(outcome: Outcome) -> String {
    let style = if outcome.is_win() { theme().win.clone() } else { theme().loss.clone() };
    outcome.as_str().style(style).to_string()
}

/// Percentage with one decimal, colored by whether it is a winning rate
pub fn rate_label(rate: f64) -> String {
    format!("{:.1}%", rate).style(theme().for_rate(rate).clone()).to_string()
}
