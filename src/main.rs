//! Matchlog CLI - log matches, import spreadsheets and review statistics

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use matchlog::config::{self, MatchlogConfig};
use matchlog::import::{ImportOptions, Importer};
use matchlog::record::{self, NewMatch, Outcome};
use matchlog::stats::{self, Dashboard};
use matchlog::storage::MatchStore;
use matchlog::{catalog, ui};
use matchlog::ui::Icons;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Errors shown after an import before the rest are summarised
const IMPORT_ERRORS_SHOWN: usize = 10;

#[derive(Parser)]
#[command(name = "matchlog")]
#[command(version)]
#[command(about = "Match history tracker - win/loss records, spreadsheet import and champion statistics")]
#[command(long_about = r#"
Matchlog keeps a local history of your matches and turns it into statistics:
  • Per-champion and per-player win rates
  • Best and worst champion overall and per player
  • Bulk import from Excel/ODS workbooks and CSV/TSV exports with flexible column layouts

Example usage:
  matchlog log --champion Ahri --result win --player Faker --mode Ranked
  matchlog import --file history.csv
  matchlog dashboard
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Log a single match
    Log {
        /// Champion played
        #[arg(short, long)]
        champion: String,

        /// Match result (win or loss)
        #[arg(short, long)]
        result: Outcome,

        /// Player name (defaults to the saved summoner name)
        #[arg(short, long)]
        player: Option<String>,

        /// Game mode or note
        #[arg(short, long)]
        mode: Option<String>,

        /// When the match was played (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show match history, newest first
    History {
        /// Maximum number of matches to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Delete a match by id
    Delete {
        /// Match id
        #[arg(long)]
        id: i64,
    },

    /// Delete every match (settings and players are kept)
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Import matches from a workbook (first worksheet) or a CSV/TSV file
    Import {
        /// File to import
        #[arg(short, long)]
        file: PathBuf,

        /// Field delimiter for delimited files (inferred from the extension by default)
        #[arg(long)]
        delimiter: Option<String>,
    },

    /// Overall, champion and player statistics
    Dashboard {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Champion win/loss list, most wins first
    Champions {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List known players (roster and match history)
    Players,

    /// Register a player in the roster
    AddPlayer {
        /// Player name
        name: String,
    },

    /// Win rate for one game mode
    Mode {
        /// Mode label, matched exactly
        label: String,
    },

    /// Show or set the saved summoner name
    Summoner {
        /// New summoner name
        #[arg(long)]
        set: Option<String>,
    },

    /// Read or write a raw setting
    Setting {
        key: String,
        value: Option<String>,
    },

    /// List known champion names
    Catalog {
        /// Only names starting with this prefix
        prefix: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?;
    let open_store = || -> anyhow::Result<MatchStore> {
        let database = config::resolve_database_path(cli.database.as_deref(), config.as_ref());
        config::ensure_db_dir(&database)?;
        tracing::debug!("Opening {:?}", database);
        Ok(MatchStore::open(&database)?)
    };

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.clone().unwrap_or_else(config::default_config_path);
            let defaults = MatchlogConfig {
                database: Some(config::default_database_path().display().to_string()),
                ..Default::default()
            };
            config::write_config(&path, &defaults, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }

        Commands::Catalog { prefix } => {
            let names = match prefix {
                Some(p) => catalog::suggest(&p),
                None => catalog::CHAMPIONS.to_vec(),
            };
            for name in names {
                println!("{}", name);
            }
        }

        Commands::Log { champion, result, player, mode, date } => {
            let store = open_store()?;
            let champion = match catalog::canonical(&champion) {
                Some(known) => known.to_string(),
                None => {
                    tracing::warn!("{} is not a known champion", champion.trim());
                    champion
                }
            };
            let played_at = match date {
                Some(raw) => matchlog::import::parse::parse_date(&raw)
                    .ok_or_else(|| anyhow::anyhow!("unrecognised date: {}", raw))?,
                None => record::now(),
            };
            let player = match player {
                Some(p) => Some(p),
                None => store.summoner_name()?,
            };

            let mut new_match = NewMatch::new(champion, result.is_win()).at(played_at);
            new_match.player = player;
            new_match.category = mode;

            let id = store.insert(&new_match)?;
            ui::success(&format!(
                "Logged match #{}: {} {} on {}",
                id,
                new_match.resolved_player(),
                ui::outcome_label(result),
                new_match.champion.trim()
            ));
        }

        Commands::History { limit, format } => {
            let store = open_store()?;
            let mut matches = store.list_all()?;
            if let Some(limit) = limit {
                matches.truncate(limit);
            }

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else if matches.is_empty() {
                println!("{} No matches logged.", Icons::EMPTY);
            } else {
                println!("{} Match history ({} shown)", Icons::HISTORY, matches.len());
                println!("{}", ui::match_table(&matches));
            }
        }

        Commands::Delete { id } => {
            let store = open_store()?;
            if store.delete(id)? {
                ui::success(&format!("Deleted match #{}", id));
            } else {
                ui::warn(&format!("No match with id {}", id));
            }
        }

        Commands::Clear { yes } => {
            let store = open_store()?;
            if !yes {
                anyhow::bail!("refusing to delete every match without --yes");
            }
            let removed = store.clear_all()?;
            println!("{} Removed {} matches.", Icons::DEL, removed);
        }

        Commands::Import { file, delimiter } => {
            let store = open_store()?;
            let mut options = match &config {
                Some(c) => c.import.to_options()?,
                None => ImportOptions::default(),
            };
            if let Some(d) = delimiter {
                options.delimiter = Some(config::parse_delimiter(&d)?);
            }

            println!("{} Importing {}...", Icons::IMPORT, file.display());
            let report = Importer::with_options(&store, options).import_file(&file)?;

            println!("{}", report.summary(IMPORT_ERRORS_SHOWN));
            if report.imported > 0 {
                ui::success("Import completed");
            } else {
                ui::warn("Import completed with nothing imported");
            }
        }

        Commands::Dashboard { format } => {
            let store = open_store()?;
            let matches = store.list_all()?;
            let dashboard = Dashboard::build(&matches);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print_dashboard(&dashboard);
            }
        }

        Commands::Champions { format } => {
            let store = open_store()?;
            let matches = store.list_all()?;
            let mut champions = stats::champion_summaries(&matches);
            stats::sort_by_wins(&mut champions);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&champions)?);
            } else if champions.is_empty() {
                println!("{} No matches logged.", Icons::EMPTY);
            } else {
                println!("{}", ui::champion_table(&champions));
            }
        }

        Commands::Players => {
            let store = open_store()?;
            let names = store.list_player_names()?;
            if names.is_empty() {
                println!("{} No players yet.", Icons::EMPTY);
            }
            for name in names {
                println!("{} {}", Icons::PERSON, name);
            }
        }

        Commands::AddPlayer { name } => {
            let store = open_store()?;
            if name.trim().is_empty() {
                anyhow::bail!("player name must not be blank");
            }
            if store.add_player(&name)? {
                ui::success(&format!("Added {}", name.trim()));
            } else {
                ui::info("Already registered", name.trim());
            }
        }

        Commands::Mode { label } => {
            let store = open_store()?;
            let matches = store.list_all()?;
            let tally = stats::category_tally(&matches, &label);
            ui::section(&label);
            ui::summary_row("Games", &tally.games().to_string());
            ui::summary_row("Wins", &tally.wins.to_string());
            ui::summary_row("Losses", &tally.losses.to_string());
            ui::summary_row("Win rate", &ui::rate_label(tally.win_rate()));
        }

        Commands::Summoner { set } => {
            let store = open_store()?;
            match set {
                Some(name) => {
                    store.set_summoner_name(name.trim())?;
                    ui::success(&format!("Summoner name set to {}", name.trim()));
                }
                None => match store.summoner_name()? {
                    Some(name) => ui::info("Summoner", &name),
                    None => println!("{} No summoner name saved.", Icons::EMPTY),
                },
            }
        }

        Commands::Setting { key, value } => {
            let store = open_store()?;
            match value {
                Some(value) => {
                    store.set_setting(&key, &value)?;
                    ui::success(&format!("{} = {}", key, value));
                }
                None => match store.get_setting(&key)? {
                    Some(value) => println!("{}", value),
                    None => anyhow::bail!("setting {} is not set", key),
                },
            }
        }
    }

    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    let games = dashboard.overview.games().to_string();
    let wins = dashboard.overview.wins.to_string();
    let losses = dashboard.overview.losses.to_string();
    let rate = format!("{:.1}%", dashboard.overall_win_rate);
    let best = dashboard.best_champion.as_deref().unwrap_or("None");
    let worst = dashboard.worst_champion.as_deref().unwrap_or("None");

    ui::header("Dashboard");
    println!(
        "{}",
        ui::stats_table(&[
            ("Games", &games),
            ("Wins", &wins),
            ("Losses", &losses),
            ("Win rate", &rate),
            ("Best champion", best),
            ("Worst champion", worst),
        ])
    );

    if !dashboard.champions.is_empty() {
        ui::section(&format!("{} Champions", Icons::TROPHY));
        println!("{}", ui::champion_table(&dashboard.champions));
    }
    if !dashboard.players.is_empty() {
        ui::section(&format!("{} Players", Icons::PERSON));
        println!("{}", ui::player_table(&dashboard.players));
    }
}
