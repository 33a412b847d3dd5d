pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, outcome_label, rate_label, section, success, summary_row, warn};
pub use table::{champion_table, match_table, player_table, stats_table};
pub use theme::{theme, Theme};
