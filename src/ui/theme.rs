use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub win: Style,
    pub loss: Style,
}

impl Theme {
    /// Colors only when stdout is a terminal
    pub fn detect() -> Self {
        Self::with_color(console::Term::stdout().is_term())
    }

    pub fn with_color(enabled: bool) -> Self {
        let pick = |style: Style| if enabled { style } else { Style::new() };
        Self {
            header: pick(Style::new().cyan().bold()),
            success: pick(Style::new().green().bold()),
            warn: pick(Style::new().yellow().bold()),
            info: pick(Style::new().magenta()),
            dim: pick(Style::new().white().dimmed()),
            win: pick(Style::new().green()),
            loss: pick(Style::new().red()),
        }
    }

    /// Style for a win rate: green at 50% or better, red below
    pub fn for_rate(&self, rate: f64) -> &Style {
        if rate >= 50.0 { &self.win } else { &self.loss }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
