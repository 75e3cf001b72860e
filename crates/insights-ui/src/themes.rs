use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  Absent or unparseable
/// values count as dark.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Every style the dashboard widgets use.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub warning: Style,

    // ── Tabs and filter panel ────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,
    /// Row under the filter cursor.
    pub cursor: Style,
    /// Checkbox of a selected store.
    pub checked: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    /// Bars whose share of the largest value is below 50 %.
    pub bar_low: Style,
    /// Bars between 50 % and 80 % of the largest value.
    pub bar_medium: Style,
    /// Bars at or above 80 % of the largest value.
    pub bar_high: Style,
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Ratings ──────────────────────────────────────────────────────────────
    pub rating_poor: Style,
    pub rating_fair: Style,
    pub rating_good: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            checked: Style::default().fg(Color::Green),

            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            rating_poor: Style::default().fg(Color::Red),
            rating_fair: Style::default().fg(Color::Yellow),
            rating_good: Style::default().fg(Color::Green),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            checked: Style::default().fg(Color::Green),

            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Magenta),
            bar_high: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            rating_poor: Style::default().fg(Color::Red),
            rating_fair: Style::default().fg(Color::Yellow),
            rating_good: Style::default().fg(Color::Green),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Basic 8-colour ANSI palette without bold modifiers.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default().fg(Color::Yellow),
            tab_inactive: Style::default().fg(Color::White),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            checked: Style::default().fg(Color::Green),

            bar_low: Style::default().fg(Color::Blue),
            bar_medium: Style::default().fg(Color::Cyan),
            bar_high: Style::default().fg(Color::Green),
            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::White),

            rating_poor: Style::default().fg(Color::Red),
            rating_fair: Style::default().fg(Color::Yellow),
            rating_good: Style::default().fg(Color::Green),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar fill style for a bar at `percentage` of the largest bar.
    ///
    /// * `< 50 %`  → `bar_low`
    /// * `50–80 %` → `bar_medium`
    /// * `≥ 80 %`  → `bar_high`
    pub fn bar_style(&self, percentage: f64) -> Style {
        if percentage >= 80.0 {
            self.bar_high
        } else if percentage >= 50.0 {
            self.bar_medium
        } else {
            self.bar_low
        }
    }

    /// Colour for a (possibly averaged) rating: below 3 is poor, below 4 fair.
    pub fn rating_style(&self, rating: f64) -> Style {
        if rating >= 4.0 {
            self.rating_good
        } else if rating >= 3.0 {
            self.rating_fair
        } else {
            self.rating_poor
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
