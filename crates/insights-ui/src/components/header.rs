use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative marker placed either side of the application title.
pub const MARKERS: &str = "◆ ◇ ◆";

/// Dashboard header rendering four lines:
///
/// 1. Application title between markers (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Store filter and source count in `[ filter | N sources ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Human-readable store filter, e.g. "All stores" or "Loja 1, Loja 3".
    pub filter: &'a str,
    /// Number of CSV sources in the loaded dataset.
    pub sources: usize,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(filter: &'a str, sources: usize, theme: &'a Theme) -> Self {
        Self {
            filter,
            sources,
            theme,
        }
    }

    /// Render the header as exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let noun = if self.sources == 1 { "source" } else { "sources" };

        vec![
            Line::from(vec![
                Span::styled(MARKERS, self.theme.header_accent),
                Span::styled(" STORE INSIGHTS ", self.theme.header),
                Span::styled(MARKERS, self.theme.header_accent),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.filter, self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(format!("{} {}", self.sources, noun), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
