use crate::themes::Theme;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Visual settings of a horizontal bar.
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// Columns reserved for the label before the bar.
    pub label_width: usize,
    /// Columns of the bar itself.
    pub width: u16,
    pub filled_char: char,
    pub empty_char: char,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            label_width: 16,
            width: 30,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

// ── HorizontalBar ────────────────────────────────────────────────────────────

/// One labelled bar scaled against the largest value of its chart.
///
/// Renders as `label  ████░░░░ value_text`. The label is padded or cut to
/// `label_width` display columns so bars line up under wide characters.
pub struct HorizontalBar<'a> {
    pub label: &'a str,
    /// Share of the chart maximum, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    /// Pre-formatted value shown after the bar.
    pub value_text: String,
    pub theme: &'a Theme,
    pub config: BarConfig,
}

impl<'a> HorizontalBar<'a> {
    pub fn new(label: &'a str, value: f64, max: f64, value_text: String, theme: &'a Theme) -> Self {
        let percentage = if max > 0.0 {
            (value / max * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            label,
            percentage,
            value_text,
            theme,
            config: BarConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BarConfig) -> Self {
        self.config = config;
        self
    }

    pub fn to_line(&self) -> Line<'a> {
        let filled = ((self.percentage / 100.0) * self.config.width as f64).round() as u16;
        let filled = filled.min(self.config.width);
        let empty = self.config.width - filled;

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(
                fit_to_width(self.label, self.config.label_width),
                self.theme.bar_label,
            ),
            Span::raw(" "),
            Span::styled(filled_str, self.theme.bar_style(self.percentage)),
            Span::styled(empty_str, self.theme.bar_empty),
            Span::styled(format!(" {}", self.value_text), self.theme.value),
        ])
    }
}

/// One bar line per `(label, value)` entry, scaled to the largest value.
pub fn bar_lines<'a, F>(
    entries: &[(&'a str, f64)],
    format_value: F,
    config: &BarConfig,
    theme: &'a Theme,
) -> Vec<Line<'a>>
where
    F: Fn(f64) -> String,
{
    let max = entries.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    entries
        .iter()
        .map(|&(label, value)| {
            HorizontalBar::new(label, value, max, format_value(value), theme)
                .with_config(config.clone())
                .to_line()
        })
        .collect()
}

/// Pad `text` with spaces, or cut it with a trailing `…`, to exactly `width`
/// display columns.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    if current <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - current));
        return out;
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_bar_percentage_scaled_to_max() {
        let theme = Theme::dark();
        let bar = HorizontalBar::new("Loja 1", 50.0, 200.0, "50".into(), &theme);
        assert!((bar.percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_bar_zero_max_is_empty() {
        let theme = Theme::dark();
        let bar = HorizontalBar::new("Loja 1", 0.0, 0.0, "0".into(), &theme);
        assert_eq!(bar.percentage, 0.0);
        let line = bar.to_line();
        assert!(!text(&line).contains('█'));
    }

    #[test]
    fn test_bar_line_widths() {
        let theme = Theme::dark();
        let config = BarConfig {
            label_width: 8,
            width: 10,
            ..BarConfig::default()
        };
        let line = HorizontalBar::new("Loja 1", 30.0, 60.0, "$30.00".into(), &theme)
            .with_config(config)
            .to_line();

        assert_eq!(line.spans.len(), 5);
        assert_eq!(line.spans[0].content, "Loja 1  ");
        assert_eq!(line.spans[2].content.chars().count(), 5);
        assert_eq!(line.spans[3].content.chars().count(), 5);
        assert!(text(&line).ends_with(" $30.00"));
    }

    #[test]
    fn test_bar_lines_largest_is_full() {
        let theme = Theme::dark();
        let config = BarConfig {
            width: 4,
            ..BarConfig::default()
        };
        let lines = bar_lines(
            &[("a", 10.0), ("b", 40.0)],
            |v| format!("{v}"),
            &config,
            &theme,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[2].content, "████");
        assert_eq!(lines[0].spans[2].content, "█");
    }

    #[test]
    fn test_fit_to_width_pads_and_truncates() {
        assert_eq!(fit_to_width("abc", 5), "abc  ");
        assert_eq!(fit_to_width("abcdef", 4), "abc…");
        assert_eq!(fit_to_width("abc", 0), "");
    }

    #[test]
    fn test_fit_to_width_counts_display_columns() {
        // Each CJK character occupies two columns.
        let fitted = fit_to_width("店舗店舗", 5);
        assert_eq!(UnicodeWidthStr::width(fitted.as_str()), 5);
        assert!(fitted.ends_with('…') || fitted.ends_with(' '));
    }
}
