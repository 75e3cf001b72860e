//! Bar charts for the dashboard tabs.
//!
//! Revenue and unit totals use label-aligned horizontal bars; rating
//! distributions use a vertical [`BarChart`] with buckets in ascending order.

use std::collections::BTreeMap;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use insights_core::models::Rating;

use crate::components::bar::{bar_lines, BarConfig};
use crate::themes::Theme;

/// Columns kept free for the value printed after each bar.
const VALUE_COLUMNS: u16 = 16;

/// Bar geometry that fits `area` once borders and the value column are
/// taken out.
fn bar_config_for(area: Rect) -> BarConfig {
    let inner = area.width.saturating_sub(2);
    let label_width = (inner / 3).min(18);
    BarConfig {
        label_width: label_width as usize,
        width: inner.saturating_sub(label_width + 1 + VALUE_COLUMNS).max(1),
        ..BarConfig::default()
    }
}

/// Render one horizontal bar per entry, scaled to the largest entry.
pub fn render_bar_panel<F>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[(&str, f64)],
    format_value: F,
    theme: &Theme,
) where
    F: Fn(f64) -> String,
{
    let lines = if entries.is_empty() {
        vec![Line::from(Span::styled("Nothing to chart", theme.dim))]
    } else {
        bar_lines(entries, format_value, &bar_config_for(area), theme)
    };

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        ),
        area,
    );
}

/// Bars of a rating distribution, lowest rating first.
pub fn rating_bars<'a>(distribution: &BTreeMap<Rating, u64>, theme: &Theme) -> Vec<Bar<'a>> {
    distribution
        .iter()
        .map(|(rating, count)| {
            Bar::default()
                .value(*count)
                .label(Line::from(format!("{}★", rating.value())))
                .text_value(count.to_string())
                .style(theme.rating_style(f64::from(rating.value())))
        })
        .collect()
}

/// Render a rating distribution as a vertical bar chart.
pub fn render_rating_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    distribution: &BTreeMap<Rating, u64>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.table_border)
        .title(format!(" {} ", title));

    if distribution.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("No ratings in this selection", theme.dim)))
                .block(block),
            area,
        );
        return;
    }

    let bars = rating_bars(distribution, theme);
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(2)
        .value_style(theme.value);

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
