//! Tabular breakdowns for the dashboard tabs.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per store or
//! category plus a highlighted totals row at the bottom, and the per-product
//! mean rating table of the Ratings tab.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use insights_core::formatting;
use insights_core::models::Rating;
use insights_runtime::data::aggregator::ProductRating;
use insights_runtime::views::{ranked_desc, DashboardViews};

use crate::themes::Theme;

/// One row of a revenue table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    /// Store or category name.
    pub label: String,
    /// Units sold; `None` for tables without a count column.
    pub count: Option<u64>,
    pub revenue: f64,
}

/// Totals shown under a revenue table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTotals {
    pub count: Option<u64>,
    pub revenue: f64,
    /// Number of data rows.
    pub entries: usize,
}

impl TableTotals {
    fn of(rows: &[TableRowData]) -> Self {
        // No count column unless every row has one.
        let count = if rows.is_empty() {
            None
        } else {
            rows.iter()
                .map(|r| r.count)
                .try_fold(0_u64, |acc, c| c.map(|c| acc + c))
        };
        Self {
            count,
            revenue: rows.iter().map(|r| r.revenue).sum(),
            entries: rows.len(),
        }
    }
}

// ── Row builders ──────────────────────────────────────────────────────────────

/// Revenue per store, highest first.
pub fn store_rows(views: &DashboardViews) -> (Vec<TableRowData>, TableTotals) {
    let rows: Vec<TableRowData> = ranked_desc(&views.revenue_by_store)
        .into_iter()
        .map(|(store, revenue)| TableRowData {
            label: store.to_string(),
            count: None,
            revenue,
        })
        .collect();
    let totals = TableTotals::of(&rows);
    (rows, totals)
}

/// Units and revenue per category, most units first.
pub fn category_rows(views: &DashboardViews) -> (Vec<TableRowData>, TableTotals) {
    let rows: Vec<TableRowData> = ranked_desc(&views.count_by_category)
        .into_iter()
        .map(|(category, count)| TableRowData {
            label: category.to_string(),
            count: Some(count),
            revenue: views
                .revenue_by_category
                .get(category)
                .copied()
                .unwrap_or(0.0),
        })
        .collect();
    let totals = TableTotals::of(&rows);
    (rows, totals)
}

/// Per-store sales of the selected category, in store order.
pub fn breakdown_rows(views: &DashboardViews) -> (Vec<TableRowData>, TableTotals) {
    let rows: Vec<TableRowData> = views
        .category_breakdown
        .iter()
        .map(|(store, b)| TableRowData {
            label: store.clone(),
            count: Some(b.count),
            revenue: b.revenue,
        })
        .collect();
    let totals = TableTotals::of(&rows);
    (rows, totals)
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render a revenue table into `area`.
///
/// Columns are the label, the unit count when the rows carry one, the
/// revenue and its share of the table total.
#[allow(clippy::too_many_arguments)]
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    label_header: &str,
    rows: &[TableRowData],
    totals: &TableTotals,
    currency: &str,
    theme: &Theme,
) {
    let with_count = totals.count.is_some();

    let mut headers = vec![label_header];
    if with_count {
        headers.push("Units");
    }
    headers.extend(["Revenue", "Share"]);
    let header = Row::new(
        headers
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let share = formatting::percentage(row.revenue, totals.revenue, 1);
            let mut cells = vec![Cell::from(row.label.clone())];
            if with_count {
                cells.push(Cell::from(formatting::format_number(
                    row.count.unwrap_or(0) as f64,
                    0,
                )));
            }
            cells.push(Cell::from(formatting::format_currency(row.revenue, currency)));
            cells.push(Cell::from(format!("{share:.1}%")));
            Row::new(cells).style(style)
        })
        .collect();

    let mut total_cells = vec![Cell::from("TOTAL").style(theme.table_total)];
    if let Some(count) = totals.count {
        total_cells.push(Cell::from(formatting::format_number(count as f64, 0)));
    }
    total_cells.push(Cell::from(formatting::format_currency(
        totals.revenue,
        currency,
    )));
    total_cells.push(Cell::from(format!("{} rows", totals.entries)));
    let total_row = Row::new(total_cells).style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let mut widths = vec![Constraint::Min(14)];
    if with_count {
        widths.push(Constraint::Length(10));
    }
    widths.extend([Constraint::Length(16), Constraint::Length(9)]);

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the mean rating per product, best first.
pub fn render_rating_table(
    frame: &mut Frame,
    area: Rect,
    ratings: &[ProductRating],
    selected_product: Option<&str>,
    theme: &Theme,
) {
    let header = Row::new(
        ["Product", "Mean", "Stars", "Ratings"]
            .into_iter()
            .map(|h| Cell::from(h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = ratings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let style = if selected_product == Some(r.product.as_str()) {
                theme.cursor
            } else if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let stars = Rating::new(r.mean.round() as u8)
                .map(formatting::format_stars)
                .unwrap_or_default();
            Row::new(vec![
                Cell::from(r.product.clone()),
                Cell::from(formatting::format_number(r.mean, 2)),
                Cell::from(stars).style(theme.rating_style(r.mean)),
                Cell::from(formatting::format_number(r.ratings as f64, 0)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Mean Rating by Product "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a "no data" placeholder when the store filter selects no sales.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales match the current filter", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Tick stores in the filter panel or press 'a' for all stores.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Store Insights "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::{SaleRecord, SourceSummary, UnifiedDataset};
    use insights_runtime::data::filter::StoreFilter;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::path::PathBuf;

    fn sale(store: &str, product: &str, category: &str, value: f64, qty: u64, rating: u8) -> SaleRecord {
        SaleRecord {
            store: store.to_string(),
            product: product.to_string(),
            category: category.to_string(),
            sale_value: value,
            quantity: Some(qty),
            rating: Rating::new(rating),
        }
    }

    fn views(category: Option<&str>) -> DashboardViews {
        let records = vec![
            sale("Loja 1", "Geladeira", "eletrodomesticos", 2_000.0, 1, 5),
            sale("Loja 1", "Fone", "eletronicos", 100.0, 3, 4),
            sale("Loja 2", "Geladeira", "eletrodomesticos", 1_800.0, 2, 3),
            sale("Loja 2", "Mesa", "moveis", 400.0, 1, 2),
        ];
        let sources = vec![SourceSummary {
            path: PathBuf::from("vendas.csv"),
            injected_store: None,
            rows: 4,
            legacy_value_column: false,
            has_quantity: true,
            has_rating: true,
        }];
        let ds = UnifiedDataset::new(records, sources);
        DashboardViews::compute(&ds, &StoreFilter::AllStores, category, None)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ── Row builders ──────────────────────────────────────────────────────────

    #[test]
    fn test_store_rows_ranked_by_revenue() {
        let (rows, totals) = store_rows(&views(None));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Loja 2");
        assert!((rows[0].revenue - 2_200.0).abs() < 1e-9);
        assert_eq!(totals.count, None);
        assert!((totals.revenue - 4_300.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_rows_carry_units_and_revenue() {
        let (rows, totals) = category_rows(&views(None));
        assert_eq!(rows[0].label, "eletrodomesticos");
        assert_eq!(rows[0].count, Some(3));
        assert!((rows[0].revenue - 3_800.0).abs() < 1e-9);
        assert_eq!(totals.count, Some(7));
        assert_eq!(totals.entries, 3);
    }

    #[test]
    fn test_breakdown_rows_empty_without_selection() {
        let (rows, totals) = breakdown_rows(&views(None));
        assert!(rows.is_empty());
        assert_eq!(totals.revenue, 0.0);
    }

    #[test]
    fn test_breakdown_rows_for_category() {
        let (rows, totals) = breakdown_rows(&views(Some("eletrodomesticos")));
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Loja 1", "Loja 2"]);
        assert_eq!(totals.count, Some(3));
    }

    // ── Render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_store_table_shows_currency_and_total() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let (rows, totals) = store_rows(&views(None));

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Revenue by Store", "Store", &rows, &totals, "R$ ", &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Revenue by Store"));
        assert!(text.contains("R$ 2,200.00"));
        assert!(text.contains("TOTAL"));
        assert!(text.contains("51.2%"));
    }

    #[test]
    fn test_render_category_table_has_units_column() {
        let backend = TestBackend::new(90, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::light();
        let (rows, totals) = category_rows(&views(None));

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Sales by Category", "Category", &rows, &totals, "$", &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Units"));
    }

    #[test]
    fn test_render_empty_table_does_not_panic() {
        let backend = TestBackend::new(80, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let totals = TableTotals::of(&[]);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_table_view(frame, area, "Empty", "Store", &[], &totals, "$", &theme);
            })
            .unwrap();
    }

    #[test]
    fn test_render_rating_table() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let v = views(None);

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_rating_table(frame, area, &v.mean_rating_by_product, Some("Fone"), &theme);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Geladeira"));
        assert!(text.contains("4.00"));
        assert!(text.contains("★★★★☆"));
    }

    #[test]
    fn test_render_no_data_does_not_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_no_data(frame, area, &theme);
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("No sales match"));
    }
}
