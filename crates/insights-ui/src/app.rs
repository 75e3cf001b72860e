//! Main application state and TUI event loop for Store Insights.
//!
//! [`App`] owns the theme, the shared dataset and the user's current store
//! filter and selections. Every interaction recomputes [`DashboardViews`]
//! from the dataset; nothing is patched incrementally.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use insights_core::formatting;
use insights_core::models::{CountMeasure, UnifiedDataset};
use insights_runtime::data::aggregator::SalesAggregator;
use insights_runtime::data::filter::StoreFilter;
use insights_runtime::views::{ranked_desc, DashboardViews};

use crate::chart_view;
use crate::components::filter_panel::FilterPanel;
use crate::components::header::Header;
use crate::table_view;
use crate::themes::Theme;

// ── Tab ───────────────────────────────────────────────────────────────────────

/// Dashboard tab currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Revenue,
    Categories,
    Ratings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Revenue, Tab::Categories, Tab::Ratings];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Revenue => "Revenue",
            Tab::Categories => "Sales by Category",
            Tab::Ratings => "Ratings",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Revenue => 0,
            Tab::Categories => 1,
            Tab::Ratings => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard TUI.
pub struct App {
    pub theme: Theme,
    /// Prefix used when formatting sale values.
    pub currency: String,
    dataset: Arc<UnifiedDataset>,
    /// Every store in the dataset, sorted; the filter panel lists these.
    stores: Vec<String>,
    categories: Vec<String>,
    products: Vec<String>,
    pub filter: StoreFilter,
    /// Filter panel entry under the cursor; 0 is "All stores".
    pub cursor: usize,
    category: Option<usize>,
    product: Option<usize>,
    pub tab: Tab,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    views: DashboardViews,
}

impl App {
    /// Build the dashboard over `dataset`.
    ///
    /// `category` and `product` preselect entries when they occur in the
    /// dataset; unknown names are ignored.
    pub fn new(
        theme_name: &str,
        currency: String,
        dataset: Arc<UnifiedDataset>,
        filter: StoreFilter,
        category: Option<&str>,
        product: Option<&str>,
    ) -> Self {
        let stores = SalesAggregator::stores(dataset.records());
        let categories = SalesAggregator::categories(dataset.records());
        let products = SalesAggregator::products(dataset.records());

        let category = position_of(&categories, category, "category");
        let product = position_of(&products, product, "product");

        let views = DashboardViews::compute(
            &dataset,
            &filter,
            category.map(|i| categories[i].as_str()),
            product.map(|i| products[i].as_str()),
        );

        Self {
            theme: Theme::from_name(theme_name),
            currency,
            dataset,
            stores,
            categories,
            products,
            filter,
            cursor: 0,
            category,
            product,
            tab: Tab::Revenue,
            should_quit: false,
            views,
        }
    }

    /// Views for the current filter and selections.
    pub fn views(&self) -> &DashboardViews {
        &self.views
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.category.map(|i| self.categories[i].as_str())
    }

    pub fn selected_product(&self) -> Option<&str> {
        self.product.map(|i| self.products[i].as_str())
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q` or `Ctrl+C`.
    ///
    /// Blocks the calling thread, polling `crossterm` events with a 250 ms
    /// timeout. Raw mode delivers `Ctrl+C` as a key event, so it is handled
    /// here rather than as a signal.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
            KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.previous(),
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => self.cursor = (self.cursor + 1).min(self.stores.len()),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_at_cursor(),
            KeyCode::Char('a') => self.set_filter(StoreFilter::AllStores),
            KeyCode::Char(']') => {
                self.category = cycle(self.category, self.categories.len(), true);
                self.recompute();
            }
            KeyCode::Char('[') => {
                self.category = cycle(self.category, self.categories.len(), false);
                self.recompute();
            }
            KeyCode::Char('.') => {
                self.product = cycle(self.product, self.products.len(), true);
                self.recompute();
            }
            KeyCode::Char(',') => {
                self.product = cycle(self.product, self.products.len(), false);
                self.recompute();
            }
            _ => {}
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn toggle_at_cursor(&mut self) {
        let next = match self.cursor {
            0 => StoreFilter::AllStores,
            i => match self.stores.get(i - 1) {
                Some(store) => self.filter.toggle(store, &self.stores),
                None => return,
            },
        };
        self.set_filter(next);
    }

    fn set_filter(&mut self, filter: StoreFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        self.views = DashboardViews::compute(
            &self.dataset,
            &self.filter,
            self.selected_category(),
            self.selected_product(),
        );
    }

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let filter_summary = self.filter.describe();
        let header = Header::new(&filter_summary, self.dataset.sources().len(), &self.theme);
        frame.render_widget(Paragraph::new(header.to_lines()), header_area);

        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.separator),
            );
        frame.render_widget(tabs, tabs_area);

        let [panel_area, content_area] =
            Layout::horizontal([Constraint::Length(26), Constraint::Min(0)]).areas(body_area);

        let panel = FilterPanel::new(&self.stores, &self.filter, self.cursor, &self.theme);
        frame.render_widget(
            Paragraph::new(panel.to_lines()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border)
                    .title(" Stores "),
            ),
            panel_area,
        );

        if self.views.is_empty() {
            table_view::render_no_data(frame, content_area, &self.theme);
        } else {
            match self.tab {
                Tab::Revenue => self.render_revenue(frame, content_area),
                Tab::Categories => self.render_categories(frame, content_area),
                Tab::Ratings => self.render_ratings(frame, content_area),
            }
        }

        let help = "Tab/←/→ tabs  ↑/↓ move  Space toggle  a all  [/] category  ,/. product  q quit";
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(help, self.theme.dim))),
            footer_area,
        );
    }

    fn render_revenue(&self, frame: &mut Frame, area: Rect) {
        let [summary_area, rest] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        let [table_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(rest);

        let units_label = match self.views.count_measure {
            CountMeasure::Quantity => "Units sold",
            CountMeasure::Rows => "Sales",
        };
        let summary = Line::from(vec![
            Span::styled("Total revenue: ", self.theme.label),
            Span::styled(
                formatting::format_currency(self.views.total_revenue, &self.currency),
                self.theme.value,
            ),
            Span::styled(format!("  |  {units_label}: "), self.theme.label),
            Span::styled(
                formatting::format_number(self.views.units as f64, 0),
                self.theme.value,
            ),
            Span::styled("  |  Rows: ", self.theme.label),
            Span::styled(
                formatting::format_number(self.views.rows as f64, 0),
                self.theme.value,
            ),
        ]);
        frame.render_widget(
            Paragraph::new(summary).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.table_border),
            ),
            summary_area,
        );

        let (rows, totals) = table_view::store_rows(&self.views);
        table_view::render_table_view(
            frame,
            table_area,
            "Revenue by Store",
            "Store",
            &rows,
            &totals,
            &self.currency,
            &self.theme,
        );

        let entries = ranked_desc(&self.views.revenue_by_store);
        chart_view::render_bar_panel(
            frame,
            chart_area,
            "Revenue by Store",
            &entries,
            |v| formatting::format_currency(v, &self.currency),
            &self.theme,
        );
    }

    fn render_categories(&self, frame: &mut Frame, area: Rect) {
        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Min(0)]).areas(area);
        let [table_area, chart_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(top);

        let (rows, totals) = table_view::category_rows(&self.views);
        table_view::render_table_view(
            frame,
            table_area,
            "Sales by Category",
            "Category",
            &rows,
            &totals,
            &self.currency,
            &self.theme,
        );

        let entries: Vec<(&str, f64)> = ranked_desc(&self.views.count_by_category)
            .into_iter()
            .map(|(c, n)| (c, n as f64))
            .collect();
        chart_view::render_bar_panel(
            frame,
            chart_area,
            "Units by Category",
            &entries,
            |v| formatting::format_number(v, 0),
            &self.theme,
        );

        match self.views.selected_category.as_deref() {
            Some(category) => {
                let (rows, totals) = table_view::breakdown_rows(&self.views);
                table_view::render_table_view(
                    frame,
                    bottom,
                    &format!("{category} by Store"),
                    "Store",
                    &rows,
                    &totals,
                    &self.currency,
                    &self.theme,
                );
            }
            None => render_hint(frame, bottom, "Press [ or ] to pick a category", &self.theme),
        }
    }

    fn render_ratings(&self, frame: &mut Frame, area: Rect) {
        let [charts, table_area] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Min(0)]).areas(area);
        let [overall_area, product_area] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(charts);

        chart_view::render_rating_chart(
            frame,
            overall_area,
            "Rating Distribution",
            &self.views.rating_distribution,
            &self.theme,
        );

        match self.views.selected_product.as_deref() {
            Some(product) => chart_view::render_rating_chart(
                frame,
                product_area,
                &format!("Ratings: {product}"),
                &self.views.product_ratings,
                &self.theme,
            ),
            None => render_hint(frame, product_area, "Press , or . to pick a product", &self.theme),
        }

        table_view::render_rating_table(
            frame,
            table_area,
            &self.views.mean_rating_by_product,
            self.views.selected_product.as_deref(),
            &self.theme,
        );
    }
}

fn render_hint(frame: &mut Frame, area: Rect, hint: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(hint, theme.dim))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border),
        ),
        area,
    );
}

/// Index of `name` in `names`, warning when a requested name is absent.
fn position_of(names: &[String], name: Option<&str>, kind: &str) -> Option<usize> {
    let name = name?;
    let found = names.iter().position(|n| n == name);
    if found.is_none() {
        tracing::warn!(kind, name, "selection not found in dataset");
    }
    found
}

/// Step a selection through `0..len`, passing through "nothing selected"
/// between the last and first entries.
fn cycle(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (current, forward) {
        (None, true) => Some(0),
        (Some(i), true) if i + 1 < len => Some(i + 1),
        (Some(_), true) => None,
        (None, false) => Some(len - 1),
        (Some(0), false) => None,
        (Some(i), false) => Some(i - 1),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::models::{Rating, SaleRecord, SourceSummary};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn sale(store: &str, product: &str, category: &str, value: f64, rating: u8) -> SaleRecord {
        SaleRecord {
            store: store.to_string(),
            product: product.to_string(),
            category: category.to_string(),
            sale_value: value,
            quantity: None,
            rating: Rating::new(rating),
        }
    }

    fn dataset() -> Arc<UnifiedDataset> {
        let records = vec![
            sale("Loja 1", "Geladeira", "eletrodomesticos", 2_000.0, 5),
            sale("Loja 1", "Fone", "eletronicos", 100.0, 4),
            sale("Loja 2", "Mesa", "moveis", 400.0, 3),
            sale("Loja 3", "Fone", "eletronicos", 120.0, 2),
        ];
        let sources = ["loja_1.csv", "loja_2.csv", "loja_3.csv"]
            .iter()
            .map(|p| SourceSummary {
                path: PathBuf::from(p),
                injected_store: None,
                rows: 1,
                legacy_value_column: false,
                has_quantity: false,
                has_rating: true,
            })
            .collect();
        Arc::new(UnifiedDataset::new(records, sources))
    }

    fn app() -> App {
        App::new(
            "dark",
            "$".to_string(),
            dataset(),
            StoreFilter::AllStores,
            None,
            None,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
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

    // ── Tab ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_cycles_both_ways() {
        assert_eq!(Tab::Revenue.next(), Tab::Categories);
        assert_eq!(Tab::Ratings.next(), Tab::Revenue);
        assert_eq!(Tab::Revenue.previous(), Tab::Ratings);
    }

    // ── App::new ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_creation_defaults() {
        let app = app();
        assert_eq!(app.tab, Tab::Revenue);
        assert_eq!(app.cursor, 0);
        assert!(app.filter.is_all());
        assert!(!app.should_quit);
        assert_eq!(app.views().rows, 4);
        assert_eq!(app.views().count_measure, CountMeasure::Rows);
    }

    #[test]
    fn test_app_preselects_known_category_and_ignores_unknown_product() {
        let app = App::new(
            "light",
            "R$ ".to_string(),
            dataset(),
            StoreFilter::AllStores,
            Some("eletronicos"),
            Some("Sofa"),
        );
        assert_eq!(app.selected_category(), Some("eletronicos"));
        assert_eq!(app.selected_product(), None);
        assert_eq!(app.views().category_breakdown.len(), 2);
    }

    // ── handle_key ────────────────────────────────────────────────────────────

    #[test]
    fn test_quit_keys() {
        let mut a = app();
        press(&mut a, KeyCode::Char('q'));
        assert!(a.should_quit);

        let mut b = app();
        b.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(b.should_quit);
    }

    #[test]
    fn test_tab_keys_switch_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Categories);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.tab, Tab::Ratings);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.tab, Tab::Categories);
    }

    #[test]
    fn test_cursor_is_bounded() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn test_toggle_from_all_stores_keeps_others() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(app.filter, StoreFilter::specific(["Loja 2", "Loja 3"]));
        assert_eq!(app.views().rows, 2);
        assert!((app.views().total_revenue - 520.0).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_every_store_off_shows_empty_views() {
        let mut app = app();
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Char(' '));
        }
        // Loja 1 deselected from AllStores, then Loja 2 and Loja 3 toggled off.
        assert_eq!(app.filter, StoreFilter::specific(Vec::<String>::new()));
        assert!(app.views().is_empty());
    }

    #[test]
    fn test_all_stores_entry_and_select_all_key_restore_sentinel() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.filter.is_all());

        press(&mut app, KeyCode::Char('a'));
        assert!(app.filter.is_all());

        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.filter.is_all());
        assert_eq!(app.views().rows, 4);
    }

    #[test]
    fn test_category_and_product_cycling() {
        let mut app = app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.selected_category(), Some("eletrodomesticos"));
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.selected_category(), None);
        press(&mut app, KeyCode::Char('['));
        assert_eq!(app.selected_category(), Some("moveis"));
        assert_eq!(app.views().selected_category.as_deref(), Some("moveis"));

        press(&mut app, KeyCode::Char('.'));
        assert_eq!(app.selected_product(), Some("Fone"));
        assert_eq!(app.views().product_ratings.values().sum::<u64>(), 2);
        press(&mut app, KeyCode::Char(','));
        assert_eq!(app.selected_product(), None);
    }

    #[test]
    fn test_cycle_helper() {
        assert_eq!(cycle(None, 0, true), None);
        assert_eq!(cycle(None, 2, true), Some(0));
        assert_eq!(cycle(Some(0), 2, true), Some(1));
        assert_eq!(cycle(Some(1), 2, true), None);
        assert_eq!(cycle(None, 2, false), Some(1));
        assert_eq!(cycle(Some(1), 2, false), Some(0));
        assert_eq!(cycle(Some(0), 2, false), None);
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_every_tab() {
        let backend = TestBackend::new(120, 36);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = app();
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char('.'));

        terminal.draw(|f| app.render(f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("STORE INSIGHTS"));
        assert!(text.contains("All stores"));
        assert!(text.contains("Total revenue: $2,620.00"));

        press(&mut app, KeyCode::Tab);
        terminal.draw(|f| app.render(f)).unwrap();
        assert!(buffer_text(&terminal).contains("eletrodomesticos by Store"));

        press(&mut app, KeyCode::Tab);
        terminal.draw(|f| app.render(f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Rating Distribution"));
        assert!(text.contains("Mean Rating by Product"));
    }

    #[test]
    fn test_render_empty_selection_shows_placeholder() {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let app = App::new(
            "classic",
            "$".to_string(),
            dataset(),
            StoreFilter::specific(Vec::<String>::new()),
            None,
            None,
        );

        terminal.draw(|f| app.render(f)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("No stores"));
        assert!(text.contains("No sales match"));
    }
}
