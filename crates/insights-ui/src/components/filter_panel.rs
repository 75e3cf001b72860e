use crate::themes::Theme;
use insights_runtime::data::filter::StoreFilter;
use ratatui::text::{Line, Span};

/// Label of the first panel entry, which restores [`StoreFilter::AllStores`].
pub const ALL_STORES_LABEL: &str = "All stores";

/// Store checklist shown beside every tab.
///
/// Entry 0 is the "All stores" choice; entry `i + 1` is `stores[i]`. The
/// "All stores" box is only checked for the `AllStores` filter, never for an
/// explicit selection that happens to contain every store.
pub struct FilterPanel<'a> {
    pub stores: &'a [String],
    pub filter: &'a StoreFilter,
    /// Highlighted entry index.
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl<'a> FilterPanel<'a> {
    pub fn new(
        stores: &'a [String],
        filter: &'a StoreFilter,
        cursor: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            stores,
            filter,
            cursor,
            theme,
        }
    }

    /// Number of entries including "All stores".
    pub fn entry_count(&self) -> usize {
        self.stores.len() + 1
    }

    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let all = std::iter::once((ALL_STORES_LABEL, self.filter.is_all()));
        let stores = self
            .stores
            .iter()
            .map(|s| (s.as_str(), !self.filter.is_all() && self.filter.includes(s)));

        all.chain(stores)
            .enumerate()
            .map(|(i, (label, checked))| self.entry_line(i, label, checked))
            .collect()
    }

    fn entry_line(&self, index: usize, label: &'a str, checked: bool) -> Line<'a> {
        let (mark, mark_style) = if checked {
            ("[x] ", self.theme.checked)
        } else {
            ("[ ] ", self.theme.dim)
        };
        let line = Line::from(vec![
            Span::styled(mark, mark_style),
            Span::styled(label, self.theme.text),
        ]);
        if index == self.cursor {
            line.style(self.theme.cursor)
        } else {
            line
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
