//! Per-interaction dashboard snapshot.
//!
//! Every filter change or selection change calls [`DashboardViews::compute`]
//! again over the shared dataset. Nothing here is cached.

use std::collections::BTreeMap;

use insights_core::models::{CountMeasure, Rating, UnifiedDataset};
use insights_data::aggregator::{ProductRating, SalesAggregator, StoreBreakdown};
use insights_data::filter::{filter_by_store, StoreFilter};
use serde::Serialize;

/// Every aggregate view for one filter and selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub filter: StoreFilter,
    pub count_measure: CountMeasure,
    /// Number of sale rows in the selection.
    pub rows: usize,
    /// Units sold (or rows) under the dataset's count measure.
    pub units: u64,
    pub total_revenue: f64,
    pub revenue_by_store: BTreeMap<String, f64>,
    pub count_by_category: BTreeMap<String, u64>,
    pub revenue_by_category: BTreeMap<String, f64>,
    pub selected_category: Option<String>,
    /// Per-store sales of `selected_category`; empty without a selection.
    pub category_breakdown: BTreeMap<String, StoreBreakdown>,
    pub rating_distribution: BTreeMap<Rating, u64>,
    pub mean_rating_by_product: Vec<ProductRating>,
    pub selected_product: Option<String>,
    /// Rating distribution of `selected_product`; empty without a selection.
    pub product_ratings: BTreeMap<Rating, u64>,
}

impl DashboardViews {
    /// Recompute every view from `dataset` restricted to `filter`.
    pub fn compute(
        dataset: &UnifiedDataset,
        filter: &StoreFilter,
        selected_category: Option<&str>,
        selected_product: Option<&str>,
    ) -> Self {
        let measure = dataset.count_measure();
        let selection = filter_by_store(dataset.records(), filter);
        let records = || selection.iter().copied();

        let category_breakdown = selected_category
            .map(|c| SalesAggregator::breakdown_by_store_for_category(records(), c, measure))
            .unwrap_or_default();
        let product_ratings = selected_product
            .map(|p| SalesAggregator::ratings_for_product(records(), p))
            .unwrap_or_default();

        let views = Self {
            filter: filter.clone(),
            count_measure: measure,
            rows: selection.len(),
            units: SalesAggregator::record_count(records(), measure),
            total_revenue: SalesAggregator::total_revenue(records()),
            revenue_by_store: SalesAggregator::revenue_by_store(records()),
            count_by_category: SalesAggregator::count_by_category(records(), measure),
            revenue_by_category: SalesAggregator::revenue_by_category(records()),
            selected_category: selected_category.map(str::to_string),
            category_breakdown,
            rating_distribution: SalesAggregator::rating_distribution(records()),
            mean_rating_by_product: SalesAggregator::mean_rating_by_product(records()),
            selected_product: selected_product.map(str::to_string),
            product_ratings,
        };
        tracing::debug!(
            filter = %filter.describe(),
            rows = views.rows,
            "views recomputed"
        );
        views
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Entries of `map` ordered by value, largest first; equal values keep key
/// order.
pub fn ranked_desc<V>(map: &BTreeMap<String, V>) -> Vec<(&str, V)>
where
    V: Copy + PartialOrd,
{
    let mut entries: Vec<(&str, V)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

/// Names in an explicit selection that do not occur in `dataset`.
pub fn unknown_stores(dataset: &UnifiedDataset, filter: &StoreFilter) -> Vec<String> {
    match filter {
        StoreFilter::AllStores => Vec::new(),
        StoreFilter::SpecificStores(selected) => {
            let known = SalesAggregator::stores(dataset.records());
            selected
                .iter()
                .filter(|s| !known.contains(s))
                .cloned()
                .collect()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
