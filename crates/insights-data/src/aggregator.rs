//! Grouped summaries over sale records.
//!
//! Every function takes any iterator of `&SaleRecord`, so the same code runs
//! over a whole dataset (`dataset.records()`) or over a filtered selection
//! (`filtered.iter().copied()`). Results use ordered maps so repeated runs
//! produce identical output.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::AddAssign;

use insights_core::models::{CountMeasure, Rating, SaleRecord};
use serde::Serialize;

// ── Result types ──────────────────────────────────────────────────────────────

/// Sales of one category at one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StoreBreakdown {
    /// Units sold or rows, depending on the dataset's count measure.
    pub count: u64,
    pub revenue: f64,
}

impl AddAssign for StoreBreakdown {
    fn add_assign(&mut self, other: Self) {
        self.count += other.count;
        self.revenue += other.revenue;
    }
}

/// Average customer rating of one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRating {
    pub product: String,
    pub mean: f64,
    /// Number of rated sales behind the mean.
    pub ratings: u64,
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups sale records by dimension.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Sum of sale values.
    pub fn total_revenue<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> f64 {
        records.into_iter().map(|r| r.sale_value).sum()
    }

    /// Units sold (or rows) under `measure`.
    pub fn record_count<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
        measure: CountMeasure,
    ) -> u64 {
        records.into_iter().map(|r| measure.units(r)).sum()
    }

    /// Revenue per store; keys are the stores seen in `records`.
    pub fn revenue_by_store<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
    ) -> BTreeMap<String, f64> {
        sum_by_key(records, |r| r.store.as_str(), |r| r.sale_value)
    }

    pub fn revenue_by_category<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
    ) -> BTreeMap<String, f64> {
        sum_by_key(records, |r| r.category.as_str(), |r| r.sale_value)
    }

    /// Units sold per category, or rows per category under
    /// [`CountMeasure::Rows`].
    pub fn count_by_category<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
        measure: CountMeasure,
    ) -> BTreeMap<String, u64> {
        sum_by_key(records, |r| r.category.as_str(), |r| measure.units(r))
    }

    /// Count and revenue per store for one category.
    ///
    /// An unknown category yields an empty map.
    pub fn breakdown_by_store_for_category<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
        category: &str,
        measure: CountMeasure,
    ) -> BTreeMap<String, StoreBreakdown> {
        sum_by_key(
            records.into_iter().filter(|r| r.category == category),
            |r| r.store.as_str(),
            |r| StoreBreakdown {
                count: measure.units(r),
                revenue: r.sale_value,
            },
        )
    }

    /// Number of sales per rating, ascending by rating. Unrated sales are
    /// skipped.
    pub fn rating_distribution<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
    ) -> BTreeMap<Rating, u64> {
        let mut counts: HashMap<Rating, u64> = HashMap::new();
        for rating in records.into_iter().filter_map(|r| r.rating) {
            *counts.entry(rating).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Rating distribution of a single product.
    pub fn ratings_for_product<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
        product: &str,
    ) -> BTreeMap<Rating, u64> {
        Self::rating_distribution(records.into_iter().filter(|r| r.product == product))
    }

    /// Mean rating per product, highest first; equal means are ordered by
    /// product name. Products without any rated sale are left out.
    pub fn mean_rating_by_product<'a>(
        records: impl IntoIterator<Item = &'a SaleRecord>,
    ) -> Vec<ProductRating> {
        let mut sums: HashMap<&'a str, (u64, u64)> = HashMap::new();
        for record in records {
            if let Some(rating) = record.rating {
                let (total, n) = sums.entry(record.product.as_str()).or_default();
                *total += u64::from(rating.value());
                *n += 1;
            }
        }

        let mut means: Vec<ProductRating> = sums
            .into_iter()
            .map(|(product, (total, n))| ProductRating {
                product: product.to_string(),
                mean: total as f64 / n as f64,
                ratings: n,
            })
            .collect();
        means.sort_by(|a, b| {
            b.mean
                .total_cmp(&a.mean)
                .then_with(|| a.product.cmp(&b.product))
        });
        means
    }

    // ── Dimension values for selectors ────────────────────────────────────────

    /// Distinct store names, sorted.
    pub fn stores<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Vec<String> {
        distinct(records, |r| r.store.as_str())
    }

    /// Distinct categories, sorted.
    pub fn categories<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Vec<String> {
        distinct(records, |r| r.category.as_str())
    }

    /// Distinct product names, sorted.
    pub fn products<'a>(records: impl IntoIterator<Item = &'a SaleRecord>) -> Vec<String> {
        distinct(records, |r| r.product.as_str())
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Hash-group `records` by `key` and accumulate `value` per group.
fn sum_by_key<'a, V>(
    records: impl IntoIterator<Item = &'a SaleRecord>,
    key: impl Fn(&'a SaleRecord) -> &'a str,
    value: impl Fn(&'a SaleRecord) -> V,
) -> BTreeMap<String, V>
where
    V: AddAssign + Default,
{
    let mut groups: HashMap<&'a str, V> = HashMap::new();
    for record in records {
        *groups.entry(key(record)).or_default() += value(record);
    }
    groups
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn distinct<'a>(
    records: impl IntoIterator<Item = &'a SaleRecord>,
    key: impl Fn(&'a SaleRecord) -> &'a str,
) -> Vec<String> {
    records
        .into_iter()
        .map(key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_by_store, StoreFilter};

    fn sale(
        store: &str,
        product: &str,
        category: &str,
        value: f64,
        quantity: Option<u64>,
        rating: Option<u8>,
    ) -> SaleRecord {
        SaleRecord {
            store: store.to_string(),
            product: product.to_string(),
            category: category.to_string(),
            sale_value: value,
            quantity,
            rating: rating.and_then(Rating::new),
        }
    }

    fn sample() -> Vec<SaleRecord> {
        vec![
            sale("Loja 1", "Geladeira", "eletrodomesticos", 1_899.90, Some(1), Some(5)),
            sale("Loja 1", "Smart TV", "eletronicos", 2_499.00, Some(2), Some(4)),
            sale("Loja 2", "Geladeira", "eletrodomesticos", 1_950.00, Some(1), Some(3)),
            sale("Loja 2", "Fone de ouvido", "eletronicos", 99.90, Some(3), None),
            sale("Loja 3", "Cadeira", "moveis", 320.50, Some(4), Some(1)),
            sale("Loja 3", "Smart TV", "eletronicos", 2_399.00, Some(1), Some(5)),
        ]
    }

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    // ── total_revenue / revenue_by_store ──────────────────────────────────────

    #[test]
    fn test_total_revenue_equals_sum_of_store_revenue() {
        let records = sample();
        let total = SalesAggregator::total_revenue(&records);
        let by_store: f64 = SalesAggregator::revenue_by_store(&records).values().sum();
        assert!((total - by_store).abs() < 1e-6, "{total} vs {by_store}");
    }

    #[test]
    fn test_revenue_by_store_keys_are_observed_stores() {
        let by_store = SalesAggregator::revenue_by_store(&sample());
        let keys: Vec<&str> = by_store.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Loja 1", "Loja 2", "Loja 3"]);
        assert!((by_store["Loja 2"] - 2_049.90).abs() < 1e-6);
    }

    #[test]
    fn test_total_revenue_empty_is_zero() {
        let empty: Vec<SaleRecord> = Vec::new();
        assert_eq!(SalesAggregator::total_revenue(&empty), 0.0);
        assert!(SalesAggregator::revenue_by_store(&empty).is_empty());
    }

    // ── count_by_category ─────────────────────────────────────────────────────

    #[test]
    fn test_count_by_category_rows_sums_to_record_count() {
        let records = sample();
        let counts = SalesAggregator::count_by_category(&records, CountMeasure::Rows);
        assert_eq!(counts.values().sum::<u64>(), records.len() as u64);
        assert_eq!(counts["eletronicos"], 3);
    }

    #[test]
    fn test_count_by_category_quantity_sums_to_quantity_total() {
        let records = sample();
        let counts = SalesAggregator::count_by_category(&records, CountMeasure::Quantity);
        let quantity_total: u64 = records.iter().filter_map(|r| r.quantity).sum();
        assert_eq!(counts.values().sum::<u64>(), quantity_total);
        assert_eq!(counts["eletronicos"], 6);
        assert_eq!(counts["moveis"], 4);
    }

    #[test]
    fn test_record_count_follows_measure() {
        let records = sample();
        assert_eq!(SalesAggregator::record_count(&records, CountMeasure::Rows), 6);
        assert_eq!(SalesAggregator::record_count(&records, CountMeasure::Quantity), 12);
    }

    // ── revenue_by_category ───────────────────────────────────────────────────

    #[test]
    fn test_revenue_by_category() {
        let by_category = SalesAggregator::revenue_by_category(&sample());
        assert!((by_category["eletrodomesticos"] - 3_849.90).abs() < 1e-6);
        assert!((by_category["moveis"] - 320.50).abs() < 1e-6);
    }

    // ── breakdown_by_store_for_category ───────────────────────────────────────

    #[test]
    fn test_breakdown_for_category() {
        let breakdown = SalesAggregator::breakdown_by_store_for_category(
            &sample(),
            "eletronicos",
            CountMeasure::Quantity,
        );
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown["Loja 1"].count, 2);
        assert!((breakdown["Loja 1"].revenue - 2_499.00).abs() < 1e-6);
        assert_eq!(breakdown["Loja 2"].count, 3);
        assert_eq!(breakdown["Loja 3"].count, 1);
    }

    #[test]
    fn test_breakdown_for_unknown_category_is_empty() {
        let breakdown = SalesAggregator::breakdown_by_store_for_category(
            &sample(),
            "Nonexistent Category",
            CountMeasure::Rows,
        );
        assert!(breakdown.is_empty());
    }

    #[test]
    fn test_breakdown_category_match_is_exact() {
        let breakdown = SalesAggregator::breakdown_by_store_for_category(
            &sample(),
            "Eletronicos",
            CountMeasure::Rows,
        );
        assert!(breakdown.is_empty());
    }

    // ── rating_distribution ───────────────────────────────────────────────────

    #[test]
    fn test_rating_distribution_sorted_ascending_and_skips_unrated() {
        let dist = SalesAggregator::rating_distribution(&sample());
        let keys: Vec<u8> = dist.keys().map(|r| r.value()).collect();
        assert_eq!(keys, vec![1, 3, 4, 5]);
        assert_eq!(dist[&rating(5)], 2);
        assert_eq!(dist.values().sum::<u64>(), 5);
    }

    #[test]
    fn test_rating_distribution_is_idempotent() {
        let records = sample();
        let first = SalesAggregator::rating_distribution(&records);
        let second = SalesAggregator::rating_distribution(&records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ratings_for_product() {
        let dist = SalesAggregator::ratings_for_product(&sample(), "Smart TV");
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[&rating(4)], 1);
        assert_eq!(dist[&rating(5)], 1);
        assert!(SalesAggregator::ratings_for_product(&sample(), "Sofá").is_empty());
    }

    // ── mean_rating_by_product ────────────────────────────────────────────────

    #[test]
    fn test_mean_rating_by_product_orders_descending() {
        let records = vec![
            sale("Loja 1", "B", "x", 1.0, None, Some(3)),
            sale("Loja 1", "A", "x", 1.0, None, Some(4)),
            sale("Loja 2", "A", "x", 1.0, None, Some(5)),
        ];
        let means = SalesAggregator::mean_rating_by_product(&records);
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].product, "A");
        assert!((means[0].mean - 4.5).abs() < 1e-9);
        assert_eq!(means[0].ratings, 2);
        assert_eq!(means[1].product, "B");
        assert!((means[1].mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_rating_near_duplicate_names_stay_separate() {
        let records = vec![
            sale("Loja 1", "Smart TV", "x", 1.0, None, Some(5)),
            sale("Loja 1", "Smart Tv", "x", 1.0, None, Some(1)),
        ];
        let means = SalesAggregator::mean_rating_by_product(&records);
        assert_eq!(means.len(), 2);
    }

    #[test]
    fn test_mean_rating_ties_break_by_name() {
        let records = vec![
            sale("Loja 1", "Zebra", "x", 1.0, None, Some(4)),
            sale("Loja 1", "Abacaxi", "x", 1.0, None, Some(4)),
        ];
        let means = SalesAggregator::mean_rating_by_product(&records);
        assert_eq!(means[0].product, "Abacaxi");
        assert_eq!(means[1].product, "Zebra");
    }

    #[test]
    fn test_mean_rating_skips_unrated_products() {
        let means = SalesAggregator::mean_rating_by_product(&sample());
        assert!(means.iter().all(|m| m.product != "Fone de ouvido"));
    }

    // ── with filtering ────────────────────────────────────────────────────────

    #[test]
    fn test_aggregates_over_filtered_selection() {
        let records = sample();
        let filtered = filter_by_store(&records, &StoreFilter::specific(["Loja 3"]));

        let total = SalesAggregator::total_revenue(filtered.iter().copied());
        assert!((total - 2_719.50).abs() < 1e-6);

        let by_store = SalesAggregator::revenue_by_store(filtered.iter().copied());
        assert_eq!(by_store.len(), 1);
    }

    // ── dimension values ──────────────────────────────────────────────────────

    #[test]
    fn test_distinct_dimension_values_are_sorted() {
        let records = sample();
        assert_eq!(
            SalesAggregator::categories(&records),
            vec!["eletrodomesticos", "eletronicos", "moveis"]
        );
        assert_eq!(
            SalesAggregator::products(&records),
            vec!["Cadeira", "Fone de ouvido", "Geladeira", "Smart TV"]
        );
        assert_eq!(
            SalesAggregator::stores(&records),
            vec!["Loja 1", "Loja 2", "Loja 3"]
        );
    }
}
