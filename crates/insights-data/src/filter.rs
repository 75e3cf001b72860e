//! Store selection applied before aggregation.

use std::collections::BTreeSet;

use insights_core::models::SaleRecord;
use serde::Serialize;

/// Which stores a view should include.
///
/// `AllStores` is the "no filtering" choice. It is kept apart from an explicit
/// selection that happens to list every store, so a store can never collide
/// with the sentinel by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "stores", rename_all = "snake_case")]
pub enum StoreFilter {
    #[default]
    AllStores,
    SpecificStores(BTreeSet<String>),
}

impl StoreFilter {
    /// Explicit selection of the given store names.
    pub fn specific<I, S>(stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StoreFilter::SpecificStores(stores.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, StoreFilter::AllStores)
    }

    /// Whether `store` is part of the selection.
    pub fn includes(&self, store: &str) -> bool {
        match self {
            StoreFilter::AllStores => true,
            StoreFilter::SpecificStores(set) => set.contains(store),
        }
    }

    pub fn matches(&self, record: &SaleRecord) -> bool {
        self.includes(&record.store)
    }

    /// Flip one store in or out of the selection.
    ///
    /// Toggling from `AllStores` deselects `store` and keeps every other
    /// entry of `known_stores` selected.
    pub fn toggle(&self, store: &str, known_stores: &[String]) -> Self {
        match self {
            StoreFilter::AllStores => StoreFilter::SpecificStores(
                known_stores
                    .iter()
                    .filter(|s| s.as_str() != store)
                    .cloned()
                    .collect(),
            ),
            StoreFilter::SpecificStores(set) => {
                let mut set = set.clone();
                if !set.remove(store) {
                    set.insert(store.to_string());
                }
                StoreFilter::SpecificStores(set)
            }
        }
    }

    /// Short human-readable description for headers and logs.
    pub fn describe(&self) -> String {
        match self {
            StoreFilter::AllStores => "All stores".to_string(),
            StoreFilter::SpecificStores(set) if set.is_empty() => "No stores".to_string(),
            StoreFilter::SpecificStores(set) => {
                set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
            }
        }
    }
}

/// Keep the records selected by `filter`.
///
/// `AllStores` returns every record without inspecting any of them.
pub fn filter_by_store<'a>(records: &'a [SaleRecord], filter: &StoreFilter) -> Vec<&'a SaleRecord> {
    match filter {
        StoreFilter::AllStores => records.iter().collect(),
        StoreFilter::SpecificStores(set) => records
            .iter()
            .filter(|r| set.contains(&r.store))
            .collect(),
    }
}
