use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A customer rating on the discrete 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating a customer can give.
    pub const MIN: u8 = 1;
    /// Highest rating a customer can give.
    pub const MAX: u8 = 5;

    /// Build a rating, returning `None` outside `MIN..=MAX`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    /// Parse a rating cell.
    ///
    /// Accepts integral values written either as `"4"` or `"4.0"`; anything
    /// fractional or outside the scale is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: f64 = raw.trim().parse().ok()?;
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < f64::from(Self::MIN) || value > f64::from(Self::MAX) {
            return None;
        }
        Self::new(value as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single sale read from a store CSV, already mapped onto the fixed
/// internal schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    /// Store the sale belongs to; injected from the file name when the
    /// source has no store column.
    pub store: String,
    /// Product name as written in the source.
    pub product: String,
    /// Product category as written in the source.
    pub category: String,
    /// Non-negative sale value in the dataset's currency.
    pub sale_value: f64,
    /// Units sold, when the source carries a quantity column.
    pub quantity: Option<u64>,
    /// Customer rating, when the source carries a rating column and the
    /// cell is filled.
    pub rating: Option<Rating>,
}

/// How "number of sales" is measured for a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMeasure {
    /// Sum the explicit quantity column.
    Quantity,
    /// Count matching rows.
    Rows,
}

impl CountMeasure {
    /// Contribution of a single record to a count under this measure.
    pub fn units(self, record: &SaleRecord) -> u64 {
        match self {
            CountMeasure::Quantity => record.quantity.unwrap_or(0),
            CountMeasure::Rows => 1,
        }
    }
}

/// What the loader learned about one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    /// Path as given by the caller.
    pub path: PathBuf,
    /// Store name derived from the file name, when the source had no store
    /// column.
    pub injected_store: Option<String>,
    /// Number of records read from this source.
    pub rows: usize,
    /// `true` when the sale value came from the legacy price column.
    pub legacy_value_column: bool,
    pub has_quantity: bool,
    pub has_rating: bool,
}

/// Concatenation of every source's records after schema normalization.
///
/// Built once and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedDataset {
    records: Vec<SaleRecord>,
    sources: Vec<SourceSummary>,
    count_measure: CountMeasure,
    loaded_at: DateTime<Utc>,
}

impl UnifiedDataset {
    /// Assemble a dataset from already-normalized records.
    ///
    /// The count measure is [`CountMeasure::Quantity`] only when every source
    /// carried a quantity column; a single source without one switches the
    /// whole dataset to row counting.
    pub fn new(records: Vec<SaleRecord>, sources: Vec<SourceSummary>) -> Self {
        let count_measure = if !sources.is_empty() && sources.iter().all(|s| s.has_quantity) {
            CountMeasure::Quantity
        } else {
            CountMeasure::Rows
        };
        Self {
            records,
            sources,
            count_measure,
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    pub fn count_measure(&self) -> CountMeasure {
        self.count_measure
    }

    /// When the dataset was assembled.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
