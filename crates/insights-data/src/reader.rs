//! CSV discovery and loading for Store Insights.
//!
//! Each store exports its sales as a CSV file. Exports from different periods
//! disagree on column names (English or Portuguese, `price` instead of
//! `sale value`, with or without quantity and rating columns, with or
//! without a store column). [`load`] maps every source onto the fixed
//! [`SaleRecord`] schema and concatenates them into a [`UnifiedDataset`].

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use csv::{ReaderBuilder, StringRecord, Trim};
use insights_core::error::{InsightsError, Result};
use insights_core::models::{Rating, SaleRecord, SourceSummary, UnifiedDataset};
use regex::Regex;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

// ── Header aliases ────────────────────────────────────────────────────────────

const STORE_HEADERS: &[&str] = &["store", "store name", "loja"];
const PRODUCT_HEADERS: &[&str] = &["product", "product name", "produto"];
const CATEGORY_HEADERS: &[&str] = &[
    "category",
    "product category",
    "categoria",
    "categoria do produto",
];
const SALE_VALUE_HEADERS: &[&str] = &["sale value", "valor da venda"];
const LEGACY_PRICE_HEADERS: &[&str] = &["price", "preço", "preco"];
const QUANTITY_HEADERS: &[&str] = &["quantity", "qty", "quantidade"];
const RATING_HEADERS: &[&str] = &[
    "rating",
    "customer rating",
    "nota",
    "avaliação da compra",
    "avaliacao da compra",
];

// ── Column resolution ─────────────────────────────────────────────────────────

/// Positions of the internal schema's fields within one source's header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub store: Option<usize>,
    pub product: usize,
    pub category: usize,
    pub sale_value: usize,
    /// `true` when `sale_value` points at a legacy price column.
    pub legacy_value_column: bool,
    pub quantity: Option<usize>,
    pub rating: Option<usize>,
}

/// Map a header row onto the internal schema.
///
/// Matching ignores case, surrounding whitespace, a leading BOM and Unicode
/// composition (`Preço` in NFD matches `preço`), and treats `_` as a space.
/// The error is a human-readable reason naming the missing
/// field.
pub fn resolve_columns(headers: &StringRecord) -> std::result::Result<ColumnMap, String> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let find = |aliases: &[&'static str]| -> Option<usize> {
        let mut hits = normalized
            .iter()
            .enumerate()
            .filter(|(_, h)| aliases.iter().any(|alias| h.as_str() == *alias))
            .map(|(i, _)| i);
        let first = hits.next();
        if let Some(dup) = hits.next() {
            warn!(
                column = %normalized[dup],
                "duplicate column for the same field; using the first one"
            );
        }
        first
    };

    let product = find(PRODUCT_HEADERS).ok_or("missing product column")?;
    let category = find(CATEGORY_HEADERS).ok_or("missing category column")?;

    let (sale_value, legacy_value_column) =
        match (find(SALE_VALUE_HEADERS), find(LEGACY_PRICE_HEADERS)) {
            (Some(canonical), legacy) => {
                if legacy.is_some() {
                    debug!("both sale value and price columns present; ignoring price");
                }
                (canonical, false)
            }
            (None, Some(legacy)) => (legacy, true),
            (None, None) => {
                return Err("missing sale value column (neither sale value nor price)".to_string())
            }
        };

    Ok(ColumnMap {
        store: find(STORE_HEADERS),
        product,
        category,
        sale_value,
        legacy_value_column,
        quantity: find(QUANTITY_HEADERS),
        rating: find(RATING_HEADERS),
    })
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .nfc()
        .collect::<String>()
        .to_lowercase()
}

// ── Store names ───────────────────────────────────────────────────────────────

fn separator_regex() -> &'static Regex {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    SEPARATORS.get_or_init(|| Regex::new(r"[\s_.\-]+").expect("separator pattern is valid"))
}

/// Derive a store name from a source file name.
///
/// `data/loja_1.csv` becomes `Loja 1`, `north-side.csv` becomes
/// `North Side`. Returns `None` when nothing but separators remains.
pub fn derive_store_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    let spaced = separator_regex().replace_all(&stem, " ");
    let words: Vec<String> = spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find every `.csv` file under `dir` (recursively), sorted by path.
pub fn discover_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(InsightsError::MissingFile {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    if files.is_empty() {
        return Err(InsightsError::NoSources(dir.to_path_buf()));
    }
    files.sort();
    debug!("Discovered {} CSV sources in {}", files.len(), dir.display());
    Ok(files)
}

/// Load every source in order and concatenate them into one dataset.
///
/// Fails on the first source that is missing, lacks a required column, or
/// holds a value that cannot be read; nothing is substituted.
pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<UnifiedDataset> {
    let started = std::time::Instant::now();
    let mut records: Vec<SaleRecord> = Vec::new();
    let mut sources: Vec<SourceSummary> = Vec::with_capacity(paths.len());

    for path in paths {
        let (mut source_records, summary) = load_source(path.as_ref())?;
        records.append(&mut source_records);
        sources.push(summary);
    }

    let dataset = UnifiedDataset::new(records, sources);
    info!(
        records = dataset.len(),
        sources = dataset.sources().len(),
        measure = ?dataset.count_measure(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );
    Ok(dataset)
}

// ── Per-source loading ────────────────────────────────────────────────────────

/// Read one CSV source. The file handle is dropped on every return path.
fn load_source(path: &Path) -> Result<(Vec<SaleRecord>, SourceSummary)> {
    let file = File::open(path).map_err(|source| InsightsError::MissingFile {
        path: path.to_path_buf(),
        source,
    })?;

    // Field counts are checked per row so that blank lines can be skipped.
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let columns = resolve_columns(&headers).map_err(|reason| InsightsError::Schema {
        path: path.to_path_buf(),
        reason,
    })?;

    let injected_store = match columns.store {
        Some(_) => None,
        None => Some(derive_store_name(path).ok_or_else(|| InsightsError::Schema {
            path: path.to_path_buf(),
            reason: "no store column and no usable file name to derive one from".to_string(),
        })?),
    };

    if columns.legacy_value_column {
        debug!(path = %path.display(), "reading sale value from legacy price column");
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(path, e))?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        if row.iter().all(str::is_empty) {
            debug!(path = %path.display(), line, "skipping blank line");
            continue;
        }
        if row.len() > headers.len() {
            return Err(InsightsError::InvalidRow {
                path: path.to_path_buf(),
                line,
                reason: format!("{} fields but the header has {}", row.len(), headers.len()),
            });
        }
        let record = parse_row(&row, &columns, injected_store.as_deref()).map_err(|reason| {
            InsightsError::InvalidRow {
                path: path.to_path_buf(),
                line,
                reason,
            }
        })?;
        records.push(record);
    }

    debug!(
        path = %path.display(),
        rows = records.len(),
        store = injected_store.as_deref().unwrap_or("<column>"),
        "source loaded"
    );

    let summary = SourceSummary {
        path: path.to_path_buf(),
        injected_store,
        rows: records.len(),
        legacy_value_column: columns.legacy_value_column,
        has_quantity: columns.quantity.is_some(),
        has_rating: columns.rating.is_some(),
    };
    Ok((records, summary))
}

fn parse_row(
    row: &StringRecord,
    columns: &ColumnMap,
    injected_store: Option<&str>,
) -> std::result::Result<SaleRecord, String> {
    let cell = |idx: usize| row.get(idx).unwrap_or("");
    let required = |idx: usize, field: &str| -> std::result::Result<String, String> {
        match cell(idx) {
            "" => Err(format!("blank {field}")),
            value => Ok(value.to_string()),
        }
    };

    let store = match (columns.store, injected_store) {
        (Some(idx), _) => required(idx, "store")?,
        (None, Some(name)) => name.to_string(),
        (None, None) => return Err("no store available".to_string()),
    };

    let raw_value = cell(columns.sale_value);
    let sale_value: f64 = raw_value
        .parse()
        .map_err(|_| format!("sale value {raw_value:?} is not a number"))?;
    if !sale_value.is_finite() {
        return Err(format!("sale value {raw_value:?} is not finite"));
    }
    if sale_value < 0.0 {
        return Err(format!("negative sale value {raw_value}"));
    }

    let quantity = match columns.quantity {
        Some(idx) => {
            let raw = cell(idx);
            Some(
                raw.parse::<u64>()
                    .map_err(|_| format!("quantity {raw:?} is not a whole number"))?,
            )
        }
        None => None,
    };

    let rating = match columns.rating.map(cell) {
        None | Some("") => None,
        Some(raw) => Some(
            Rating::parse(raw)
                .ok_or_else(|| format!("rating {raw:?} is outside {}-{}", Rating::MIN, Rating::MAX))?,
        ),
    };

    Ok(SaleRecord {
        store,
        product: required(columns.product, "product")?,
        category: required(columns.category, "category")?,
        sale_value,
        quantity,
        rating,
    })
}

/// I/O failures while reading a source count as an unreadable file.
fn csv_error(path: &Path, err: csv::Error) -> InsightsError {
    if err.is_io_error() {
        InsightsError::MissingFile {
            path: path.to_path_buf(),
            source: std::io::Error::from(err),
        }
    } else {
        InsightsError::Csv {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
