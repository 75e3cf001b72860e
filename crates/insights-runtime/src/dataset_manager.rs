//! Session-owned dataset cache.
//!
//! Loading is the only I/O the dashboard performs. [`DatasetManager`] runs
//! [`insights_data::reader::load`] once per distinct ordered list of source
//! paths and hands out the resulting dataset behind an `Arc`, so every
//! interaction reuses the same immutable value.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use insights_core::error::Result;
use insights_core::models::UnifiedDataset;
use insights_data::reader;

/// Explicit memoization of the load step.
///
/// # Example
/// ```no_run
/// use insights_runtime::dataset_manager::DatasetManager;
///
/// let mut mgr = DatasetManager::new();
/// let dataset = mgr.get(&["data/loja_1.csv", "data/loja_2.csv"]).unwrap();
/// println!("{} sales", dataset.len());
/// ```
#[derive(Default)]
pub struct DatasetManager {
    /// Ordered source list the cached dataset was built from.
    cached_paths: Vec<PathBuf>,
    cache: Option<Arc<UnifiedDataset>>,
    cache_timestamp: Option<Instant>,
    last_error: Option<String>,
}

impl DatasetManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the dataset for `paths`, loading it only when the ordered path
    /// list differs from the cached one.
    ///
    /// A failed load is returned to the caller and never answered with a
    /// previously cached dataset.
    pub fn get<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Arc<UnifiedDataset>> {
        if let Some(cached) = self.cached_for(paths) {
            tracing::debug!("returning cached dataset");
            self.last_error = None;
            return Ok(cached);
        }

        match reader::load(paths) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                self.cached_paths = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
                self.cache = Some(Arc::clone(&dataset));
                self.cache_timestamp = Some(Instant::now());
                self.last_error = None;
                Ok(dataset)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the cached dataset so the next [`DatasetManager::get`] reloads.
    pub fn invalidate(&mut self) {
        self.cache = None;
        self.cache_timestamp = None;
        self.cached_paths.clear();
        tracing::debug!("dataset cache invalidated");
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_some()
    }

    /// Age of the cached dataset, or `None` before the first load.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cache_timestamp.map(|ts| ts.elapsed())
    }

    /// Description of the last failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn cached_for<P: AsRef<Path>>(&self, paths: &[P]) -> Option<Arc<UnifiedDataset>> {
        let cache = self.cache.as_ref()?;
        let same = self.cached_paths.len() == paths.len()
            && self
                .cached_paths
                .iter()
                .zip(paths)
                .all(|(cached, p)| {
                    let p: &Path = p.as_ref();
                    cached.as_path() == p
                });
        same.then(|| Arc::clone(cache))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
