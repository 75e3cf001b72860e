use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use insights_core::error::InsightsError;
use insights_core::settings::Settings;
use insights_data::filter::StoreFilter;
use insights_data::reader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.store-insights/` and its `logs/` subdirectory exist and return
/// the base directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let base = home.join(".store-insights");
    std::fs::create_dir_all(base.join("logs"))?;
    Ok(base)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Where log output goes: the `--log-file` path when given, otherwise a file
/// under `base_dir/logs/` for the dashboard (stderr would tear the terminal
/// UI), otherwise `None` for stderr.
pub fn log_file_for(settings: &Settings, base_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = &settings.log_file {
        return Some(path.clone());
    }
    (settings.view == "dashboard").then(|| base_dir.join("logs").join("store-insights.log"))
}

/// Map a CLI log level name to an `EnvFilter` directive.
fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Writes to `log_file` (appending, without ANSI colours) when given,
/// otherwise to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Sources and filter ─────────────────────────────────────────────────────────

/// CSV sources named on the command line, or discovered under `--data-dir`.
pub fn resolve_sources(settings: &Settings) -> Result<Vec<PathBuf>, InsightsError> {
    if !settings.sources.is_empty() {
        return Ok(settings.sources.clone());
    }
    match &settings.data_dir {
        Some(dir) => reader::discover_sources(dir),
        None => Err(InsightsError::Config(
            "no sales data given; pass --source <PATH> or --data-dir <DIR>".to_string(),
        )),
    }
}

/// `--store` values as a filter; none means every store.
pub fn store_filter(stores: &[String]) -> StoreFilter {
    if stores.is_empty() {
        StoreFilter::AllStores
    } else {
        StoreFilter::specific(stores.iter().cloned())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
