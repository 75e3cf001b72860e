mod bootstrap;

use std::sync::Arc;

use anyhow::Result;
use insights_core::error::InsightsError;
use insights_core::settings::Settings;
use insights_runtime::dataset_manager::DatasetManager;
use insights_runtime::views::{unknown_stores, DashboardViews};
use insights_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let base_dir = bootstrap::ensure_directories()?;
    let log_file = bootstrap::log_file_for(&settings, &base_dir);
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Store Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Currency: {:?}",
        settings.view,
        settings.theme,
        settings.currency
    );

    let sources = bootstrap::resolve_sources(&settings)?;
    let mut manager = DatasetManager::new();
    let dataset = manager.get(sources.as_slice())?;

    let filter = bootstrap::store_filter(&settings.stores);
    let unknown = unknown_stores(&dataset, &filter);
    if !unknown.is_empty() {
        return Err(InsightsError::Config(format!(
            "unknown store(s): {}",
            unknown.join(", ")
        ))
        .into());
    }

    match settings.view.as_str() {
        "summary" => {
            let views = DashboardViews::compute(
                &dataset,
                &filter,
                settings.category.as_deref(),
                settings.product.as_deref(),
            );
            println!("{}", serde_json::to_string_pretty(&views)?);
        }

        "dashboard" => {
            let app = App::new(
                &settings.theme,
                settings.currency.clone(),
                Arc::clone(&dataset),
                filter,
                settings.category.as_deref(),
                settings.product.as_deref(),
            );

            tokio::task::spawn_blocking(move || app.run())
                .await
                .map_err(|e| InsightsError::Terminal(e.to_string()))?
                .map_err(|e| InsightsError::Terminal(e.to_string()))?;
            tracing::info!("dashboard closed");
        }

        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
