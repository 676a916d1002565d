//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use assetgate_core::Config;
use assetgate_processing::SystemClock;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let categories = config
        .load_categories()
        .context("Failed to load category table")?;
    tracing::info!(categories = categories.len(), "Category table loaded");

    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        config.clone(),
        storage,
        categories,
        Arc::new(SystemClock),
    )?);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
