//! Application wiring: database, storage, services, routes.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use droplink_core::{Config, RandomCode};
use droplink_db::{setup_database, GroupRepository};
use droplink_services::{CleanupService, TransferService};
use droplink_storage::LocalStorage;

use crate::state::AppState;

/// Build the full application: pool + migrations, blob store, services,
/// router. The reaper task is not started here; the binary starts it so
/// tests can drive sweeps deterministically.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = setup_database(&config.database_url).await?;
    let groups = GroupRepository::new(pool);

    let storage = Arc::new(LocalStorage::new(&config.storage_path).await?);
    tracing::info!(storage_path = %config.storage_path, "blob store ready");

    let transfer = TransferService::new(
        config.clone(),
        groups.clone(),
        storage.clone(),
        Arc::new(RandomCode),
    );
    let cleanup = Arc::new(CleanupService::new(
        groups,
        storage,
        config.reaper_interval,
        config.reaper_grace,
    ));

    let state = Arc::new(AppState {
        config: config.clone(),
        transfer,
        cleanup,
    });

    let router = routes::setup_routes(&config, state.clone())?;
    Ok((state, router))
}
