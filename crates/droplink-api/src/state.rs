//! Application state shared by all handlers.

use std::sync::Arc;

use droplink_core::Config;
use droplink_services::{CleanupService, TransferService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub transfer: TransferService,
    /// Held here so the binary can start it and tests can drive sweeps
    /// directly.
    pub cleanup: Arc<CleanupService>,
}
