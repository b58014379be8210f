//! Expiry reaper.
//!
//! Sweeps the registry on a fixed interval and reclaims groups whose TTL has
//! elapsed, independent of request traffic. The lazy delete in the transfer
//! service handles groups discovered expired at lookup time; this task is
//! what reclaims groups nobody ever asks for again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use droplink_db::GroupRepository;
use droplink_storage::Storage;
use tokio::time::interval;

use crate::purge::purge_group;

#[derive(Clone)]
pub struct CleanupService {
    groups: GroupRepository,
    storage: Arc<dyn Storage>,
    sweep_interval: Duration,
    /// Subtracted from "now" when selecting expired groups, so a download
    /// that resolved its group just before expiry can finish streaming.
    grace: Duration,
}

impl CleanupService {
    pub fn new(
        groups: GroupRepository,
        storage: Arc<dyn Storage>,
        sweep_interval: Duration,
        grace: Duration,
    ) -> Self {
        Self {
            groups,
            storage,
            sweep_interval,
            grace,
        }
    }

    /// Spawn the background sweep loop. Returns the task handle for
    /// shutdown; individual sweep failures are logged, never fatal.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = interval(self.sweep_interval);
            // The first tick fires immediately; skip it so startup is quiet.
            tick.tick().await;

            loop {
                tick.tick().await;
                match self.sweep().await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "reaper sweep completed");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "reaper sweep failed");
                    }
                }
            }
        })
    }

    /// One sweep: purge every group past expiry (minus the grace window).
    /// Failures on an individual group are logged and do not stop the sweep.
    /// Returns how many registry entries this sweep removed.
    #[tracing::instrument(skip(self))]
    pub async fn sweep(&self) -> Result<usize, droplink_core::AppError> {
        let grace = chrono::Duration::from_std(self.grace).unwrap_or_else(|_| chrono::Duration::zero());
        let cutoff = Utc::now() - grace;

        let expired = self.groups.expired_groups(cutoff).await?;
        let mut purged = 0usize;

        for group in &expired {
            if purge_group(self.storage.as_ref(), &self.groups, group).await {
                purged += 1;
            }
        }

        Ok(purged)
    }
}
