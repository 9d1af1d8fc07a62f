//! Background retention sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::application::services::LinkStore;
use crate::domain::repositories::LinkRepository;

/// Periodically deletes links older than `retention_days`.
///
/// The first sweep runs one full `period` after start. Failures are logged and
/// the next tick simply tries again; a late or skipped tick only delays
/// cleanup. Runs until the task is dropped.
///
/// # Panics
///
/// Panics if `period` is zero.
pub async fn run_expiry_sweeper<R: LinkRepository + 'static>(
    store: Arc<LinkStore<R>>,
    retention_days: u32,
    period: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match store.sweep_expired(retention_days).await {
            Ok(deleted) => info!(deleted, retention_days, "Expired links cleaned up"),
            Err(e) => error!(error = %e, "Failed to clean up expired links"),
        }
    }
}
