//! Background scheduler for the daily rate fetch.
//!
//! Populates the store once per day so read paths rarely need a live fetch.

use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Fetch interval: 24 hours (rate sources publish daily fixings).
const FETCH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Initial delay before the first fetch (60 seconds to let the server fully start).
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the background rate fetch scheduler.
pub fn start_rate_fetch_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Rate fetch scheduler started (24-hour interval)");

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut fetch_interval = interval(Duration::from_secs(FETCH_INTERVAL_SECS));
        loop {
            // First tick completes immediately, which covers the initial run.
            fetch_interval.tick().await;
            run_scheduled_fetch(&state).await;
        }
    });
}

/// Runs a single scheduled fetch pass against the configured quote currency.
async fn run_scheduled_fetch(state: &Arc<AppState>) {
    info!("Running scheduled rate fetch...");

    match state
        .fx_service
        .fetch_rates(None, &state.default_quote, None)
        .await
    {
        Ok(summary) => {
            info!(
                "Scheduled rate fetch for {} complete: {} succeeded, {} failed",
                summary.date,
                summary.succeeded.len(),
                summary.failed.len()
            );
        }
        Err(e) => {
            warn!("Scheduled rate fetch failed: {}", e);
        }
    }
}
