use std::sync::Arc;
use std::time::Duration;

use shared::services::ValuationService;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Start the periodic snapshot job. Returns `None` when `interval_secs` is 0.
///
/// The first pass runs one full interval after startup.
pub fn spawn_snapshot_job(
    valuation: Arc<ValuationService>,
    interval_secs: u64,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("Periodic snapshots disabled");
        return None;
    }

    let period = Duration::from_secs(interval_secs);
    info!(interval_secs, "Starting periodic snapshot job");

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(e) = valuation.snapshot_all().await {
                error!(error = %e, "Snapshot pass could not list portfolios");
            }
        }
    }))
}
