//! Background jobs. The only one is the expiration sweep: listings past
//! their deadline are flipped to `expired` so they stop lingering as
//! stale `active` rows. Correctness does not depend on it - reads apply
//! the deadline lazily - but feeds stay tidy without waiting for reads.

mod scheduler;

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::JobSchedulerError;

use bazar_core::ports::ListingRepository;

use crate::config::SweepConfig;

pub use scheduler::Scheduler;

/// Start the periodic expiration sweep, if enabled.
pub async fn start_sweep(
    config: &SweepConfig,
    listings: Arc<dyn ListingRepository>,
) -> Result<Option<Scheduler>, JobSchedulerError> {
    if !config.enabled {
        tracing::info!("Expiration sweep disabled");
        return Ok(None);
    }

    let scheduler = Scheduler::new().await?;
    scheduler
        .add_cron(&config.schedule, move || {
            let listings = listings.clone();
            async move {
                match listings.expire_overdue(Utc::now()).await {
                    Ok(0) => {}
                    Ok(flipped) => {
                        tracing::info!(flipped, "Expiration sweep flipped overdue listings");
                    }
                    Err(e) => tracing::warn!(error = %e, "Expiration sweep failed"),
                }
            }
        })
        .await?;
    scheduler.start().await?;

    Ok(Some(scheduler))
}
