//! Timer-driven scheduling of a batch driver on the tokio runtime

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::batch::driver::{BatchDriver, RunStatus};
use crate::config::ImportOptions;
use crate::error::{PlacementError, Result};
use crate::place::MeshImporter;

/// Default pause between ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Step a started driver once per `tick_interval` until it finishes or is cancelled.
///
/// Options are read from the watch channel at the start of every tick, so a
/// sender can change the batch size or override flags mid-run. Between ticks
/// the task yields to the runtime. A zero `tick_interval` is rejected.
pub async fn drive<I: MeshImporter>(
    driver: &mut BatchDriver,
    importer: &mut I,
    options: watch::Receiver<ImportOptions>,
    tick_interval: Duration,
) -> Result<RunStatus> {
    if tick_interval.is_zero() {
        return Err(PlacementError::Configuration {
            message: "Tick interval must be greater than zero".to_string(),
            field: Some("tick_interval".to_string()),
        });
    }

    let token = driver.cancellation_token();
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                driver.cancel();
                return Ok(RunStatus::Cancelled);
            }
            _ = ticker.tick() => {}
        }

        let snapshot = options.borrow().clone();
        match driver.step(importer, &snapshot)? {
            RunStatus::Continuing => debug!("{} lines left after tick", driver.remaining()),
            status => return Ok(status),
        }
    }
}
