use std::{future::Future, time::Duration};

use log::*;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

/// Starts the sync timer. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every tick spawns `job` as a task of its own and goes straight back to waiting. A cycle that outlasts `period`
/// therefore overlaps with the next one. When `run_on_start` is false the first cycle starts after one full period.
pub fn start_sync_worker<F, Fut>(period: Duration, run_on_start: bool, job: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let start = if run_on_start { Instant::now() } else { Instant::now() + period };
        let mut timer = interval_at(start, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🕰️ Catalog sync worker started. Running every {}s", period.as_secs());
        loop {
            timer.tick().await;
            debug!("🕰️ Spawning catalog sync job");
            tokio::spawn(job());
        }
    })
}
