//! Background rebuild loop

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::rebuild::SnapshotPipeline;

/// Spawn the rebuild task: one rebuild right away, then one every `every`
/// when set. Failed cycles are logged and the loop carries on.
///
/// The HTTP side does not wait for this; it reports not-ready until the first
/// rebuild publishes.
pub fn spawn_rebuild_loop(pipeline: Arc<SnapshotPipeline>, every: Option<Duration>) -> JoinHandle<()> {
    tokio::spawn(async move {
        pipeline.rebuild_logged().await;

        let Some(every) = every else {
            debug!("Periodic rebuild disabled");
            return;
        };
        info!(interval_secs = every.as_secs(), "Scheduling periodic rebuilds");

        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            pipeline.rebuild_logged().await;
        }
    })
}
