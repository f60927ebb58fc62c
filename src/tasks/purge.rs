//! Purge Task
//!
//! Background task that periodically removes expired cache entries.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::cache::{CacheStore, Measure};

// == Purge Task Handle ==
/// Handle to a running purge task.
///
/// Dropping the handle closes the shutdown channel, which stops the task at
/// its next wakeup.
#[derive(Debug)]
pub struct PurgeTask {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl PurgeTask {
    /// Signals the task to stop and waits for it to exit.
    pub async fn stop(mut self) {
        self.signal();
        if let Err(err) = (&mut self.handle).await {
            if !err.is_cancelled() {
                error!("Purge task ended abnormally: {}", err);
            }
        }
    }

    /// Signals the task to stop without waiting.
    pub fn signal(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    /// Aborts the task immediately.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task holds only a weak reference to the store and exits once the
/// store is gone, when [`PurgeTask::stop`] is called, or when the handle is
/// dropped. Each sweep holds the store lock for the whole pass. A sweep that
/// panics is logged and the next one still runs.
///
/// Must be called from within a tokio runtime. An interval of 0 is treated
/// as 1 second.
///
/// # Arguments
/// * `store` - Weak reference to the shared store
/// * `interval_secs` - Interval in seconds between sweeps
pub fn spawn_purge_task<V>(store: Weak<Mutex<CacheStore<V>>>, interval_secs: u64) -> PurgeTask
where
    V: Measure + PartialEq + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let period = Duration::from_secs(interval_secs.max(1));

    let handle = tokio::spawn(async move {
        info!(
            "Starting purge task with interval of {} seconds",
            period.as_secs()
        );

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Purge task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(store) = store.upgrade() else {
                        debug!("Store dropped, purge task exiting");
                        break;
                    };
                    sweep(&store);
                }
            }
        }
    });

    PurgeTask {
        shutdown: Some(shutdown_tx),
        handle,
    }
}

/// Runs one isolated purge pass.
fn sweep<V: Measure + PartialEq>(store: &Arc<Mutex<CacheStore<V>>>) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| store.lock().purge_expired()));

    match result {
        Ok(0) => debug!("Purge sweep: no expired entries found"),
        Ok(removed) => info!("Purge sweep: removed {} expired entries", removed),
        Err(_) => error!("Purge sweep panicked; retrying on next interval"),
    }
}
