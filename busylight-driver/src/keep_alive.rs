//! Periodic keep-alive task
//!
//! The device reverts to idle when its internal timeout expires, so a
//! live driver must re-arm it faster than it runs out. The task sleeps
//! for the configured interval, then sends one keep-alive report,
//! until the stop channel fires.

use std::sync::Arc;
use std::time::Duration;

use busylight_transport::Command;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::Driver;

/// Handle to a running keep-alive task.
pub(crate) struct KeepAliveTask {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl KeepAliveTask {
    /// Signal the task to stop and wait until it has exited.
    ///
    /// Once this returns, the task can no longer be touching the device
    /// handle, so the caller may release it.
    pub(crate) async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the keep-alive loop for `driver`.
///
/// Cancellation contract: a stop signal that arrives mid-sleep ends the
/// task immediately - it is a stop request, not a transient error, and
/// the sleep is never retried. A failed send only skips that one cycle;
/// the loop continues to the next interval.
///
/// The loop runs as an ordinary tokio task: it never blocks the caller
/// and dies with the runtime.
pub(crate) fn spawn(driver: Arc<Driver>, interval: Duration) -> KeepAliveTask {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    info!(
        "Starting keep-alive task with interval {} ms",
        interval.as_millis()
    );

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = driver.send(&Command::keep_alive()).await {
                        warn!("Keep-alive send failed, skipping this cycle: {e}");
                    }
                }
                _ = stop_rx.changed() => {
                    debug!("Keep-alive task received stop signal, exiting");
                    break;
                }
            }
        }
    });

    KeepAliveTask { stop_tx, task }
}
