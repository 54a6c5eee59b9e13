//! Background liveness watchdog for the primary database
//!
//! A long-lived task probes the primary pool on a fixed interval and
//! publishes the result through a `watch` channel: one writer (the watchdog),
//! any number of readers. Probe failures are retried indefinitely and logged
//! each time, so degradation is never silent; only a long unbroken run of
//! failures escalates to [`Liveness::Lost`], which the service layer treats
//! as fatal. In-flight repository operations are never interrupted — the
//! watchdog observes the pool, it does not own the queries running on it.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::pool::{ping, DatabasePool};

/// Health of the primary database connection as seen by the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// The most recent probe succeeded.
    Healthy,
    /// At least one probe failed; the watchdog is still retrying.
    Degraded,
    /// The failure threshold was crossed; the connection is considered gone
    /// for good and the watchdog has stopped.
    Lost,
}

/// A single liveness check. Abstracted from the pool so the watchdog loop is
/// testable with a scripted probe.
#[async_trait]
pub trait LivenessProbe: Send + Sync + 'static {
    async fn check(&self) -> bool;
}

/// Probe backed by a real pool: one `SELECT 1` round trip.
pub struct PoolProbe {
    pool: DatabasePool,
}

impl PoolProbe {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LivenessProbe for PoolProbe {
    async fn check(&self) -> bool {
        ping(&self.pool).await.is_ok()
    }
}

/// Watchdog tuning.
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// Pause between probes.
    pub interval: Duration,
    /// Consecutive failures before the connection is declared lost.
    pub failure_threshold: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            failure_threshold: 30,
        }
    }
}

/// Spawns the watchdog task.
///
/// Returns the status receiver and the task handle. The task runs for the
/// lifetime of the process unless the threshold is crossed, in which case it
/// publishes [`Liveness::Lost`] once and ends.
pub fn spawn(
    probe: impl LivenessProbe,
    config: WatchdogConfig,
) -> (watch::Receiver<Liveness>, JoinHandle<()>) {
    let (tx, rx) = watch::channel(Liveness::Healthy);

    let handle = tokio::spawn(async move {
        let mut consecutive_failures = 0u32;
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick completes immediately; skip it so the pool is not
        // probed in the same instant the bootstrap just pinged it
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if probe.check().await {
                if consecutive_failures > 0 {
                    info!(
                        after_failures = consecutive_failures,
                        "database connection recovered"
                    );
                    tx.send_replace(Liveness::Healthy);
                }
                consecutive_failures = 0;
            } else {
                consecutive_failures += 1;
                if consecutive_failures >= config.failure_threshold {
                    error!(
                        consecutive_failures,
                        "database liveness could not be restored, giving up"
                    );
                    tx.send_replace(Liveness::Lost);
                    return;
                }
                warn!(
                    consecutive_failures,
                    threshold = config.failure_threshold,
                    "database liveness probe failed"
                );
                tx.send_replace(Liveness::Degraded);
            }
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Probe that replays a fixed script, then keeps returning the last value.
    struct ScriptedProbe {
        script: Mutex<VecDeque<bool>>,
        after: bool,
    }

    impl ScriptedProbe {
        fn new(script: impl IntoIterator<Item = bool>, after: bool) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                after,
            }
        }
    }

    #[async_trait]
    impl LivenessProbe for ScriptedProbe {
        async fn check(&self) -> bool {
            self.script.lock().unwrap().pop_front().unwrap_or(self.after)
        }
    }

    fn config(threshold: u32) -> WatchdogConfig {
        WatchdogConfig {
            interval: Duration::from_millis(100),
            failure_threshold: threshold,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_probe_publishes_degraded() {
        let (mut liveness, handle) = spawn(ScriptedProbe::new([false], true), config(5));

        liveness.changed().await.unwrap();
        assert_eq!(*liveness.borrow(), Liveness::Degraded);

        // next successful probe recovers
        liveness.changed().await.unwrap();
        assert_eq!(*liveness.borrow(), Liveness::Healthy);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_threshold_breach_publishes_lost_and_stops() {
        let (liveness, handle) = spawn(ScriptedProbe::new([], false), config(3));

        // task ends on its own once the threshold is crossed
        handle.await.unwrap();
        assert_eq!(*liveness.borrow(), Liveness::Lost);
    }

    #[tokio::test(start_paused = true)]
    async fn test_healthy_probes_publish_nothing() {
        let (liveness, handle) = spawn(ScriptedProbe::new([], true), config(3));

        // give the loop a few ticks
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*liveness.borrow(), Liveness::Healthy);
        assert!(!liveness.has_changed().unwrap());

        handle.abort();
    }
}
