//! Connection establishment with bounded retry
//!
//! In a container deployment there is no guarantee the database is up before
//! this process: after a host reboot the orchestrator may start both at once.
//! The supervisor therefore retries connection establishment on a fixed
//! backoff until the database answers or the attempt budget runs out, at
//! which point the caller must treat startup as failed.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::DatabaseError;
use crate::pool::{create_pool, DatabaseConfig, DatabasePool};
use crate::watchdog::{self, Liveness, PoolProbe, WatchdogConfig};

/// How often and how long to keep trying to reach a database at startup.
///
/// The defaults (10 attempts, 6 seconds apart) give an orchestrated database
/// container about a minute to come up. Both knobs are deployment-specific
/// and exposed through service configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of connection attempts; treated as at least 1.
    pub max_attempts: u32,
    /// Fixed pause between failed attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff: Duration::from_secs(6),
        }
    }
}

/// Runs `attempt` up to `policy.max_attempts` times, pausing `policy.backoff`
/// between failures.
///
/// Generic over the attempt so the loop is testable without a database; the
/// attempt receives the 1-based attempt number. Every failure is logged at
/// `warn`; the last error is returned once the budget is exhausted.
pub async fn connect_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut attempt: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let budget = policy.max_attempts.max(1);
    let mut last_err = None;

    for n in 1..=budget {
        match attempt(n).await {
            Ok(value) => {
                if n > 1 {
                    info!(attempt = n, "database connection established after retrying");
                }
                return Ok(value);
            }
            Err(e) => {
                warn!(
                    attempt = n,
                    budget,
                    error = %e,
                    "could not connect to the database, retrying in a moment"
                );
                last_err = Some(e);
                if n < budget {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    Err(last_err.expect("budget is at least 1, so at least one attempt ran"))
}

/// Owner of the process-wide database pools.
///
/// Exactly one supervisor exists per process. It is the only writer of
/// connection state; repositories hold pool clones and never replace them.
pub struct ConnectionSupervisor {
    primary: DatabasePool,
    cache: Option<DatabasePool>,
}

impl ConnectionSupervisor {
    /// Establishes the primary pool under the retry policy. Failure after
    /// the full budget is terminal for the caller; there is no degraded mode
    /// without the primary database.
    pub async fn connect_primary(
        config: &DatabaseConfig,
        retry: &RetryPolicy,
    ) -> Result<Self, DatabaseError> {
        info!("connecting to the primary database");
        let primary = connect_with_retry(retry, |_| create_pool(config)).await?;
        info!("primary database connection established");

        Ok(Self {
            primary,
            cache: None,
        })
    }

    /// Establishes the cache pool under the same retry policy. A
    /// configured-but-unreachable cache database is a deployment error the
    /// caller must treat as fatal, not a reason to silently run uncached.
    pub async fn connect_cache(
        &mut self,
        config: &DatabaseConfig,
        retry: &RetryPolicy,
    ) -> Result<(), DatabaseError> {
        info!("connecting to the cache database");
        let pool = connect_with_retry(retry, |_| create_pool(config)).await?;
        info!("cache database connection established");
        self.cache = Some(pool);
        Ok(())
    }

    pub fn primary(&self) -> &DatabasePool {
        &self.primary
    }

    pub fn cache(&self) -> Option<&DatabasePool> {
        self.cache.as_ref()
    }

    /// Spawns the liveness watchdog over the primary pool and returns the
    /// receiving end of its status flag.
    pub fn start_watchdog(&self, config: WatchdogConfig) -> watch::Receiver<Liveness> {
        let (liveness, _handle) = watchdog::spawn(PoolProbe::new(self.primary.clone()), config);
        liveness
    }

    /// Closes both pools. Only called at orderly process shutdown.
    pub async fn close(self) {
        self.primary.close().await;
        if let Some(cache) = self.cache {
            cache.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt_uses_exactly_three() {
        let attempts = Arc::new(AtomicU32::new(0));
        let seen = attempts.clone();

        let result: Result<u32, DatabaseError> = connect_with_retry(&policy(), move |n| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                if n < 3 {
                    Err(DatabaseError::connection_failed("still starting"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_budget_returns_last_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let seen = attempts.clone();

        let result: Result<(), DatabaseError> = connect_with_retry(&policy(), move |n| {
            let seen = seen.clone();
            async move {
                seen.fetch_add(1, Ordering::SeqCst);
                Err(DatabaseError::connection_failed(format!("attempt {n}")))
            }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 10);
        match result {
            Err(DatabaseError::ConnectionFailed(msg)) => assert_eq!(msg, "attempt 10"),
            other => panic!("expected ConnectionFailed, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_sleep() {
        let before = tokio::time::Instant::now();
        let result: Result<(), DatabaseError> =
            connect_with_retry(&policy(), |_| async { Ok(()) }).await;
        assert!(result.is_ok());
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempt_budget_still_tries_once() {
        let lenient = RetryPolicy {
            max_attempts: 0,
            backoff: Duration::from_secs(6),
        };
        let result: Result<u32, DatabaseError> =
            connect_with_retry(&lenient, |n| async move { Ok(n) }).await;
        assert_eq!(result.unwrap(), 1);
    }
}
