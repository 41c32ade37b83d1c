// src/startup.rs
//! Startup gate: the database must be reachable and migrated before the
//! listener is bound.

use std::{fmt::Display, future::Future, io, net::IpAddr, time::Duration};

use thiserror::Error as ThisError;
use tracing::{error, info, warn};

#[derive(Debug, ThisError)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Database not ready after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error("Failed to bind to any port starting at {port} on {host}")]
    Bind { host: IpAddr, port: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Fixed-delay retry bound. No backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

/// Runs `attempt` until it succeeds or `policy.max_attempts` calls have failed.
///
/// The closure receives the 1-based attempt number. The delay is only slept
/// between attempts, never after the last one. A `max_attempts` of zero still
/// makes one attempt.
pub async fn run_gate<T, E, F, Fut>(policy: RetryPolicy, mut attempt: F) -> Result<T, StartupError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for n in 1..=max_attempts {
        match attempt(n).await {
            Ok(value) => {
                info!(attempt = n, "Database ready");
                return Ok(value);
            }
            Err(e) => {
                warn!(attempt = n, max_attempts, error = %e, "Database not ready");
                last_error = e.to_string();
                if n < max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    error!(attempts = max_attempts, error = %last_error, "Giving up on database");
    Err(StartupError::Exhausted {
        attempts: max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn default_policy_is_ten_attempts_five_seconds_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn ready_on_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let value = run_gate(fast(10), |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("pool")
            }
        })
        .await
        .unwrap();

        assert_eq!(value, "pool");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ready_after_k_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let value = run_gate(fast(10), |n| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                if n < 4 {
                    Err(format!("connection refused ({n})"))
                } else {
                    Ok(n)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn ready_on_last_allowed_attempt() {
        let value = run_gate(fast(3), |n| async move {
            if n == 3 { Ok(n) } else { Err("down") }
        })
        .await
        .unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn fails_after_exhausting_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = run_gate(fast(5), |n| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(format!("attempt {n} refused"))
            }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        match err {
            StartupError::Exhausted { attempts, last_error } => {
                assert_eq!(attempts, 5);
                assert_eq!(last_error, "attempt 5 refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = run_gate(fast(0), |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("down")
            }
        })
        .await;

        assert!(matches!(result, Err(StartupError::Exhausted { attempts: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_delay_after_final_failure() {
        let policy = RetryPolicy {
            max_attempts: 1,
            delay: Duration::from_secs(60),
        };
        let started = std::time::Instant::now();
        let result = run_gate(policy, |_| async { Err::<(), _>("down") }).await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
