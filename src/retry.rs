//! Retry and deadline enforcement for the effectful fetch boundary.
//!
//! Only the Sample Loader's remote read is allowed to fail transiently;
//! everything else in the pipeline is pure. These helpers keep that boundary
//! explicit: transient storage errors are retried with exponential backoff,
//! non-transient ones surface immediately.

use crate::storage::{StorageError, StorageErrorKind, StorageResult};
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Configuration for retry behavior on transient storage failures.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
        }
    }
}

/// Retry `operation` with exponential backoff while it fails transiently.
///
/// Non-transient errors (not-found, permission) and exhausted attempts
/// return the last error unchanged.
///
/// # Errors
///
/// Returns the final error once `max_attempts` is reached or a
/// non-retryable error kind is seen.
pub fn retry_transient<F, T>(policy: &RetryPolicy, mut operation: F) -> StorageResult<T>
where
    F: FnMut() -> StorageResult<T>,
{
    let mut attempt = 0;
    let mut delay_ms = policy.initial_delay_ms;

    loop {
        attempt += 1;
        match operation() {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !err.is_transient() || attempt >= policy.max_attempts {
                    return Err(err);
                }
                std::thread::sleep(Duration::from_millis(delay_ms));
                delay_ms = delay_ms.saturating_mul(2).min(policy.max_delay_ms);
            }
        }
    }
}

/// Execute one fetch under an optional deadline.
///
/// The check is post-hoc: a slow fetch still completes, but its result is
/// discarded and reported as a `Timeout` so the row is handled like any
/// other storage failure.
///
/// # Errors
///
/// Returns the operation's own error, or a `Timeout` storage error when the
/// deadline was exceeded.
pub fn with_deadline<F, T>(deadline: Option<Duration>, operation: F) -> StorageResult<T>
where
    F: FnOnce() -> StorageResult<T>,
{
    let Some(limit) = deadline else {
        return operation();
    };
    let start = Instant::now();
    let result = operation()?;
    if start.elapsed() > limit {
        Err(StorageError::new(
            StorageErrorKind::Timeout,
            format!("fetch exceeded deadline of {limit:?}"),
        ))
    } else {
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    #[test]
    fn transient_errors_are_retried_until_success() {
        let mut calls = 0;
        let result = retry_transient(&fast_policy(3), || {
            calls += 1;
            if calls < 3 {
                Err(StorageError::new(StorageErrorKind::Network, "flaky"))
            } else {
                Ok(42)
            }
        });
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 3);
    }

    #[test]
    fn non_transient_errors_fail_immediately() {
        let mut calls = 0;
        let result: StorageResult<()> = retry_transient(&fast_policy(5), || {
            calls += 1;
            Err(StorageError::new(StorageErrorKind::NotFound, "gone"))
        });
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::NotFound);
        assert_eq!(calls, 1);
    }

    #[test]
    fn attempts_are_capped() {
        let mut calls = 0;
        let result: StorageResult<()> = retry_transient(&fast_policy(4), || {
            calls += 1;
            Err(StorageError::new(StorageErrorKind::Unavailable, "down"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 4);
    }

    #[test]
    fn deadline_converts_slow_fetches_to_timeouts() {
        let result = with_deadline(Some(Duration::from_millis(1)), || {
            std::thread::sleep(Duration::from_millis(10));
            Ok(b"late".to_vec())
        });
        assert_eq!(result.unwrap_err().kind, StorageErrorKind::Timeout);
    }

    #[test]
    fn no_deadline_means_no_check() {
        let result = with_deadline(None, || Ok(1u8));
        assert_eq!(result.unwrap(), 1);
    }
}
