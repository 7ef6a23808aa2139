// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Bounded retry around single remote calls.
//!
//! | fault          | handling                                             |
//! |----------------|------------------------------------------------------|
//! | `RateLimited`  | back off and retry, up to the attempt cap            |
//! | `Unavailable`  | back off and retry, sharing the same attempt counter |
//! | `AuthExpired`  | refresh credentials once, then retry once            |
//! | `NotFound`     | surfaced immediately, never retried                  |
//! | `Rejected`     | surfaced immediately                                 |

use std::future::Future;
use std::time::Duration;

use crate::backend::CalendarBackend;
use crate::config::RetryConfig;
use crate::error::{Fault, RemoteError, SyncError};

/// Attempt cap and backoff for transient faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` counts the first call and is at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Attempts per operation, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the retry following the `failures`-th transient failure.
    #[must_use]
    pub fn delay(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, config.base_delay())
    }
}

/// Runs `call` until it succeeds or the policy gives up.
///
/// `call` is invoked afresh for every attempt. Credentials are refreshed
/// through `backend` at most once.
///
/// # Errors
///
/// Returns the [`SyncError`] matching the last fault seen.
pub async fn with_retry<B, F, Fut, T>(
    policy: &RetryPolicy,
    backend: &B,
    operation: &str,
    mut call: F,
) -> Result<T, SyncError>
where
    B: CalendarBackend + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let mut failures = 0;
    let mut refreshed = false;
    loop {
        let err = match call().await {
            Ok(value) => {
                if failures > 0 || refreshed {
                    tracing::info!(operation, failures, refreshed, "call succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        match err.fault {
            Fault::RateLimited | Fault::Unavailable => {
                failures += 1;
                if failures >= policy.max_attempts {
                    tracing::warn!(operation, attempts = failures, error = %err, "giving up");
                    return Err(exhausted(err, failures));
                }
                let delay = policy.delay(failures);
                tracing::warn!(
                    operation,
                    attempt = failures,
                    ?delay,
                    error = %err,
                    "transient fault, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Fault::AuthExpired => {
                if refreshed {
                    tracing::warn!(operation, error = %err, "credentials rejected after refresh");
                    return Err(SyncError::AuthFailed(err.message));
                }
                refreshed = true;
                tracing::info!(operation, "credentials expired, refreshing");
                if let Err(refresh) = backend.refresh_credentials().await {
                    tracing::warn!(operation, error = %refresh, "credential refresh failed");
                    return Err(SyncError::AuthFailed(refresh.message));
                }
            }
            Fault::NotFound => return Err(SyncError::NotFound(err.message)),
            Fault::Rejected => return Err(SyncError::Rejected(err.message)),
        }
    }
}

fn exhausted(err: RemoteError, attempts: u32) -> SyncError {
    match err.fault {
        Fault::RateLimited => SyncError::RateLimited {
            attempts,
            message: err.message,
        },
        _ => SyncError::Unavailable {
            attempts,
            message: err.message,
        },
    }
}
