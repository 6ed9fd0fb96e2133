//! Bounded retry with a fixed delay between attempts.
//!
//! Only startup code uses this (connecting to the database before serving traffic).
//! Request handling never retries.

use std::fmt::Display;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` of zero is treated as one attempt.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Run `operation` until it succeeds or the policy is exhausted.
/// Returns the last error when every attempt failed.
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: &RetryPolicy,
    what: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        info!(operation = what, attempt, max_attempts = policy.max_attempts, "attempt");
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = what, attempt, "succeeded after retries");
                }
                return Ok(value);
            }
            Err(error) if attempt < policy.max_attempts => {
                warn!(
                    operation = what,
                    attempt,
                    error = %error,
                    next_attempt_in = ?policy.delay,
                    "attempt failed, retrying"
                );
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(error) => {
                warn!(operation = what, attempt, error = %error, "giving up");
                return Err(error);
            }
        }
    }
}
