use std::future::Future;
use tracing::warn;

use crate::error::Result;
use crate::utils::time::sleep_with_jitter;

/// Runs `operation` up to `max_attempts` times, doubling the delay between attempts.
/// Errors that are not retryable are returned immediately.
pub async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    base_delay_ms: u64,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    let mut delay = base_delay_ms;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay,
                    error = %e,
                    "Request failed, retrying"
                );

                sleep_with_jitter(delay, delay / 2).await;
                attempt += 1;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
