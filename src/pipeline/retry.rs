//! Bounded retry with exponential backoff.
//!
//! Used by the collection and filtering stages for transient failures only.
//! The pure stages (aggregation, recommendation) are never retried: their
//! failures are deterministic.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Run `op`, retrying up to `max_retries` times when `is_transient` says a
/// retry could help. Backoff doubles each attempt starting from `backoff`.
pub async fn with_retry<T, E, F, Fut>(
    max_retries: u32,
    backoff: Duration,
    is_transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries && is_transient(&err) => {
                let delay = backoff * 2u32.saturating_pow(attempt);
                warn!(
                    error = %err,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
