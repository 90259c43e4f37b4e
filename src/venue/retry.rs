//! Shared retry-on-rate-limit helper.
//!
//! Grounded on the backoff shape in `usealtoal-edgelord`'s
//! `core/exchange/reconnecting.rs` (`ReconnectingDataStream::next_delay`),
//! adapted from a circuit-breaker's growing delay to the fixed `1.5 · 2ⁿ`
//! seconds schedule spec.md §4.2/§5 names explicitly.

use std::time::Duration;

use tracing::warn;

/// Calls `op` once, then retries up to `max_attempts` more times (so up to
/// `max_attempts + 1` calls total), sleeping `1.5 * 2^n` seconds between
/// attempts when `op` reports a rate-limit response. Any other outcome —
/// success or a non-rate-limit failure — returns immediately.
///
/// `op` returns `Ok(Some(T))` on success, `Ok(None)` to signal "rate
/// limited, try again", and `Err` for anything that should not be retried.
pub async fn retry_on_rate_limit<T, F, Fut>(
    venue: &'static str,
    max_attempts: u32,
    mut op: F,
) -> crate::error::Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = crate::error::Result<Option<T>>>,
{
    let mut attempt = 0;
    loop {
        match op().await? {
            Some(value) => return Ok(Some(value)),
            None if attempt >= max_attempts => {
                warn!(venue, attempts = attempt + 1, "rate limit retries exhausted");
                return Ok(None);
            }
            None => {
                let delay_secs = 1.5_f64 * 2f64.powi(attempt as i32);
                warn!(venue, attempt, delay_secs, "rate limited, backing off");
                tokio::time::sleep(Duration::from_secs_f64(delay_secs)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_immediately_without_sleeping() {
        let calls = AtomicU32::new(0);
        let result = retry_on_rate_limit("venue_a", 3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(42))
        })
        .await
        .unwrap();
        assert_eq!(result, Some(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Option<i32> = retry_on_rate_limit("venue_b", 3, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        })
        .await
        .unwrap();
        assert_eq!(result, None);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn recovers_after_transient_rate_limit() {
        let calls = AtomicU32::new(0);
        let result = retry_on_rate_limit("venue_b", 3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(if n < 2 { None } else { Some("ok") }) }
        })
        .await
        .unwrap();
        assert_eq!(result, Some("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn recovers_after_three_rate_limits_per_scenario_six() {
        // spec.md §8 scenario 6: three 429s followed by a 200 — four total
        // calls — must succeed rather than exhaust retries.
        let calls = AtomicU32::new(0);
        let result = retry_on_rate_limit("venue_a", 3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(if n < 3 { None } else { Some("ok") }) }
        })
        .await
        .unwrap();
        assert_eq!(result, Some("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
