//! The periodic scan-tick driver.
//!
//! Grounded on the backoff/circuit-breaker shape in
//! `usealtoal-edgelord`'s `core/exchange/reconnecting.rs`, adapted from a
//! per-connection reconnect loop to the tick-pacing + never-overlap
//! guarantee spec.md §4.1/§5 requires: a scan never overlaps itself, and
//! per-venue call pacing is expressed as token buckets (the §9 redesign
//! hint) rather than ad-hoc sleeps.

mod error_ring;

pub use error_ring::{ErrorEntry, ErrorRing};

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use governor::{Quota, RateLimiter};
use tokio::sync::watch;
use tracing::{error, info, warn};

type VenueLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Per-venue request-pacing budgets (spec.md §4.1).
pub struct VenuePacing {
    pub venue_a: Arc<VenueLimiter>,
    pub venue_b: Arc<VenueLimiter>,
}

impl VenuePacing {
    #[must_use]
    pub fn new(venue_a_per_sec: u32, venue_b_per_sec: u32) -> Self {
        Self {
            venue_a: Arc::new(RateLimiter::direct(Quota::per_second(
                NonZeroU32::new(venue_a_per_sec).unwrap_or(NonZeroU32::new(1).unwrap()),
            ))),
            venue_b: Arc::new(RateLimiter::direct(Quota::per_second(
                NonZeroU32::new(venue_b_per_sec).unwrap_or(NonZeroU32::new(1).unwrap()),
            ))),
        }
    }

    /// Blocks (cooperatively) until the venue-A budget admits one more
    /// call.
    pub async fn pace_venue_a(&self) {
        self.venue_a.until_ready().await;
    }

    /// Blocks until the venue-B budget admits one more call.
    pub async fn pace_venue_b(&self) {
        self.venue_b.until_ready().await;
    }
}

/// Drives one tick at a time, never overlapping, honoring a shutdown
/// signal between ticks and between the suspension points inside one tick.
///
/// `tick` returns the wall-clock duration the caller should treat as
/// "elapsed work" — the scheduler sleeps `max(1s, interval - elapsed)`
/// before the next tick, per spec.md §4.1.
pub async fn run_scan_loop<F, Fut>(
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut tick: F,
) where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    loop {
        if *shutdown.borrow() {
            info!("shutdown signal received, exiting scan loop");
            return;
        }

        let started = Instant::now();
        tick().await;
        let elapsed = started.elapsed();

        let sleep_for = interval
            .checked_sub(elapsed)
            .unwrap_or(Duration::from_secs(0))
            .max(Duration::from_secs(1));

        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {}
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("shutdown signal received during sleep, exiting scan loop");
                    return;
                }
            }
        }
    }
}
