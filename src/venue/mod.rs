//! Venue abstraction layer.
//!
//! Each venue hides its transport and wire format behind
//! [`VenueAdapter`]. Orderbook ladder reduction happens inside the adapter
//! (see `crate::domain::Orderbook::from_ladders`) so the matcher and
//! evaluator never see venue-specific field names — the redesign hint in
//! `spec.md` §9.

mod retry;
mod signing;
mod spot;
mod venue_a;
mod venue_b;

pub use retry::retry_on_rate_limit;
pub use signing::RequestSigner;
pub use spot::{SpotOracle, SpotOracleConfig};
pub use venue_a::{VenueAConfig, VenueAdapterA};
pub use venue_b::{VenueBConfig, VenueAdapterB, DEFAULT_CATEGORY_ALLOWLIST};

use async_trait::async_trait;

use crate::domain::{Market, MarketId, Orderbook, Price, TokenId};
use crate::error::Result;

/// Optional filter applied when listing markets; `None` fields are
/// unconstrained.
#[derive(Debug, Clone, Default)]
pub struct MarketFilter {
    pub categories: Option<Vec<String>>,
    pub open_only: bool,
    pub limit: Option<usize>,
}

/// Capability interface every venue adapter implements.
///
/// An operation that hits a transient transport failure (rate limit,
/// timeout, empty body) returns `Ok(None)` / `Ok(vec![])` after retrying
/// per [`retry_on_rate_limit`] rather than an `Err` — the pipeline treats
/// "no data" as "skip this pair", never as a reason to abort the tick.
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    fn venue(&self) -> crate::domain::Venue;

    async fn list_markets(&self, filter: &MarketFilter) -> Result<Vec<Market>>;

    async fn get_orderbook(&self, market_id: &MarketId) -> Result<Option<Orderbook>>;

    async fn get_best_prices(&self, token_id: &TokenId) -> Result<(Option<Price>, Option<Price>)>;
}
