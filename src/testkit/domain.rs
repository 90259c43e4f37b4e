//! Builders for domain fixtures used across unit and integration tests.

use rust_decimal::Decimal;

use crate::domain::{Market, MarketId, MatchCache, Orderbook, Price, Venue};

/// Builds a binary market with sensible defaults; override fields on the
/// returned [`Market`] via its constructor when a test needs something
/// different.
#[must_use]
pub fn binary_market(venue: Venue, id: &str, title: &str) -> Market {
    Market::new(venue, id, title, None, 2, None, None, None, None, true)
}

/// Builds a binary market carrying a subtitle, for spot-lag fixtures.
#[must_use]
pub fn binary_market_with_subtitle(venue: Venue, id: &str, title: &str, subtitle: &str) -> Market {
    Market::new(
        venue,
        id,
        title,
        Some(subtitle.to_string()),
        2,
        None,
        None,
        None,
        None,
        true,
    )
}

/// Builds a categorical market with `outcome_count` outcomes and no token
/// ids populated — sufficient for matcher/evaluator tests that only need
/// the market's shape, not its token identities.
#[must_use]
pub fn categorical_market(venue: Venue, id: &str, title: &str, outcome_count: u8) -> Market {
    Market::new(venue, id, title, None, outcome_count, None, None, None, None, true)
}

/// Builds a binary orderbook from two fractional-dollar ask prices.
#[must_use]
pub fn binary_book(yes_ask: Decimal, no_ask: Decimal) -> Orderbook {
    Orderbook::binary(Price::new(yes_ask), Price::new(no_ask))
}

/// Builds a match cache with one pre-recorded venue-A → venue-B match.
#[must_use]
pub fn match_cache_with_pair(venue_a_id: &str, venue_b_id: &str) -> MatchCache {
    let mut cache = MatchCache::default();
    cache.record_match(&MarketId::from(venue_a_id), &MarketId::from(venue_b_id));
    cache
}
