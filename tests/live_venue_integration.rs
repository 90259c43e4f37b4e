//! Live smoke tests against the real venue APIs.
//!
//! These tests make real HTTP requests and are gated behind the
//! `integration-tests` feature, plus `#[ignore]`, so a normal `cargo test`
//! never touches the network.
//!
//! ```bash
//! cargo test --features integration-tests -- --ignored
//! ```

#![cfg(feature = "integration-tests")]

use std::time::Duration;

use marketarb::venue::{MarketFilter, SpotOracle, SpotOracleConfig, VenueAConfig, VenueAdapter, VenueAdapterA};

fn venue_a_client() -> VenueAdapterA {
    VenueAdapterA::new(VenueAConfig {
        base_url: std::env::var("VENUE_A_BASE_URL")
            .unwrap_or_else(|_| "https://gamma-api.polymarket.com".to_string()),
        request_timeout: Duration::from_secs(10),
    })
    .expect("build venue-A client")
}

#[tokio::test]
#[ignore]
async fn venue_a_lists_at_least_one_open_market() {
    let client = venue_a_client();
    let markets = client
        .list_markets(&MarketFilter {
            open_only: true,
            limit: Some(5),
            ..Default::default()
        })
        .await
        .expect("list venue-A markets");
    assert!(!markets.is_empty(), "expected at least one open market");
}

#[tokio::test]
#[ignore]
async fn spot_oracle_returns_a_btc_price() {
    let oracle = SpotOracle::new(SpotOracleConfig::default()).expect("build spot oracle");
    let price = oracle
        .get_spot("BTC")
        .await
        .expect("fetch BTC spot price")
        .expect("BTC spot price should be present");
    assert!(price > rust_decimal_macros::dec!(0));
}
