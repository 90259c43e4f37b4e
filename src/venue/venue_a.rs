//! Commit-reveal / CLOB venue adapter (venue A).
//!
//! Markets are listed from a catalog endpoint; orderbooks are quoted as a
//! direct outcome → `{bid, ask}` mapping in fractional dollars, the first of
//! the two ladder shapes spec.md §3 describes — no ladder reduction needed
//! here, unlike venue B (see `crate::venue::venue_b`).

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{Market, MarketId, Orderbook, Price, TokenId, Venue};
use crate::error::Result;

use super::{retry_on_rate_limit, MarketFilter, VenueAdapter};

const MAX_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct VenueAConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for VenueAConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gamma-api.example-venue-a.com".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

pub struct VenueAdapterA {
    client: reqwest::Client,
    config: VenueAConfig,
}

impl VenueAdapterA {
    pub fn new(config: VenueAConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    async fn fetch_markets_page(&self, filter: &MarketFilter) -> Result<Option<Vec<RawMarket>>> {
        let mut req = self
            .client
            .get(format!("{}/markets", self.config.base_url))
            .query(&[("closed", (!filter.open_only).to_string())]);
        if let Some(limit) = filter.limit {
            req = req.query(&[("limit", limit.to_string())]);
        }
        let resp = req.send().await?;
        if resp.status().as_u16() == 429 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "venue_a list_markets non-success");
            return Ok(Some(Vec::new()));
        }
        let markets: Vec<RawMarket> = resp.json().await.unwrap_or_default();
        Ok(Some(markets))
    }

    async fn fetch_book(&self, market_id: &MarketId) -> Result<Option<Option<RawBook>>> {
        let resp = self
            .client
            .get(format!(
                "{}/book?market={}",
                self.config.base_url,
                market_id.as_str()
            ))
            .send()
            .await?;
        if resp.status().as_u16() == 429 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Ok(Some(None));
        }
        let book: Option<RawBook> = resp.json().await.ok();
        Ok(Some(book))
    }
}

#[async_trait]
impl VenueAdapter for VenueAdapterA {
    fn venue(&self) -> Venue {
        Venue::CommitReveal
    }

    async fn list_markets(&self, filter: &MarketFilter) -> Result<Vec<Market>> {
        let raw = retry_on_rate_limit("venue_a", MAX_RETRY_ATTEMPTS, || {
            self.fetch_markets_page(filter)
        })
        .await?
        .unwrap_or_default();

        Ok(raw.into_iter().filter_map(RawMarket::into_market).collect())
    }

    async fn get_orderbook(&self, market_id: &MarketId) -> Result<Option<Orderbook>> {
        let book = retry_on_rate_limit("venue_a", MAX_RETRY_ATTEMPTS, || {
            self.fetch_book(market_id)
        })
        .await?
        .flatten();

        Ok(book.and_then(RawBook::into_orderbook))
    }

    async fn get_best_prices(&self, token_id: &TokenId) -> Result<(Option<Price>, Option<Price>)> {
        let resp = retry_on_rate_limit("venue_a", MAX_RETRY_ATTEMPTS, || async {
            let resp = self
                .client
                .get(format!(
                    "{}/prices?token_id={}",
                    self.config.base_url,
                    token_id.as_str()
                ))
                .send()
                .await?;
            if resp.status().as_u16() == 429 {
                return Ok(None);
            }
            let prices: RawPrices = resp.json().await.unwrap_or_default();
            Ok(Some(prices))
        })
        .await?;

        Ok(resp
            .map(|p| (p.bid.map(Price::new), p.ask.map(Price::new)))
            .unwrap_or((None, None)))
    }
}

#[derive(Debug, Deserialize)]
struct RawMarket {
    id: String,
    question: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    clob_token_ids: Option<Vec<String>>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    closed: bool,
}

impl RawMarket {
    fn into_market(self) -> Option<Market> {
        let token_ids = self
            .clob_token_ids
            .map(|ids| ids.into_iter().map(TokenId::from).collect::<Vec<_>>());
        let outcome_count = token_ids.as_ref().map_or(2, |t| t.len() as u8).max(2);
        Some(Market::new(
            Venue::CommitReveal,
            MarketId::from(self.id),
            self.question,
            self.description,
            outcome_count,
            token_ids,
            None,
            None,
            self.category,
            !self.closed,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPrices {
    bid: Option<Decimal>,
    ask: Option<Decimal>,
}

/// Venue A's book shape: a direct outcome → `{bid, ask}` mapping, already in
/// fractional dollars — no ladder reduction required.
#[derive(Debug, Deserialize)]
struct RawBook {
    #[serde(default)]
    yes: Option<RawSide>,
    #[serde(default)]
    no: Option<RawSide>,
}

#[derive(Debug, Deserialize)]
struct RawSide {
    ask: Decimal,
}

impl RawBook {
    fn into_orderbook(self) -> Option<Orderbook> {
        let yes_ask = self.yes?.ask;
        let no_ask = self.no?.ask;
        Some(Orderbook::binary(Price::new(yes_ask), Price::new(no_ask)))
    }
}
