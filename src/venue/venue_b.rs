//! Signed-request venue adapter (venue B).
//!
//! Orderbooks are quoted as two price-level ladders (`yes`, `no`), each
//! `[[cents, size], ...]` with the last element as the best bid; the ask for
//! one side is derived from the opposite side's best bid (see
//! `crate::domain::Orderbook::from_ladders`). Every request is signed per
//! spec.md §4.2/§6, grounded on `original_source/kalshi_client.py`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{Market, MarketId, Orderbook, Price, TokenId, Venue};
use crate::error::Result;

use super::signing::RequestSigner;
use super::{retry_on_rate_limit, MarketFilter, VenueAdapter};

const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Restored from `original_source/kalshi_client.py`'s
/// `get_non_sports_markets` category filter (see `SPEC_FULL.md` §7).
pub const DEFAULT_CATEGORY_ALLOWLIST: &[&str] = &[
    "Politics",
    "Financials",
    "Science and Technology",
    "Climate and Weather",
    "Social",
    "World",
    "Entertainment",
];

#[derive(Debug, Clone)]
pub struct VenueBConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub category_allowlist: Option<Vec<String>>,
}

impl Default for VenueBConfig {
    fn default() -> Self {
        Self {
            base_url: "https://trading-api.example-venue-b.com".to_string(),
            request_timeout: Duration::from_secs(10),
            category_allowlist: Some(
                DEFAULT_CATEGORY_ALLOWLIST
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }
}

pub struct VenueAdapterB {
    client: reqwest::Client,
    config: VenueBConfig,
    signer: RequestSigner,
}

impl VenueAdapterB {
    pub fn new(config: VenueBConfig, signer: RequestSigner) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            signer,
        })
    }

    fn signed_get(&self, path: &str) -> Result<reqwest::RequestBuilder> {
        let timestamp_ms = Utc::now().timestamp_millis();
        let headers = self.signer.sign(timestamp_ms, "GET", path, "")?;
        Ok(self
            .client
            .get(format!("{}{path}", self.config.base_url))
            .header(headers.access_key.0, headers.access_key.1)
            .header(headers.access_signature.0, headers.access_signature.1)
            .header(headers.access_timestamp.0, headers.access_timestamp.1))
    }

    async fn fetch_markets_page(&self, filter: &MarketFilter) -> Result<Option<Vec<RawMarket>>> {
        let req = self.signed_get("/trade-api/v2/markets")?;
        let resp = req.send().await?;
        if resp.status().as_u16() == 429 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "venue_b list_markets non-success");
            return Ok(Some(Vec::new()));
        }
        let body: RawMarketsResponse = resp.json().await.unwrap_or_default();
        let allowed = filter
            .categories
            .as_ref()
            .or(self.config.category_allowlist.as_ref());
        let markets = body
            .markets
            .into_iter()
            .filter(|m| match allowed {
                None => true,
                Some(list) => m
                    .category
                    .as_deref()
                    .map_or(false, |c| list.iter().any(|a| a == c)),
            })
            .collect();
        Ok(Some(markets))
    }

    async fn fetch_orderbook(&self, market_id: &MarketId) -> Result<Option<Option<RawOrderbook>>> {
        let path = format!("/trade-api/v2/markets/{}/orderbook", market_id.as_str());
        let req = self.signed_get(&path)?;
        let resp = req.send().await?;
        if resp.status().as_u16() == 429 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Ok(Some(None));
        }
        let body: Option<RawOrderbookResponse> = resp.json().await.ok();
        Ok(Some(body.map(|b| b.orderbook)))
    }
}

#[async_trait]
impl VenueAdapter for VenueAdapterB {
    fn venue(&self) -> Venue {
        Venue::SignedRequest
    }

    async fn list_markets(&self, filter: &MarketFilter) -> Result<Vec<Market>> {
        let raw = retry_on_rate_limit("venue_b", MAX_RETRY_ATTEMPTS, || {
            self.fetch_markets_page(filter)
        })
        .await?
        .unwrap_or_default();

        Ok(raw.into_iter().filter_map(RawMarket::into_market).collect())
    }

    async fn get_orderbook(&self, market_id: &MarketId) -> Result<Option<Orderbook>> {
        let book = retry_on_rate_limit("venue_b", MAX_RETRY_ATTEMPTS, || {
            self.fetch_orderbook(market_id)
        })
        .await?
        .flatten();

        Ok(book.and_then(RawOrderbook::into_orderbook))
    }

    async fn get_best_prices(&self, token_id: &TokenId) -> Result<(Option<Price>, Option<Price>)> {
        // Venue B quotes per-market ladders, not per-token prices; a
        // well-formed request against a market id used as a token id
        // degrades to "no data" rather than a protocol error.
        let _ = token_id;
        Ok((None, None))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawMarketsResponse {
    #[serde(default)]
    markets: Vec<RawMarket>,
}

#[derive(Debug, Deserialize)]
struct RawMarket {
    ticker: String,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RawMarket {
    fn into_market(self) -> Option<Market> {
        let open = self
            .status
            .as_deref()
            .map_or(true, |s| s == "active" || s == "open");
        Some(Market::new(
            Venue::SignedRequest,
            MarketId::from(self.ticker),
            self.title,
            self.subtitle,
            2,
            None,
            None,
            None,
            self.category,
            open,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RawOrderbookResponse {
    orderbook: RawOrderbook,
}

#[derive(Debug, Deserialize)]
struct RawOrderbook {
    #[serde(default)]
    yes: Vec<(i64, i64)>,
    #[serde(default)]
    no: Vec<(i64, i64)>,
}

impl RawOrderbook {
    fn into_orderbook(self) -> Option<Orderbook> {
        Orderbook::from_ladders(&self.yes, &self.no)
    }
}
