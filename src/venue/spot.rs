//! Spot-price oracle for the spot-lag predicate.
//!
//! Unauthenticated, unsigned; the only operation is `get_spot(pair)`, which
//! spec.md §4.2 carves out as oracle-only (neither venue A nor venue B
//! implements it). A `pair` is a bare coin symbol (e.g. `"BTC"`), grounded
//! on `original_source/crypto_monitor.py`'s `coin` identifiers.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use super::retry_on_rate_limit;
use crate::error::Result;

const MAX_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct SpotOracleConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for SpotOracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.example-spot-oracle.com/simple/price".to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }
}

pub struct SpotOracle {
    client: reqwest::Client,
    config: SpotOracleConfig,
}

impl SpotOracle {
    pub fn new(config: SpotOracleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Looks up the current spot price for `pair` (e.g. `"BTC"`), in USD.
    pub async fn get_spot(&self, pair: &str) -> Result<Option<Decimal>> {
        let pair = pair.to_string();
        let price = retry_on_rate_limit("spot_oracle", MAX_RETRY_ATTEMPTS, || {
            let pair = pair.clone();
            async move {
                let resp = self
                    .client
                    .get(&self.config.base_url)
                    .query(&[("ids", pair.to_lowercase()), ("vs_currencies", "usd".into())])
                    .send()
                    .await?;
                if resp.status().as_u16() == 429 {
                    return Ok(None);
                }
                if !resp.status().is_success() {
                    return Ok(Some(None));
                }
                let body: HashMap<String, PriceEntry> = resp.json().await.unwrap_or_default();
                let price = body.get(&pair.to_lowercase()).map(|e| e.usd);
                Ok(Some(price))
            }
        })
        .await?
        .flatten();

        Ok(price)
    }
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    usd: Decimal,
}
