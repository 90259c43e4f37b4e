//! Orchestration: wires the scheduler, venue adapters, matcher, evaluator,
//! logical-constraint detector, sinks, and dashboard state into one scan
//! tick (spec.md §2's data-flow diagram).

pub mod config;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::dashboard::state::{live_state_channel, ErrorView, LiveState, LiveStateReader, OpportunityView};
use crate::domain::{Market, MarketId, Opportunity, Orderbook, Venue};
use crate::error::Result;
use crate::evaluator::{self, threshold, PairAsks};
use crate::logical;
use crate::matcher::MarketMatcher;
use crate::scheduler::{ErrorRing, VenuePacing};
use crate::sinks::{db, CsvSink, OpportunityLog};
use crate::venue::{MarketFilter, RequestSigner, SpotOracle, SpotOracleConfig, VenueAConfig, VenueAdapter, VenueAdapterA, VenueAdapterB, VenueBConfig};

pub use config::Config;

/// Venue-B ticker prefixes that identify a crypto series, restored from
/// `original_source/crypto_monitor.py`'s `coin_from_ticker`.
const CRYPTO_TICKER_PREFIXES: &[(&str, &str)] = &[("KXBTC", "BTC"), ("KXETH", "ETH"), ("KXSOL", "SOL")];

fn coin_from_ticker(ticker: &str) -> Option<&'static str> {
    CRYPTO_TICKER_PREFIXES
        .iter()
        .find(|(prefix, _)| ticker.starts_with(prefix))
        .map(|(_, coin)| *coin)
}

/// Everything one scan tick needs. Built once at startup from [`Config`]
/// and then driven by [`crate::scheduler::run_scan_loop`].
pub struct App {
    venue_a: Arc<dyn VenueAdapter>,
    venue_b: Arc<dyn VenueAdapter>,
    spot: SpotOracle,
    pacing: VenuePacing,
    matcher: Mutex<MarketMatcher>,
    log: OpportunityLog,
    errors: Mutex<ErrorRing>,
    state_tx: watch::Sender<Arc<LiveState>>,
    min_profit_cents: Decimal,
    rematch_interval_secs: i64,
    ticks_completed: std::sync::atomic::AtomicU64,
}

impl App {
    /// Builds every collaborator from `config`. The venue-B adapter is only
    /// constructed if a signing key is configured; without one, venue B is
    /// simply absent from the scan (a structural degradation, not fatal).
    ///
    /// # Errors
    /// Returns `Error::Signing` if a venue-B key is configured but cannot
    /// be loaded, or any sink construction error (database pool, CSV file).
    pub fn build(config: &Config) -> Result<(Arc<Self>, LiveStateReader)> {
        let venue_a = VenueAdapterA::new(VenueAConfig {
            base_url: config.venue_a.base_url.clone(),
            request_timeout: std::time::Duration::from_secs(10),
        })?;

        let venue_b: Arc<dyn VenueAdapter> = match &config.venue_b.private_key_path {
            Some(key_path) => {
                let access_key = config.venue_b.access_key.clone().unwrap_or_default();
                let signer = RequestSigner::load(access_key, key_path)?;
                let adapter = VenueAdapterB::new(
                    VenueBConfig {
                        base_url: config.venue_b.base_url.clone(),
                        request_timeout: std::time::Duration::from_secs(10),
                        category_allowlist: Some(
                            crate::venue::DEFAULT_CATEGORY_ALLOWLIST
                                .iter()
                                .map(|s| s.to_string())
                                .collect(),
                        ),
                    },
                    signer,
                )?;
                Arc::new(adapter)
            }
            None => {
                warn!("no venue-B signing key configured; venue B will report no markets");
                Arc::new(NullVenueAdapter(Venue::SignedRequest))
            }
        };

        let spot = SpotOracle::new(SpotOracleConfig::default())?;
        let pacing = VenuePacing::new(
            config.venue_a.requests_per_second,
            config.venue_b.requests_per_second,
        );
        let matcher = MarketMatcher::new(&config.match_cache_path)?;

        let csv = CsvSink::open(&config.log_file)?;
        let db_pool = db::create_pool(&config.database_url).ok();
        let log = OpportunityLog::new(csv, db_pool);

        let (state_tx, state_reader) = live_state_channel(LiveState::empty(Utc::now()));

        let app = Self {
            venue_a: Arc::new(venue_a),
            venue_b,
            spot,
            pacing,
            matcher: Mutex::new(matcher),
            log,
            errors: Mutex::new(ErrorRing::new()),
            state_tx,
            min_profit_cents: config.min_profit_cents,
            rematch_interval_secs: crate::matcher::DEFAULT_REMATCH_INTERVAL_SECS,
            ticks_completed: std::sync::atomic::AtomicU64::new(0),
        };

        Ok((Arc::new(app), state_reader))
    }

    fn record_error(&self, at: DateTime<Utc>, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "tick error recorded");
        self.errors.lock().push(at, message);
    }

    /// Runs one scan tick: fetch → match → evaluate → detect → sink →
    /// publish. Never returns an error: every failure degrades to a logged,
    /// ring-buffered entry per spec.md §7, so the scheduler's loop never
    /// aborts on a bad tick.
    pub async fn tick(&self) {
        let timestamp = Utc::now();
        let mut opportunities: Vec<Opportunity> = Vec::new();

        // The two venues' market lists are wholly independent; fetch them
        // in parallel rather than paying their latencies back to back.
        let venue_a_fut = async {
            self.pacing.pace_venue_a().await;
            self.venue_a
                .list_markets(&MarketFilter { open_only: true, ..Default::default() })
                .await
        };
        let venue_b_fut = async {
            self.pacing.pace_venue_b().await;
            self.venue_b
                .list_markets(&MarketFilter { open_only: true, ..Default::default() })
                .await
        };
        let (venue_a_result, venue_b_result) = tokio::join!(venue_a_fut, venue_b_fut);

        let venue_a_markets = match venue_a_result {
            Ok(markets) => markets,
            Err(e) => {
                self.record_error(timestamp, format!("venue_a list_markets failed: {e}"));
                Vec::new()
            }
        };
        let venue_b_markets = match venue_b_result {
            Ok(markets) => markets,
            Err(e) => {
                self.record_error(timestamp, format!("venue_b list_markets failed: {e}"));
                Vec::new()
            }
        };

        let venue_b_titles: HashMap<MarketId, String> = venue_b_markets
            .iter()
            .filter(|m| m.is_binary())
            .map(|m| (m.id().clone(), m.title().to_string()))
            .collect();
        let venue_b_by_id: HashMap<MarketId, &Market> =
            venue_b_markets.iter().map(|m| (m.id().clone(), m)).collect();

        // cross-exchange, per matched pair
        for market in venue_a_markets.iter().filter(|m| m.is_binary()) {
            let matched_id = {
                let mut matcher = self.matcher.lock();
                match matcher.match_one(market, &venue_b_titles) {
                    Ok(id) => id,
                    Err(e) => {
                        self.record_error(timestamp, format!("match_one failed: {e}"));
                        None
                    }
                }
            };
            let Some(venue_b_id) = matched_id else { continue };
            let Some(venue_b_market) = venue_b_by_id.get(&venue_b_id) else { continue };

            self.pacing.pace_venue_a().await;
            let a_book = self.venue_a.get_orderbook(market.id()).await.unwrap_or(None);
            self.pacing.pace_venue_b().await;
            let b_book = self.venue_b.get_orderbook(&venue_b_id).await.unwrap_or(None);

            let asks = PairAsks {
                venue_a_yes: a_book.as_ref().and_then(binary_yes_ask),
                venue_a_no: a_book.as_ref().and_then(binary_no_ask),
                venue_b_yes: b_book.as_ref().and_then(binary_yes_ask),
                venue_b_no: b_book.as_ref().and_then(binary_no_ask),
            };
            opportunities.extend(evaluator::evaluate_pair(
                timestamp,
                &format!("{} / {}", market.title(), venue_b_market.title()),
                Some(market.title()),
                Some(venue_b_market.title()),
                Some(market.id().clone()),
                Some(venue_b_id.clone()),
                asks,
                self.min_profit_cents,
            ));
        }

        // multi-outcome, per categorical market on either venue
        for (adapter, markets, venue) in [
            (&self.venue_a, &venue_a_markets, Venue::CommitReveal),
            (&self.venue_b, &venue_b_markets, Venue::SignedRequest),
        ] {
            for market in markets.iter().filter(|m| m.is_categorical()) {
                self.pacing_for(venue).await;
                let Ok(Some(Orderbook::Categorical { outcomes })) = adapter.get_orderbook(market.id()).await else {
                    continue;
                };
                let yes_asks: Vec<_> = outcomes.iter().map(|o| o.ask()).collect();
                if let Some(opp) = evaluator::evaluate_multi_outcome(
                    timestamp,
                    market.title(),
                    market.title(),
                    market.id().clone(),
                    venue,
                    &yes_asks,
                    self.min_profit_cents,
                ) {
                    opportunities.push(opp);
                }
            }
        }

        // spot-lag, venue-B crypto markets only (spec.md §4.2's oracle carve-out).
        // Every candidate's spot price is independent of every other's, so
        // they're all fetched concurrently before any orderbook is pulled.
        let spot_candidates: Vec<(&Market, &'static str, threshold::Threshold)> = venue_b_markets
            .iter()
            .filter(|m| m.is_binary())
            .filter_map(|market| {
                let coin = coin_from_ticker(market.id().as_str())?;
                let subtitle = market.subtitle()?;
                let parsed = threshold::parse_subtitle(subtitle)?;
                Some((market, coin, parsed))
            })
            .collect();

        let spot_results = futures_util::future::join_all(spot_candidates.iter().map(
            |(_, coin, _)| {
                let coin = *coin;
                async move { self.spot.get_spot(coin).await }
            },
        ))
        .await;

        for ((market, coin, parsed), spot_result) in spot_candidates.iter().zip(spot_results) {
            let spot = match spot_result {
                Ok(Some(price)) => price,
                Ok(None) => continue,
                Err(e) => {
                    self.record_error(timestamp, format!("spot oracle failed for {coin}: {e}"));
                    continue;
                }
            };

            self.pacing.pace_venue_b().await;
            let Ok(Some(book)) = self.venue_b.get_orderbook(market.id()).await else { continue };
            let Some(yes_ask) = binary_yes_ask(&book) else { continue };

            if let Some(opp) = evaluator::evaluate_spot_lag(
                timestamp,
                market.title(),
                market.title(),
                market.id().clone(),
                Venue::SignedRequest,
                spot,
                *parsed,
                yes_ask,
            ) {
                opportunities.push(opp);
            }
        }

        // logical constraints: temporal supersets mined per venue
        for (markets, venue) in [
            (&venue_a_markets, Venue::CommitReveal),
            (&venue_b_markets, Venue::SignedRequest),
        ] {
            let binary_markets: Vec<Market> = markets.iter().filter(|m| m.is_binary()).cloned().collect();
            let constraints = logical::find_temporal_supersets(&binary_markets);
            if constraints.is_empty() {
                continue;
            }

            let mut prices: HashMap<MarketId, Decimal> = HashMap::new();
            for constraint in &constraints {
                for id in constraint.market_ids() {
                    if prices.contains_key(id) {
                        continue;
                    }
                    self.pacing_for(venue).await;
                    let adapter: &Arc<dyn VenueAdapter> = match venue {
                        Venue::CommitReveal => &self.venue_a,
                        Venue::SignedRequest => &self.venue_b,
                    };
                    if let Ok(Some(book)) = adapter.get_orderbook(id).await {
                        if let Some(ask) = binary_yes_ask(&book) {
                            prices.insert(id.clone(), ask.as_decimal());
                        }
                    }
                }
            }

            for constraint in &constraints {
                if let Some(opp) = logical::evaluate_superset(
                    constraint,
                    &prices,
                    timestamp,
                    venue,
                    self.min_profit_cents,
                ) {
                    opportunities.push(opp);
                }
            }
        }

        for opportunity in &opportunities {
            if let Err(e) = self.log.record(opportunity) {
                self.record_error(timestamp, format!("failed to record opportunity: {e}"));
            }
        }

        if self.matcher.lock().due_for_rematch_sweep(self.rematch_interval_secs) {
            let venue_a_titles: HashMap<MarketId, String> = venue_a_markets
                .iter()
                .filter(|m| m.is_binary())
                .map(|m| (m.id().clone(), m.title().to_string()))
                .collect();
            match self.matcher.lock().rematch_unmatched(&venue_a_titles, &venue_b_titles) {
                Ok(n) if n > 0 => info!(new_matches = n, "re-match sweep promoted unmatched markets"),
                Ok(_) => {}
                Err(e) => self.record_error(timestamp, format!("rematch sweep failed: {e}")),
            }
        }

        self.publish_state(timestamp);

        info!(
            venue_a_markets = venue_a_markets.len(),
            venue_b_markets = venue_b_markets.len(),
            opportunities = opportunities.len(),
            "scan tick complete"
        );
    }

    async fn pacing_for(&self, venue: Venue) {
        match venue {
            Venue::CommitReveal => self.pacing.pace_venue_a().await,
            Venue::SignedRequest => self.pacing.pace_venue_b().await,
        }
    }

    fn publish_state(&self, timestamp: DateTime<Utc>) {
        let ticks = self.ticks_completed.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
        let recent = self.log.recent();
        let errors = self.errors.lock();
        let state = LiveState {
            last_tick_at: timestamp,
            ticks_completed: ticks,
            opportunities: recent.iter().map(OpportunityView::from).collect(),
            recent_errors: errors.entries().map(ErrorView::from).collect(),
        };
        let _ = self.state_tx.send(Arc::new(state));
    }
}

fn binary_yes_ask(book: &Orderbook) -> Option<crate::domain::Price> {
    match book {
        Orderbook::Binary { yes_ask, .. } => Some(*yes_ask),
        Orderbook::Categorical { .. } => None,
    }
}

fn binary_no_ask(book: &Orderbook) -> Option<crate::domain::Price> {
    match book {
        Orderbook::Binary { no_ask, .. } => Some(*no_ask),
        Orderbook::Categorical { .. } => None,
    }
}

/// Stands in for venue B when no signing key is configured; reports an
/// empty universe rather than failing the tick.
struct NullVenueAdapter(Venue);

#[async_trait::async_trait]
impl VenueAdapter for NullVenueAdapter {
    fn venue(&self) -> Venue {
        self.0
    }

    async fn list_markets(&self, _filter: &MarketFilter) -> Result<Vec<Market>> {
        Ok(Vec::new())
    }

    async fn get_orderbook(&self, _market_id: &MarketId) -> Result<Option<Orderbook>> {
        Ok(None)
    }

    async fn get_best_prices(
        &self,
        _token_id: &crate::domain::TokenId,
    ) -> Result<(Option<crate::domain::Price>, Option<crate::domain::Price>)> {
        Ok((None, None))
    }
}
