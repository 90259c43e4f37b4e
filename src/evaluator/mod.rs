//! Arbitrage evaluator.
//!
//! Given up to four fractional-dollar asks for a matched pair (or a single
//! multi-outcome market), emits an [`Opportunity`] whenever one of the five
//! no-arbitrage inequalities in spec.md §4.3 is violated, plus the
//! venue-internal spot-lag predicate. Each predicate is evaluated
//! independently so a missing leg only suppresses its own predicate, never
//! the others (spec.md §7 bucket 2).

pub mod threshold;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{ArbType, MarketId, Opportunity, Price};
use threshold::Threshold;

/// Per-kind slippage/fee buffer gating the five cross/intra/multi-outcome
/// predicates (spec.md §4.3, named per the redesign note in §9).
pub const ARBITRAGE_FEE_BUFFER: Decimal = dec!(0.005);

/// Mispricing threshold `δ` for the spot-lag predicate (spec.md §4.3).
pub const SPOT_LAG_MISPRICING_THRESHOLD: Decimal = dec!(0.15);

/// Proximity gate `π` suppressing spot-lag opportunities near the
/// threshold (spec.md §4.3, property P6).
pub const SPOT_LAG_PROXIMITY_GATE: Decimal = dec!(0.05);

/// One leg's prices for a matched cross-venue pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairAsks {
    pub venue_a_yes: Option<Price>,
    pub venue_a_no: Option<Price>,
    pub venue_b_yes: Option<Price>,
    pub venue_b_no: Option<Price>,
}

fn profit_cents(cost: Decimal) -> Decimal {
    (dec!(1) - cost) * dec!(100)
}

fn passes_gate(cost: Decimal, min_profit_cents: Decimal) -> bool {
    cost < dec!(1) - ARBITRAGE_FEE_BUFFER && profit_cents(cost) >= min_profit_cents
}

/// Runs all four pairwise predicates (two cross-exchange, two intra-venue)
/// against one matched pair. Each predicate requires only its own legs to
/// be present; missing legs silently suppress that predicate (P2 is upheld
/// by `passes_gate`'s floor check).
#[allow(clippy::too_many_arguments)]
pub fn evaluate_pair(
    timestamp: DateTime<Utc>,
    market_pair: &str,
    venue_a_market: Option<&str>,
    venue_b_market: Option<&str>,
    venue_a_id: Option<MarketId>,
    venue_b_id: Option<MarketId>,
    asks: PairAsks,
    min_profit_cents: Decimal,
) -> Vec<Opportunity> {
    let mut opportunities = Vec::new();

    let base = |strategy: &str,
                arb_type: ArbType,
                price_a: Option<Decimal>,
                price_b: Option<Decimal>,
                total_cost: Decimal| Opportunity {
        timestamp,
        market_pair: market_pair.to_string(),
        venue_a_market: venue_a_market.map(str::to_string),
        venue_b_market: venue_b_market.map(str::to_string),
        strategy: strategy.to_string(),
        arb_type,
        price_a,
        price_b,
        total_cost,
        profit_cents: profit_cents(total_cost),
        venue_a_id: venue_a_id.clone(),
        venue_b_id: venue_b_id.clone(),
    };

    // cross A-YES / B-NO
    if let (Some(a_yes), Some(b_no)) = (asks.venue_a_yes, asks.venue_b_no) {
        let cost = a_yes + b_no;
        if passes_gate(cost, min_profit_cents) {
            opportunities.push(base(
                "venueA_yes_venueB_no",
                ArbType::CrossExchange,
                Some(a_yes.as_decimal()),
                Some(b_no.as_decimal()),
                cost,
            ));
        }
    }

    // cross B-YES / A-NO
    if let (Some(b_yes), Some(a_no)) = (asks.venue_b_yes, asks.venue_a_no) {
        let cost = b_yes + a_no;
        if passes_gate(cost, min_profit_cents) {
            opportunities.push(base(
                "venueB_yes_venueA_no",
                ArbType::CrossExchange,
                Some(a_no.as_decimal()),
                Some(b_yes.as_decimal()),
                cost,
            ));
        }
    }

    // intra A
    if let (Some(a_yes), Some(a_no)) = (asks.venue_a_yes, asks.venue_a_no) {
        let cost = a_yes + a_no;
        if passes_gate(cost, min_profit_cents) {
            opportunities.push(base(
                "buy_A_yes_and_no",
                ArbType::IntraA,
                Some(a_yes.as_decimal()),
                Some(a_no.as_decimal()),
                cost,
            ));
        }
    }

    // intra B
    if let (Some(b_yes), Some(b_no)) = (asks.venue_b_yes, asks.venue_b_no) {
        let cost = b_yes + b_no;
        if passes_gate(cost, min_profit_cents) {
            opportunities.push(base(
                "buy_B_yes_and_no",
                ArbType::IntraB,
                Some(b_yes.as_decimal()),
                Some(b_no.as_decimal()),
                cost,
            ));
        }
    }

    opportunities
}

/// Multi-outcome predicate: sum of per-outcome YES asks on one categorical
/// market with ≥3 outcomes.
pub fn evaluate_multi_outcome(
    timestamp: DateTime<Utc>,
    market_pair: &str,
    venue_market: &str,
    venue_id: MarketId,
    venue: crate::domain::Venue,
    yes_asks: &[Price],
    min_profit_cents: Decimal,
) -> Option<Opportunity> {
    if yes_asks.len() < 3 {
        return None;
    }
    let total_cost: Decimal = yes_asks.iter().map(|p| p.as_decimal()).sum();
    if !passes_gate(total_cost, min_profit_cents) {
        return None;
    }

    let strategy = format!("buy_all_{}_yes_outcomes", yes_asks.len());

    let (venue_a_id, venue_b_id, venue_a_market, venue_b_market) = match venue {
        crate::domain::Venue::CommitReveal => {
            (Some(venue_id), None, Some(venue_market.to_string()), None)
        }
        crate::domain::Venue::SignedRequest => {
            (None, Some(venue_id), None, Some(venue_market.to_string()))
        }
    };

    Some(Opportunity {
        timestamp,
        market_pair: market_pair.to_string(),
        venue_a_market,
        venue_b_market,
        strategy,
        arb_type: ArbType::MultiOutcome,
        price_a: None,
        price_b: None,
        total_cost,
        profit_cents: profit_cents(total_cost),
        venue_a_id,
        venue_b_id,
    })
}

/// Spot-lag predicate: compares a spot price against a title-parsed
/// threshold, gated by the proximity band (P6).
#[allow(clippy::too_many_arguments)]
pub fn evaluate_spot_lag(
    timestamp: DateTime<Utc>,
    market_pair: &str,
    venue_market: &str,
    venue_id: MarketId,
    venue: crate::domain::Venue,
    spot: Decimal,
    threshold: Threshold,
    yes_ask: Price,
) -> Option<Opportunity> {
    let near = |tau: Decimal| tau != dec!(0) && ((spot - tau) / tau).abs() <= SPOT_LAG_PROXIMITY_GATE;
    let in_proximity_band = match threshold {
        Threshold::Above { threshold } | Threshold::Below { threshold } => near(threshold),
        // A bracket has two edges; either one being near the spot price is
        // enough to wake the predicate (mirrors `is_near_threshold(spot, low)
        // or is_near_threshold(spot, high)`).
        Threshold::Bracket { low, high } => near(low) || near(high),
    };
    if !in_proximity_band {
        return None;
    }

    let y = yes_ask.as_decimal();
    let delta = SPOT_LAG_MISPRICING_THRESHOLD;

    let side = match threshold {
        Threshold::Above { threshold } => {
            if spot >= threshold && y < delta {
                Some("BUY YES")
            } else if spot < threshold && y > dec!(1) - delta {
                Some("BUY NO")
            } else {
                None
            }
        }
        Threshold::Below { threshold } => {
            if spot <= threshold && y < delta {
                Some("BUY YES")
            } else if spot > threshold && y > dec!(1) - delta {
                Some("BUY NO")
            } else {
                None
            }
        }
        Threshold::Bracket { low, high } => {
            let inside = spot >= low && spot <= high;
            if inside && y < delta {
                Some("BUY YES")
            } else if !inside && y > dec!(1) - delta {
                Some("BUY NO")
            } else {
                None
            }
        }
    }?;

    let total_cost = if side == "BUY YES" { y } else { dec!(1) - y };
    let profit = (dec!(1) - total_cost) * dec!(100);

    let (venue_a_id, venue_b_id, venue_a_market, venue_b_market) = match venue {
        crate::domain::Venue::CommitReveal => {
            (Some(venue_id), None, Some(venue_market.to_string()), None)
        }
        crate::domain::Venue::SignedRequest => {
            (None, Some(venue_id), None, Some(venue_market.to_string()))
        }
    };

    Some(Opportunity {
        timestamp,
        market_pair: market_pair.to_string(),
        venue_a_market,
        venue_b_market,
        strategy: if side == "BUY YES" {
            "spot_lag_buy_yes".to_string()
        } else {
            "spot_lag_buy_no".to_string()
        },
        arb_type: ArbType::SpotLag,
        price_a: Some(y),
        price_b: None,
        total_cost,
        profit_cents: profit,
        venue_a_id,
        venue_b_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Venue;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn scenario_1_cross_exchange_below_floor_emits_nothing() {
        let asks = PairAsks {
            venue_a_yes: Some(Price::new(dec!(0.48))),
            venue_a_no: Some(Price::new(dec!(0.55))),
            venue_b_yes: Some(Price::new(dec!(0.47))),
            venue_b_no: Some(Price::new(dec!(0.54))),
        };
        let opps = evaluate_pair(
            now(),
            "a / b",
            Some("a"),
            Some("b"),
            None,
            None,
            asks,
            dec!(1.0),
        );
        assert!(opps.is_empty());
    }

    #[test]
    fn scenario_1_raising_venue_b_no_creates_one_opportunity() {
        let asks = PairAsks {
            venue_a_yes: Some(Price::new(dec!(0.48))),
            venue_a_no: Some(Price::new(dec!(0.55))),
            venue_b_yes: Some(Price::new(dec!(0.47))),
            venue_b_no: Some(Price::new(dec!(0.50))),
        };
        let opps = evaluate_pair(
            now(),
            "a / b",
            Some("a"),
            Some("b"),
            None,
            None,
            asks,
            dec!(1.0),
        );
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].strategy, "venueA_yes_venueB_no");
        assert_eq!(opps[0].profit_cents, dec!(2.00));
    }

    #[test]
    fn scenario_2_intra_venue_one_cent_profit() {
        let asks = PairAsks {
            venue_a_yes: Some(Price::new(dec!(0.49))),
            venue_a_no: Some(Price::new(dec!(0.50))),
            venue_b_yes: None,
            venue_b_no: None,
        };
        let opps = evaluate_pair(now(), "a", Some("a"), None, None, None, asks, dec!(1.0));
        assert_eq!(opps.len(), 1);
        assert_eq!(opps[0].strategy, "buy_A_yes_and_no");
        assert_eq!(opps[0].profit_cents, dec!(1.00));
    }

    #[test]
    fn scenario_3_multi_outcome_four_way() {
        let asks = [
            Price::new(dec!(0.20)),
            Price::new(dec!(0.25)),
            Price::new(dec!(0.25)),
            Price::new(dec!(0.28)),
        ];
        let opp = evaluate_multi_outcome(
            now(),
            "multi",
            "market",
            MarketId::from("m1"),
            Venue::CommitReveal,
            &asks,
            dec!(0.5),
        )
        .unwrap();
        assert_eq!(opp.strategy, "buy_all_4_yes_outcomes");
        assert_eq!(opp.profit_cents, dec!(2.00));
    }

    #[test]
    fn scenario_4_spot_lag_above_market() {
        let opp = evaluate_spot_lag(
            now(),
            "crypto",
            "BTC $100,000 or above",
            MarketId::from("T-1"),
            Venue::SignedRequest,
            dec!(101000),
            Threshold::Above {
                threshold: dec!(100000),
            },
            Price::new(dec!(0.10)),
        )
        .unwrap();
        assert_eq!(opp.strategy, "spot_lag_buy_yes");
        assert_eq!(opp.profit_cents, dec!(90.00));
    }

    #[test]
    fn p6_spot_lag_outside_proximity_band_is_dormant() {
        let opp = evaluate_spot_lag(
            now(),
            "crypto",
            "BTC $100,000 or above",
            MarketId::from("T-1"),
            Venue::SignedRequest,
            dec!(150000),
            Threshold::Above {
                threshold: dec!(100000),
            },
            Price::new(dec!(0.10)),
        );
        assert!(opp.is_none());
    }

    #[test]
    fn p6_bracket_near_high_edge_wakes_the_predicate() {
        // low=90_000 is far from spot; only the upper edge (100_000) is
        // within the proximity band, and spot sits outside the bracket, so
        // a high yes-ask should trigger BUY NO.
        let opp = evaluate_spot_lag(
            now(),
            "crypto",
            "BTC between $90,000 and $100,000",
            MarketId::from("T-1"),
            Venue::SignedRequest,
            dec!(101000),
            Threshold::Bracket {
                low: dec!(90000),
                high: dec!(100000),
            },
            Price::new(dec!(0.90)),
        )
        .unwrap();
        assert_eq!(opp.strategy, "spot_lag_buy_no");
    }

    #[test]
    fn p6_bracket_far_from_both_edges_is_dormant() {
        let opp = evaluate_spot_lag(
            now(),
            "crypto",
            "BTC between $90,000 and $100,000",
            MarketId::from("T-1"),
            Venue::SignedRequest,
            dec!(150000),
            Threshold::Bracket {
                low: dec!(90000),
                high: dec!(100000),
            },
            Price::new(dec!(0.90)),
        );
        assert!(opp.is_none());
    }

    #[test]
    fn p2_no_opportunity_below_configured_floor() {
        let asks = PairAsks {
            venue_a_yes: Some(Price::new(dec!(0.495))),
            venue_a_no: Some(Price::new(dec!(0.50))),
            venue_b_yes: None,
            venue_b_no: None,
        };
        let opps = evaluate_pair(now(), "a", Some("a"), None, None, None, asks, dec!(5.0));
        assert!(opps.is_empty());
    }
}
