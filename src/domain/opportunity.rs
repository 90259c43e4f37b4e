//! Opportunity records emitted by the evaluator and the logical-constraint
//! detector.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::market::{MarketId, Venue};

/// Which no-arbitrage inequality (or logical constraint) an opportunity
/// violates. Mirrors the `arb_type` enumeration in `spec.md` §3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArbType {
    CrossExchange,
    IntraA,
    IntraB,
    MultiOutcome,
    SpotLag,
    LogicalSuperset,
    LogicalMutualExclusion,
}

impl ArbType {
    /// The `arb_type` column value used in the CSV/relational sinks.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArbType::CrossExchange => "cross_exchange",
            ArbType::IntraA => "intra_A",
            ArbType::IntraB => "intra_B",
            ArbType::MultiOutcome => "multi_outcome",
            ArbType::SpotLag => "spot_lag",
            ArbType::LogicalSuperset => "logical_superset_venue_a",
            ArbType::LogicalMutualExclusion => "logical_mutual_exclusion_venue_a",
        }
    }
}

/// An immutable arbitrage opportunity, as discovered by one tick of the
/// scan loop.
///
/// Opportunities are constructed fresh per tick (see `spec.md` §3) and
/// never mutated after creation; only the bounded in-memory ring (see
/// `crate::sinks::ring`) and the append-only sinks retain them.
#[derive(Debug, Clone)]
pub struct Opportunity {
    pub timestamp: DateTime<Utc>,
    pub market_pair: String,
    pub venue_a_market: Option<String>,
    pub venue_b_market: Option<String>,
    pub strategy: String,
    pub arb_type: ArbType,
    pub price_a: Option<Decimal>,
    pub price_b: Option<Decimal>,
    pub total_cost: Decimal,
    pub profit_cents: Decimal,
    pub venue_a_id: Option<MarketId>,
    pub venue_b_id: Option<MarketId>,
}

impl Opportunity {
    /// Does this opportunity involve the given venue as a leg source?
    #[must_use]
    pub fn touches(&self, venue: Venue) -> bool {
        match venue {
            Venue::CommitReveal => self.venue_a_id.is_some(),
            Venue::SignedRequest => self.venue_b_id.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample() -> Opportunity {
        Opportunity {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            market_pair: "a / b".into(),
            venue_a_market: Some("a".into()),
            venue_b_market: Some("b".into()),
            strategy: "venueA_yes_venueB_no".to_string(),
            arb_type: ArbType::CrossExchange,
            price_a: Some(dec!(0.48)),
            price_b: Some(dec!(0.50)),
            total_cost: dec!(0.98),
            profit_cents: dec!(2.00),
            venue_a_id: Some(MarketId::from("a")),
            venue_b_id: Some(MarketId::from("b")),
        }
    }

    #[test]
    fn arb_type_strings_are_stable() {
        assert_eq!(ArbType::CrossExchange.as_str(), "cross_exchange");
        assert_eq!(ArbType::MultiOutcome.as_str(), "multi_outcome");
        assert_eq!(ArbType::SpotLag.as_str(), "spot_lag");
    }

    #[test]
    fn touches_reports_both_venues_for_cross_exchange() {
        let opp = sample();
        assert!(opp.touches(Venue::CommitReveal));
        assert!(opp.touches(Venue::SignedRequest));
    }
}
