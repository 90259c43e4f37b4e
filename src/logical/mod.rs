//! Logical-constraint detector.
//!
//! Mines temporal-superset relationships between same-venue market titles
//! and flags pricing inversions (spec.md §4.5), plus an optional mutual-
//! exclusion check. Grounded on
//! `original_source/logical_constraints.py`'s `find_temporal_supersets` /
//! `detect_violations`.

pub mod dates;

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{ArbType, ConstraintKind, LogicalConstraint, Market, MarketId, Opportunity};
use chrono::{DateTime, Utc};
use dates::extract_deadline;

/// Minimum non-date-token overlap for two titles to be treated as the same
/// underlying topic (spec.md §4.5).
const TOPIC_OVERLAP_THRESHOLD: f64 = 0.60;

/// Default superset tolerance (spec.md §4.5).
const SUPERSET_TOLERANCE: Decimal = dec!(0.02);

/// Fee buffer subtracted from a constraint violation before estimating
/// profit (spec.md §4.5, named per the redesign note in §9).
const LOGICAL_FEE_BUFFER: Decimal = dec!(0.03);

/// Strips date phrases from a lowercased title and returns its remaining
/// token set, mirroring the two `re.sub` calls in
/// `find_temporal_supersets`.
fn non_date_tokens(title: &str) -> HashSet<String> {
    let lower = title.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut words = lower.split_whitespace().peekable();
    while let Some(word) = words.next() {
        if word == "by" {
            // consume "by <word> <word>" as a date phrase
            words.next();
            words.next();
            continue;
        }
        if word == "in" {
            if let Some(next) = words.peek() {
                if next.len() == 4 && next.chars().all(|c| c.is_ascii_digit()) {
                    words.next();
                    continue;
                }
            }
        }
        out.push_str(word);
        out.push(' ');
    }
    out.split_whitespace().map(str::to_string).collect()
}

fn topic_overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let denom = a.len().max(b.len()).max(1) as f64;
    let overlap = a.intersection(b).count() as f64;
    overlap / denom
}

/// Finds temporal-superset constraints among `markets`, all assumed to
/// belong to one venue. Every pair whose titles clear the topic-overlap
/// threshold and both carry a parseable deadline yields one constraint,
/// oriented earlier → later.
#[must_use]
pub fn find_temporal_supersets(markets: &[Market]) -> Vec<LogicalConstraint> {
    let dated: Vec<(&Market, chrono::NaiveDate)> = markets
        .iter()
        .filter_map(|m| extract_deadline(m.title()).map(|d| (m, d)))
        .collect();

    let mut constraints = Vec::new();
    for i in 0..dated.len() {
        for j in (i + 1)..dated.len() {
            let (m1, d1) = dated[i];
            let (m2, d2) = dated[j];
            if d1 == d2 {
                continue;
            }
            let tokens1 = non_date_tokens(m1.title());
            let tokens2 = non_date_tokens(m2.title());
            if topic_overlap(&tokens1, &tokens2) <= TOPIC_OVERLAP_THRESHOLD {
                continue;
            }
            let (earlier, later, earlier_date, later_date) = if d1 < d2 {
                (m1, m2, d1, d2)
            } else {
                (m2, m1, d2, d1)
            };
            constraints.push(LogicalConstraint::superset(
                earlier.id().clone(),
                later.id().clone(),
                SUPERSET_TOLERANCE,
                format!(
                    "earlier date ({earlier_date}) must be <= later date ({later_date})"
                ),
            ));
        }
    }
    constraints
}

/// Checks one superset constraint against current YES-ask prices. A
/// violation occurs when `price(earlier) > price(later) + tolerance` (P5:
/// swapping the two prices turns a violation into a non-violation).
#[must_use]
pub fn evaluate_superset(
    constraint: &LogicalConstraint,
    prices: &std::collections::HashMap<MarketId, Decimal>,
    timestamp: DateTime<Utc>,
    venue: crate::domain::Venue,
    min_profit_cents: Decimal,
) -> Option<Opportunity> {
    let (earlier_id, later_id) = constraint.as_superset_pair();
    let earlier_price = *prices.get(earlier_id)?;
    let later_price = *prices.get(later_id)?;

    if earlier_price <= later_price + constraint.tolerance() {
        return None;
    }

    let violation = earlier_price - later_price;
    let profit_cents = (violation - LOGICAL_FEE_BUFFER) * dec!(100);
    if profit_cents < min_profit_cents {
        return None;
    }

    Some(logical_opportunity(
        timestamp,
        venue,
        later_id.clone(),
        "buy_later_yes_buy_earlier_no",
        ArbType::LogicalSuperset,
        earlier_price,
        later_price,
        profit_cents,
        constraint.description(),
    ))
}

/// Mutual-exclusion check: `sum(price_i) > 1 + tolerance` implies all
/// outcomes are over-priced — sell every one (spec.md §4.5).
#[must_use]
pub fn evaluate_mutual_exclusion(
    constraint: &LogicalConstraint,
    prices: &std::collections::HashMap<MarketId, Decimal>,
    timestamp: DateTime<Utc>,
    venue: crate::domain::Venue,
    min_profit_cents: Decimal,
) -> Option<Opportunity> {
    let total: Decimal = constraint
        .market_ids()
        .iter()
        .map(|id| prices.get(id).copied().unwrap_or(dec!(0)))
        .sum();

    if total <= dec!(1) + constraint.tolerance() {
        return None;
    }

    let violation = total - dec!(1);
    let profit_cents = (violation - LOGICAL_FEE_BUFFER) * dec!(100);
    if profit_cents < min_profit_cents {
        return None;
    }

    let primary = constraint.market_ids().first()?.clone();
    Some(logical_opportunity(
        timestamp,
        venue,
        primary,
        "buy_all_no_positions",
        ArbType::LogicalMutualExclusion,
        total,
        dec!(1),
        profit_cents,
        constraint.description(),
    ))
}

/// Builds a logical-constraint opportunity. `primary_id` is the market
/// whose mispricing the strategy acts on directly (the later market for a
/// superset violation, the first leg for mutual exclusion) — both legs of
/// a logical constraint live on the same venue, so only one of
/// `venue_a_id`/`venue_b_id` is ever populated.
#[allow(clippy::too_many_arguments)]
fn logical_opportunity(
    timestamp: DateTime<Utc>,
    venue: crate::domain::Venue,
    primary_id: MarketId,
    strategy: &'static str,
    arb_type: ArbType,
    price_a: Decimal,
    price_b: Decimal,
    profit_cents: Decimal,
    description: &str,
) -> Opportunity {
    let (venue_a_id, venue_b_id) = match venue {
        crate::domain::Venue::CommitReveal => (Some(primary_id), None),
        crate::domain::Venue::SignedRequest => (None, Some(primary_id)),
    };
    Opportunity {
        timestamp,
        market_pair: description.to_string(),
        venue_a_market: None,
        venue_b_market: None,
        strategy: strategy.to_string(),
        arb_type,
        price_a: Some(price_a),
        price_b: Some(price_b),
        total_cost: price_a + price_b,
        profit_cents,
        venue_a_id,
        venue_b_id,
    }
}
