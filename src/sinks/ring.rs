//! Bounded in-memory ring of recent opportunities, feeding the dashboard.
//!
//! Capacity fixed at 200 per spec.md §3/§4.6.

use std::collections::VecDeque;

use crate::domain::Opportunity;

const CAPACITY: usize = 200;

#[derive(Debug, Default)]
pub struct OpportunityRing {
    entries: VecDeque<Opportunity>,
}

impl OpportunityRing {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(CAPACITY),
        }
    }

    pub fn push(&mut self, opportunity: Opportunity) {
        if self.entries.len() == CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(opportunity);
    }

    #[must_use]
    pub fn recent(&self) -> impl Iterator<Item = &Opportunity> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample(n: u32) -> Opportunity {
        Opportunity {
            timestamp: Utc::now(),
            market_pair: format!("pair-{n}"),
            venue_a_market: None,
            venue_b_market: None,
            strategy: "buy_A_yes_and_no".to_string(),
            arb_type: crate::domain::ArbType::IntraA,
            price_a: None,
            price_b: None,
            total_cost: dec!(0.99),
            profit_cents: dec!(1.00),
            venue_a_id: None,
            venue_b_id: None,
        }
    }

    #[test]
    fn drops_oldest_past_capacity() {
        let mut ring = OpportunityRing::new();
        for i in 0..250 {
            ring.push(sample(i));
        }
        assert_eq!(ring.len(), 200);
        assert_eq!(ring.recent().next().unwrap().market_pair, "pair-50");
    }
}
