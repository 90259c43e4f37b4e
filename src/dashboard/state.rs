//! The live-state snapshot published once per scan tick.
//!
//! The scan loop is the sole writer; the dashboard only ever reads a
//! cloned `Arc<LiveState>`, so there is no lock contention between the
//! scan loop and however many browsers are watching `/stream`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::domain::Opportunity;
use crate::scheduler::ErrorEntry;

#[derive(Debug, Clone, Serialize)]
pub struct OpportunityView {
    pub timestamp: DateTime<Utc>,
    pub market_pair: String,
    pub strategy: String,
    pub arb_type: &'static str,
    pub profit_cents: String,
}

impl From<&Opportunity> for OpportunityView {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            timestamp: opportunity.timestamp,
            market_pair: opportunity.market_pair.clone(),
            strategy: opportunity.strategy.clone(),
            arb_type: opportunity.arb_type.as_str(),
            profit_cents: opportunity.profit_cents.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub at: DateTime<Utc>,
    pub message: String,
}

impl From<&ErrorEntry> for ErrorView {
    fn from(entry: &ErrorEntry) -> Self {
        Self {
            at: entry.at,
            message: entry.message.clone(),
        }
    }
}

/// An immutable snapshot of everything the dashboard shows. Built fresh at
/// the end of every scan tick and never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct LiveState {
    pub last_tick_at: DateTime<Utc>,
    pub ticks_completed: u64,
    pub opportunities: Vec<OpportunityView>,
    pub recent_errors: Vec<ErrorView>,
}

impl LiveState {
    #[must_use]
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            last_tick_at: now,
            ticks_completed: 0,
            opportunities: Vec::new(),
            recent_errors: Vec::new(),
        }
    }
}

/// The write half held by the scan loop, and the read half handed to the
/// dashboard router.
#[must_use]
pub fn live_state_channel(initial: LiveState) -> (watch::Sender<Arc<LiveState>>, LiveStateReader) {
    let (tx, rx) = watch::channel(Arc::new(initial));
    (tx, LiveStateReader(rx))
}

#[derive(Clone)]
pub struct LiveStateReader(watch::Receiver<Arc<LiveState>>);

impl LiveStateReader {
    #[must_use]
    pub fn snapshot(&self) -> Arc<LiveState> {
        self.0.borrow().clone()
    }

    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.0.changed().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_has_no_opportunities() {
        let state = LiveState::empty(Utc::now());
        assert!(state.opportunities.is_empty());
        assert_eq!(state.ticks_completed, 0);
    }

    #[test]
    fn reader_observes_published_updates() {
        let (tx, reader) = live_state_channel(LiveState::empty(Utc::now()));
        let mut updated = (*reader.snapshot()).clone();
        updated.ticks_completed = 1;
        tx.send(Arc::new(updated)).unwrap();
        assert_eq!(reader.snapshot().ticks_completed, 1);
    }
}
