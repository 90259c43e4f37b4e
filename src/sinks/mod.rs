//! Fan-out of one emitted opportunity to every configured sink.
//!
//! A tick calls `OpportunityLog::record` once per opportunity; the CSV
//! file, the relational log, and the in-memory ring all stay consistent
//! because there is exactly one call site, per spec.md §5.

pub mod csv_sink;
pub mod db;
pub mod ring;

use parking_lot::Mutex;
use tracing::warn;

use crate::domain::Opportunity;
use crate::error::Result;

pub use csv_sink::CsvSink;
pub use ring::OpportunityRing;

/// Identifies this process in the `bot` column of the relational log; lets
/// several scanner instances share one database.
const BOT_NAME: &str = "marketarb";

pub struct OpportunityLog {
    csv: CsvSink,
    db: Option<db::DbPool>,
    ring: Mutex<OpportunityRing>,
}

impl OpportunityLog {
    #[must_use]
    pub fn new(csv: CsvSink, db: Option<db::DbPool>) -> Self {
        Self {
            csv,
            db,
            ring: Mutex::new(OpportunityRing::new()),
        }
    }

    /// Appends `opportunity` to every sink. The CSV write and the ring push
    /// are infallible in practice; a database write failure is logged and
    /// does not stop the CSV/ring from recording, since the bot's primary
    /// output is the CSV log and the database is a queryable mirror.
    ///
    /// # Errors
    /// Returns an error only if the CSV append fails.
    pub fn record(&self, opportunity: &Opportunity) -> Result<()> {
        self.csv.append(opportunity)?;
        if let Some(pool) = &self.db {
            if let Err(e) = db::insert_opportunity(pool, BOT_NAME, opportunity) {
                warn!(error = %e, "failed to persist opportunity to database");
            }
        }
        self.ring.lock().push(opportunity.clone());
        Ok(())
    }

    /// A snapshot of the most recently recorded opportunities, newest last,
    /// for the dashboard's live state.
    #[must_use]
    pub fn recent(&self) -> Vec<Opportunity> {
        self.ring.lock().recent().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample() -> Opportunity {
        Opportunity {
            timestamp: Utc::now(),
            market_pair: "a / b".into(),
            venue_a_market: Some("a".into()),
            venue_b_market: Some("b".into()),
            strategy: "venueA_yes_venueB_no".into(),
            arb_type: crate::domain::ArbType::CrossExchange,
            price_a: Some(dec!(0.48)),
            price_b: Some(dec!(0.50)),
            total_cost: dec!(0.98),
            profit_cents: dec!(2.00),
            venue_a_id: Some(crate::domain::MarketId::from("a1")),
            venue_b_id: Some(crate::domain::MarketId::from("T-1")),
        }
    }

    #[test]
    fn record_without_db_updates_csv_and_ring() {
        let dir = tempfile::tempdir().unwrap();
        let csv = CsvSink::open(dir.path().join("opps.csv")).unwrap();
        let log = OpportunityLog::new(csv, None);
        log.record(&sample()).unwrap();
        assert_eq!(log.recent().len(), 1);
    }

    #[test]
    fn record_with_db_persists_to_both() {
        let dir = tempfile::tempdir().unwrap();
        let csv = CsvSink::open(dir.path().join("opps.csv")).unwrap();
        let pool = db::create_pool(":memory:").unwrap();
        let log = OpportunityLog::new(csv, Some(pool.clone()));
        log.record(&sample()).unwrap();
        assert_eq!(log.recent().len(), 1);
        assert_eq!(db::recent_rows(&pool, 10).unwrap().len(), 1);
    }
}
