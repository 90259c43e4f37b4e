//! Append-only CSV opportunity log.
//!
//! The header is bit-exact per spec.md §6, kept as the literal venue names
//! (`poly`/`kalshi`) the original format used even though the rest of the
//! crate speaks venue-neutral names — this is the one place the wire
//! format outlives the rename.

use std::path::{Path, PathBuf};

use crate::domain::Opportunity;
use crate::error::Result;

const HEADER: &str = "timestamp,market_pair,polymarket_market,kalshi_market,strategy,poly_price,kalshi_price,total_cost,profit_cents,poly_market_id,kalshi_ticker,arb_type";

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Opens (creating if absent) the CSV file at `path`, writing the
    /// header on first creation only.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            std::fs::write(&path, format!("{HEADER}\n"))?;
        }
        Ok(Self { path })
    }

    /// Appends one row. Prices/cost at 4 dp, profit at 2 dp, per spec.md
    /// §6.
    pub fn append(&self, opportunity: &Opportunity) -> Result<()> {
        let file = std::fs::OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record([
            opportunity.timestamp.to_rfc3339(),
            opportunity.market_pair.clone(),
            opportunity.venue_a_market.clone().unwrap_or_default(),
            opportunity.venue_b_market.clone().unwrap_or_default(),
            opportunity.strategy.clone(),
            format_price(opportunity.price_a),
            format_price(opportunity.price_b),
            format!("{:.4}", opportunity.total_cost),
            format!("{:.2}", opportunity.profit_cents),
            opportunity
                .venue_a_id
                .as_ref()
                .map_or(String::new(), |id| id.to_string()),
            opportunity
                .venue_b_id
                .as_ref()
                .map_or(String::new(), |id| id.to_string()),
            opportunity.arb_type.as_str().to_string(),
        ])?;
        writer.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn format_price(price: Option<rust_decimal::Decimal>) -> String {
    price.map_or(String::new(), |p| format!("{p:.4}"))
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
    fn writes_header_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opps.csv");
        CsvSink::open(&path).unwrap();
        CsvSink::open(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches(HEADER).count(), 1);
    }

    #[test]
    fn header_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opps.csv");
        CsvSink::open(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.lines().next().unwrap(),
            "timestamp,market_pair,polymarket_market,kalshi_market,strategy,poly_price,kalshi_price,total_cost,profit_cents,poly_market_id,kalshi_ticker,arb_type"
        );
    }

    #[test]
    fn appends_row_with_expected_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opps.csv");
        let sink = CsvSink::open(&path).unwrap();
        sink.append(&sample()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let row = contents.lines().nth(1).unwrap();
        assert!(row.contains("0.4800"));
        assert!(row.contains("0.5000"));
        assert!(row.contains("2.00"));
    }
}
