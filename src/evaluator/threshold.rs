//! Kalshi-style subtitle threshold grammar.
//!
//! Grounded on `original_source/crypto_monitor.py`'s `parse_kalshi_subtitle`:
//! commas are stripped first, then three shapes are tried in order.

use rust_decimal::Decimal;
use std::str::FromStr;

/// A parsed subtitle threshold, feeding the spot-lag predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Above { threshold: Decimal },
    Below { threshold: Decimal },
    Bracket { low: Decimal, high: Decimal },
}

/// Parses a subtitle like `"$77,500 or above"`, `"$58,499.99 or below"`, or
/// `"$76,500 to 76,999.99"`. Returns `None` for anything else — this is a
/// structural miss, not an error (spec.md §7 bucket 2).
#[must_use]
pub fn parse_subtitle(subtitle: &str) -> Option<Threshold> {
    let stripped = subtitle.replace(',', "");

    if let Some(num) = match_after_dollar_prefix(&stripped, " or above") {
        return Some(Threshold::Above { threshold: num });
    }
    if let Some(num) = match_after_dollar_prefix(&stripped, " or below") {
        return Some(Threshold::Below { threshold: num });
    }
    if let Some((low, high)) = match_bracket(&stripped) {
        return Some(Threshold::Bracket { low, high });
    }
    None
}

fn match_after_dollar_prefix(s: &str, suffix: &str) -> Option<Decimal> {
    let s = s.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let (num, rest) = split_leading_number(s)?;
    if rest.trim_start() == suffix.trim() {
        Decimal::from_str(num).ok()
    } else {
        None
    }
}

fn match_bracket(s: &str) -> Option<(Decimal, Decimal)> {
    let s = s.trim();
    let s = s.strip_prefix('$').unwrap_or(s);
    let (low, rest) = split_leading_number(s)?;
    let rest = rest.trim_start().strip_prefix("to")?.trim_start();
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let (high, _) = split_leading_number(rest)?;
    Some((Decimal::from_str(low).ok()?, Decimal::from_str(high).ok()?))
}

/// Splits a leading run of digits/`.` off `s`, returning `(number, rest)`.
fn split_leading_number(s: &str) -> Option<(&str, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map_or(s.len(), |(i, _)| i);
    if end == 0 {
        None
    } else {
        Some((&s[..end], &s[end..]))
    }
}
