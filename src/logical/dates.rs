//! Title date grammar.
//!
//! Grounded on `original_source/logical_constraints.py`'s
//! `extract_date_from_title`: four patterns, tried in order, first match
//! wins (spec.md §6).

use chrono::{Datelike, NaiveDate, Utc};

/// Extracts a deadline date from a market title, per spec.md §6's grammar.
/// Returns `None` when no pattern matches — a structural miss, not an
/// error.
#[must_use]
pub fn extract_deadline(title: &str) -> Option<NaiveDate> {
    let lower = title.to_lowercase();

    if let Some(date) = match_month_year(&lower) {
        return Some(date);
    }
    if let Some(date) = match_month_day(&lower) {
        return Some(date);
    }
    if let Some(date) = match_year(&lower) {
        return Some(date);
    }
    if let Some(date) = match_quarter_year(&lower) {
        return Some(date);
    }
    None
}

/// "by <Month> <YYYY>" → first of that month.
fn match_month_year(lower: &str) -> Option<NaiveDate> {
    let rest = lower.split("by ").nth(1)?;
    let mut tokens = rest.split_whitespace();
    let month_str = tokens.next()?;
    let year_str = tokens.next()?;
    let month = month_from_name(month_str)?;
    let year_digits: String = year_str.chars().take_while(|c| c.is_ascii_digit()).collect();
    if year_digits.len() != 4 {
        return None;
    }
    let year: i32 = year_digits.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// "by <Month> <D>" → that day in the current or next year.
fn match_month_day(lower: &str) -> Option<NaiveDate> {
    let rest = lower.split("by ").nth(1)?;
    let mut tokens = rest.split_whitespace();
    let month_str = tokens.next()?;
    let day_str = tokens.next()?;
    let month = month_from_name(month_str)?;
    let day: u32 = day_str.trim_end_matches(|c: char| !c.is_ascii_digit()).parse().ok()?;

    let current_year = Utc::now().year();
    let candidate = NaiveDate::from_ymd_opt(current_year, month, day)?;
    let today = Utc::now().date_naive();
    if candidate < today {
        NaiveDate::from_ymd_opt(current_year + 1, month, day)
    } else {
        Some(candidate)
    }
}

/// "in <YYYY>" → end of year.
fn match_year(lower: &str) -> Option<NaiveDate> {
    let rest = lower.split("in ").nth(1)?;
    let year_str: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if year_str.len() != 4 {
        return None;
    }
    let year: i32 = year_str.parse().ok()?;
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// "by Q[1-4] <YYYY>" → first day of the quarter's final month.
fn match_quarter_year(lower: &str) -> Option<NaiveDate> {
    let rest = lower.split("by q").nth(1)?;
    let mut chars = rest.chars();
    let quarter: u32 = chars.next()?.to_digit(10)?;
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let rest: String = chars.collect();
    let year_str: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if year_str.len() != 4 {
        return None;
    }
    let year: i32 = year_str.parse().ok()?;
    NaiveDate::from_ymd_opt(year, quarter * 3, 1)
}

fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim_end_matches(|c: char| !c.is_ascii_alphabetic());
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_by_month_year() {
        let date = extract_deadline("Rate cut by March 2026").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    }

    #[test]
    fn parses_in_year_as_end_of_year() {
        let date = extract_deadline("Will it happen in 2027").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2027, 12, 31).unwrap());
    }

    #[test]
    fn parses_by_quarter_year() {
        let date = extract_deadline("Launched by Q2 2026").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
    }

    #[test]
    fn unparseable_title_returns_none() {
        assert_eq!(extract_deadline("Will the Lakers win?"), None);
    }

    #[test]
    fn short_numeric_token_after_month_falls_through_to_month_day() {
        // "by March 15" must not be swallowed by the month-year tier
        // parsing "15" as a (bogus) year; it should fall through to the
        // month-day tier instead.
        let date = extract_deadline("Resolution by March 15").unwrap();
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 15);
        assert_ne!(date.year(), 15);
    }

    #[test]
    fn month_year_takes_precedence_over_month_day_pattern() {
        // "by March 2026" could ambiguously look like "by <month> <day>"
        // with day=2026; the month-year tier must win since it's tried first.
        let date = extract_deadline("Resolution by March 2026").unwrap();
        assert_eq!(date.year(), 2026);
        assert_eq!(date.day(), 1);
    }
}
