//! Calendar date helpers.

use chrono::NaiveDate;

/// Storage key format for a calendar day.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Every calendar day from `from` to `to`, both inclusive.
///
/// Days are stepped on naive dates, so there is no timezone or DST drift.
/// An unparseable bound or `from > to` yields an empty list.
pub fn dates_between(from: &str, to: &str) -> Vec<String> {
    let (Some(from), Some(to)) = (parse_date(from), parse_date(to)) else {
        tracing::warn!("Ignoring unparseable date range {}..{}", from, to);
        return Vec::new();
    };

    from.iter_days()
        .take_while(|day| *day <= to)
        .map(|day| day.format(DATE_FORMAT).to_string())
        .collect()
}
