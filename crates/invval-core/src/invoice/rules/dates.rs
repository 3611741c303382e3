//! Invoice date normalization.

use chrono::NaiveDate;

/// Formats seen on English-language invoices, most specific first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%m/%d/%y",
];

/// Parse a date as written on an invoice.
pub fn parse_invoice_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_end_matches('.');
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Normalize a written date to ISO 8601 (`YYYY-MM-DD`).
pub fn normalize_date(s: &str) -> Option<String> {
    parse_invoice_date(s).map(|d| d.format("%Y-%m-%d").to_string())
}
