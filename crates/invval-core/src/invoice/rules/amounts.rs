//! Amount parsing and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount as written on an invoice ("$1,125.00", "375.00/hr", "3.0").
///
/// Currency symbols and unit suffixes are dropped. When both `,` and `.` occur
/// the later one is the decimal separator; a lone `,` followed by exactly three
/// digits is a thousands separator.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(c), None) => {
            let fraction = &cleaned[c + 1..];
            if fraction.len() == 3 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (None, _) => cleaned,
    };

    Decimal::from_str(&normalized).ok()
}

/// Render a computed amount without trailing zeros ("1125", "1126.5").
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}
