//! Text cleanup helpers.

use super::patterns::{NON_TEXT, WHITESPACE_RUN};

/// Split extracted text into trimmed lines, keeping blank lines as separators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim().to_string()).collect()
}

/// Collapse whitespace and drop characters other than word characters, `.` and `-`.
pub fn clean_extracted_text(s: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(s.trim(), " ");
    NON_TEXT.replace_all(&collapsed, "").into_owned()
}

/// Strip an invoice number down to word characters and dashes ("#00012" -> "00012").
pub fn clean_invoice_number(s: &str) -> Option<String> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if cleaned.is_empty() { None } else { Some(cleaned) }
}
