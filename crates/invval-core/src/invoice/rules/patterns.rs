//! Common regex patterns for invoice line classification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Leading run of uppercase label characters ("INVOICE", "TOTAL DUE")
    pub static ref LABEL_RUN: Regex = Regex::new(
        r"^[A-Z\s]+"
    ).unwrap();

    // Lines that close an address block
    pub static ref SECTION_BOUNDARY: Regex = Regex::new(
        r"^(?:Phone|Fax|INVOICE|TO:|FOR:)"
    ).unwrap();

    // Address-like content: starts with a digit or carries a letter
    pub static ref ADDRESS_LIKE: Regex = Regex::new(
        r"^[0-9]|[A-Za-z]"
    ).unwrap();

    // Quick-scan patterns over the whole text
    pub static ref SUMMARY_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)inv[oice]*.?\s*#?\s*:?\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref SUMMARY_DATE: Regex = Regex::new(
        r"(?i)date:?\s*(\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4})"
    ).unwrap();

    pub static ref SUMMARY_AMOUNT: Regex = Regex::new(
        r"(?i)(?:total|amount|sum):?\s*[$£€]?\s*(\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+[.,]\d{2})"
    ).unwrap();

    pub static ref SUMMARY_VENDOR: Regex = Regex::new(
        r"(?i)(?:from|vendor|company):?\s*([A-Za-z\s]+)"
    ).unwrap();

    // Outermost JSON object in a generated reply
    pub static ref JSON_OBJECT: Regex = Regex::new(
        r"(?s)\{.*\}"
    ).unwrap();

    // Characters dropped by text cleanup
    pub static ref NON_TEXT: Regex = Regex::new(
        r"[^\w\s.\-]"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
