//! Quick regex scan for headline invoice fields.
//!
//! Independent of the line scanner: each pattern is tried on every line and
//! the first hit per field wins. Used to fill gaps the scanner leaves and for
//! a fast preview of unstructured text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rules::patterns::{
    SUMMARY_AMOUNT, SUMMARY_DATE, SUMMARY_INVOICE_NUMBER, SUMMARY_VENDOR,
};
use super::rules::{clean_extracted_text, parse_amount};

/// Headline fields found by the quick scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
}

impl QuickSummary {
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.date.is_none()
            && self.amount.is_none()
            && self.vendor_name.is_none()
    }
}

/// Scan `text` line by line for invoice number, date, total and vendor name.
pub fn quick_summary(text: &str) -> QuickSummary {
    let mut summary = QuickSummary::default();

    for line in text.lines() {
        if summary.invoice_number.is_none() {
            if let Some(caps) = SUMMARY_INVOICE_NUMBER.captures(line) {
                summary.invoice_number = Some(caps[1].to_string());
            }
        }

        if summary.date.is_none() {
            if let Some(caps) = SUMMARY_DATE.captures(line) {
                summary.date = Some(caps[1].to_string());
            }
        }

        if summary.amount.is_none() {
            summary.amount = SUMMARY_AMOUNT
                .captures(line)
                .and_then(|caps| parse_amount(&caps[1]));
        }

        if summary.vendor_name.is_none() {
            if let Some(caps) = SUMMARY_VENDOR.captures(line) {
                let name = clean_extracted_text(&caps[1]);
                if !name.is_empty() {
                    summary.vendor_name = Some(name);
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_quick_summary() {
        let text = "From: Market Financial Consulting\n\
                    INVOICE #00012\n\
                    Date: 01/31/2024\n\
                    Total: $1,125.00\n";

        let summary = quick_summary(text);
        assert_eq!(summary.invoice_number.as_deref(), Some("00012"));
        assert_eq!(summary.date.as_deref(), Some("01/31/2024"));
        assert_eq!(summary.amount, Some(Decimal::from_str("1125.00").unwrap()));
        assert_eq!(summary.vendor_name.as_deref(), Some("Market Financial Consulting"));
    }

    #[test]
    fn test_decimal_comma_amount() {
        let summary = quick_summary("Amount 1234,56");
        assert_eq!(summary.amount, Some(Decimal::from_str("1234.56").unwrap()));
    }

    #[test]
    fn test_first_match_wins() {
        let summary = quick_summary("Total: 10.00\nTotal: 20.00");
        assert_eq!(summary.amount, Some(Decimal::from_str("10.00").unwrap()));
    }

    #[test]
    fn test_nothing_found() {
        assert!(quick_summary("hello world").is_empty());
    }
}
