//! Invoice record in the structured interchange shape.
//!
//! The serialized form is exactly the payload agreed with the upstream
//! structuring service:
//!
//! ```text
//! { invoice_details: { number, date, payment_terms },
//!   vendor: { name, address, phone, fax },
//!   client: { name, company, address },
//!   line_items: [ { description, hours, rate, amount } ],
//!   total }
//! ```
//!
//! Every field is optional on input. Missing keys, `null`, and numbers written
//! where strings are expected all deserialize to a string (empty for absent
//! data), so a partial payload always yields a record and the validator decides
//! what is missing.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::invoice::rules::dates::parse_invoice_date;

/// A complete invoice record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice header information.
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_details: InvoiceDetails,

    /// Vendor (issuer) as printed on the invoice.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor: VendorInfo,

    /// Client (recipient) as printed on the invoice.
    #[serde(default, deserialize_with = "null_as_default")]
    pub client: ClientInfo,

    /// Billable rows.
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,

    /// Invoice total as written.
    #[serde(default, deserialize_with = "lenient_string")]
    pub total: String,
}

/// Invoice header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    #[serde(default, deserialize_with = "lenient_string")]
    pub number: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_terms: String,
}

/// Vendor block of the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub fax: String,
}

/// Client block of the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
}

/// One billable row. Numeric columns are kept as written on the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub hours: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub rate: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
}

impl InvoiceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The line item the financial checks look at.
    pub fn first_line_item(&self) -> Option<&LineItem> {
        self.line_items.first()
    }

    /// Invoice date, if it is written in a recognizable format.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        parse_invoice_date(&self.invoice_details.date)
    }

    /// Report fields a downstream reviewer would expect but that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.invoice_details.number.is_empty() {
            missing.push("invoice_details.number");
        }
        if self.invoice_details.date.is_empty() {
            missing.push("invoice_details.date");
        }
        if self.vendor.name.is_empty() {
            missing.push("vendor.name");
        }
        if self.line_items.is_empty() {
            missing.push("line_items");
        }
        if self.total.is_empty() {
            missing.push("total");
        }

        missing
    }
}

/// Accept a string, number, bool or null where a string is expected.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_payload_fills_defaults() {
        let json = r#"{ "vendor": { "name": "Acme" }, "line_items": null }"#;
        let record: InvoiceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.vendor.name, "Acme");
        assert!(record.vendor.address.is_empty());
        assert!(record.line_items.is_empty());
        assert!(record.total.is_empty());
    }

    #[test]
    fn test_numbers_become_strings() {
        let json = r#"{ "line_items": [ { "hours": 3, "rate": 375.5, "amount": null } ], "total": 1126.5 }"#;
        let record: InvoiceRecord = serde_json::from_str(json).unwrap();

        let item = record.first_line_item().unwrap();
        assert_eq!(item.hours, "3");
        assert_eq!(item.rate, "375.5");
        assert_eq!(item.amount, "");
        assert_eq!(record.total, "1126.5");
    }

    #[test]
    fn test_serializes_full_interchange_shape() {
        let value = serde_json::to_value(InvoiceRecord::new()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "invoice_details": { "number": "", "date": "", "payment_terms": "" },
                "vendor": { "name": "", "address": "", "phone": "", "fax": "" },
                "client": { "name": "", "company": "", "address": "" },
                "line_items": [],
                "total": ""
            })
        );
    }

    #[test]
    fn test_missing_fields() {
        let mut record = InvoiceRecord::new();
        record.vendor.name = "Acme".to_string();
        record.total = "10.00".to_string();

        assert_eq!(
            record.missing_fields(),
            vec!["invoice_details.number", "invoice_details.date", "line_items"]
        );
    }
}
