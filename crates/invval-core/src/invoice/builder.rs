//! Builds [`InvoiceRecord`]s from scanner pairs or structured payloads.
//!
//! Building never fails on missing data. Absent fields stay empty and the
//! validator reports what it needs but cannot find.

use tracing::{debug, warn};

use crate::error::PayloadError;
use crate::models::invoice::{InvoiceRecord, LineItem};

use super::rules::clean_invoice_number;
use super::rules::patterns::JSON_OBJECT;
use super::scanner::KeyValuePair;
use super::summary::QuickSummary;

/// Record field a pair key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    InvoiceNumber,
    InvoiceDate,
    PaymentTerms,
    VendorName,
    VendorAddress,
    VendorPhone,
    VendorFax,
    ClientName,
    ClientCompany,
    ClientAddress,
    Description,
    Service,
    Hours,
    Rate,
    Amount,
    Total,
}

/// Map a pair key to a record field. Keys compare case-insensitively with
/// `#`, `.` and surrounding whitespace ignored.
fn target_for(key: &str) -> Option<Target> {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '#' && *c != '.')
        .collect::<String>()
        .trim()
        .to_lowercase();

    let target = match normalized.as_str() {
        "invoice" | "invoice number" | "invoice no" | "invoice num" => Target::InvoiceNumber,
        "date" | "invoice date" => Target::InvoiceDate,
        "payment terms" | "terms" => Target::PaymentTerms,
        "company name" | "vendor" | "from" => Target::VendorName,
        "company address" => Target::VendorAddress,
        "phone" | "tel" | "telephone" => Target::VendorPhone,
        "fax" => Target::VendorFax,
        "client name" => Target::ClientName,
        "client company" => Target::ClientCompany,
        "client address" => Target::ClientAddress,
        "description" => Target::Description,
        "service" => Target::Service,
        "hours" | "hrs" => Target::Hours,
        "rate" | "hourly rate" => Target::Rate,
        "amount" => Target::Amount,
        "total" | "total due" | "amount due" | "balance due" => Target::Total,
        _ => return None,
    };
    Some(target)
}

/// Normalizes extracted or pre-structured data into an [`InvoiceRecord`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceRecordBuilder {
    record: InvoiceRecord,
    service: String,
}

impl InvoiceRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from scanner pairs. The first pair for a field wins.
    pub fn from_pairs(pairs: &[KeyValuePair]) -> Self {
        let mut builder = Self::new();
        for pair in pairs {
            builder.apply(pair);
        }
        builder
    }

    /// Build from a structured interchange payload.
    pub fn from_structured(json: &str) -> Result<InvoiceRecord, PayloadError> {
        let record: InvoiceRecord = serde_json::from_str(json)?;
        debug!(
            "structured payload with {} line items for vendor {:?}",
            record.line_items.len(),
            record.vendor.name
        );
        Ok(record)
    }

    /// Build from a generative model reply that should contain the payload,
    /// possibly wrapped in prose or code fences. A reply without any JSON
    /// object yields an empty record.
    pub fn from_model_response(response: &str) -> Result<InvoiceRecord, PayloadError> {
        match JSON_OBJECT.find(response) {
            Some(m) => Self::from_structured(m.as_str()),
            None => {
                warn!("model response contains no JSON object");
                Ok(InvoiceRecord::default())
            }
        }
    }

    /// Fill fields still empty from a quick text scan.
    pub fn fill_gaps(mut self, summary: &QuickSummary) -> Self {
        let details = &mut self.record.invoice_details;
        if details.number.is_empty() {
            if let Some(number) = &summary.invoice_number {
                details.number = number.clone();
            }
        }
        if details.date.is_empty() {
            if let Some(date) = &summary.date {
                details.date = date.clone();
            }
        }
        if self.record.total.is_empty() {
            if let Some(amount) = summary.amount {
                self.record.total = amount.to_string();
            }
        }
        self
    }

    /// Apply one pair, ignoring keys with no record field or already filled.
    pub fn apply(&mut self, pair: &KeyValuePair) -> &mut Self {
        let Some(target) = target_for(&pair.key) else {
            return self;
        };

        let value = match target {
            Target::InvoiceNumber => clean_invoice_number(&pair.value).unwrap_or_default(),
            _ => pair.value.trim().to_string(),
        };
        set_once(self.slot(target), value);
        self
    }

    fn slot(&mut self, target: Target) -> &mut String {
        let record = &mut self.record;
        match target {
            Target::InvoiceNumber => &mut record.invoice_details.number,
            Target::InvoiceDate => &mut record.invoice_details.date,
            Target::PaymentTerms => &mut record.invoice_details.payment_terms,
            Target::VendorName => &mut record.vendor.name,
            Target::VendorAddress => &mut record.vendor.address,
            Target::VendorPhone => &mut record.vendor.phone,
            Target::VendorFax => &mut record.vendor.fax,
            Target::ClientName => &mut record.client.name,
            Target::ClientCompany => &mut record.client.company,
            Target::ClientAddress => &mut record.client.address,
            Target::Service => &mut self.service,
            Target::Total => &mut record.total,
            Target::Description | Target::Hours | Target::Rate | Target::Amount => {
                if record.line_items.is_empty() {
                    record.line_items.push(LineItem::default());
                }
                let item = &mut record.line_items[0];
                match target {
                    Target::Description => &mut item.description,
                    Target::Hours => &mut item.hours,
                    Target::Rate => &mut item.rate,
                    _ => &mut item.amount,
                }
            }
        }
    }

    /// Finish the record. A `Service` line stands in for a missing description.
    pub fn build(mut self) -> InvoiceRecord {
        if !self.service.is_empty() {
            if self.record.line_items.is_empty() {
                self.record.line_items.push(LineItem::default());
            }
            let item = &mut self.record.line_items[0];
            if item.description.is_empty() {
                item.description = self.service;
            }
        }
        self.record
    }
}

fn set_once(slot: &mut String, value: String) {
    if slot.is_empty() && !value.is_empty() {
        *slot = value;
    }
}

/// Keys the builder understands, for diagnostics.
pub fn is_known_key(key: &str) -> bool {
    target_for(key).is_some()
}
