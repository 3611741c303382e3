//! End-to-end processing: extraction, record building and validation.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::invoice::{
    is_known_key, quick_summary, FieldExtractor, InvoiceRecordBuilder, KeyValuePair,
};
use crate::models::config::InvvalConfig;
use crate::models::invoice::InvoiceRecord;
use crate::models::report::ValidationResult;
use crate::validation::{InvoiceValidator, VendorStore};

/// Everything one invoice produced on its way through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessOutcome {
    /// Scanner output. Empty for structured input.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<KeyValuePair>,
    pub invoice: InvoiceRecord,
    pub validation: ValidationResult,
}

/// Extractor and validator sharing one configuration and vendor store.
pub struct InvoicePipeline<S> {
    extractor: FieldExtractor,
    validator: InvoiceValidator<S>,
}

impl<S: VendorStore> InvoicePipeline<S> {
    /// Build a pipeline. With `anchor_on_vendor_names` set, every vendor name
    /// in the store also anchors the company-name line.
    pub fn new(store: S, config: &InvvalConfig) -> Self {
        let mut extractor = FieldExtractor::from_config(&config.extraction);
        if config.extraction.anchor_on_vendor_names {
            let names: Vec<String> = store.vendor_names().into_iter().map(String::from).collect();
            extractor = extractor.with_company_anchors(names);
        }

        Self {
            extractor,
            validator: InvoiceValidator::with_config(store, &config.validation),
        }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }

    pub fn validator(&self) -> &InvoiceValidator<S> {
        &self.validator
    }

    /// Process newline-separated invoice text.
    pub fn process_text(&self, text: &str) -> ProcessOutcome {
        let lines: Vec<&str> = text.lines().collect();
        self.process_lines(&lines)
    }

    /// Process an ordered sequence of text lines.
    pub fn process_lines<L: AsRef<str>>(&self, lines: &[L]) -> ProcessOutcome {
        let (pairs, invoice) = self.extract_lines(lines);
        let validation = self.validator.validate(&invoice);
        ProcessOutcome {
            pairs,
            invoice,
            validation,
        }
    }

    /// Scan newline-separated text and build its record without validating it.
    pub fn extract_text(&self, text: &str) -> (Vec<KeyValuePair>, InvoiceRecord) {
        let pairs = self.extractor.extract_text(text);
        let invoice = self.build_record(&pairs, text);
        (pairs, invoice)
    }

    /// Scan lines and build the record the validator would see.
    pub fn extract_lines<L: AsRef<str>>(&self, lines: &[L]) -> (Vec<KeyValuePair>, InvoiceRecord) {
        let pairs = self.extractor.extract(lines);
        let text = lines.iter().map(|l| l.as_ref()).collect::<Vec<_>>().join("\n");
        let invoice = self.build_record(&pairs, &text);
        (pairs, invoice)
    }

    /// Process a structured interchange payload.
    pub fn process_structured(&self, json: &str) -> Result<ProcessOutcome> {
        let invoice = InvoiceRecordBuilder::from_structured(json)?;
        Ok(self.outcome_for(invoice))
    }

    /// Process a generative model reply carrying a structured payload.
    pub fn process_model_response(&self, response: &str) -> Result<ProcessOutcome> {
        let invoice = InvoiceRecordBuilder::from_model_response(response)?;
        Ok(self.outcome_for(invoice))
    }

    pub fn validate(&self, invoice: &InvoiceRecord) -> ValidationResult {
        self.validator.validate(invoice)
    }

    fn build_record(&self, pairs: &[KeyValuePair], text: &str) -> InvoiceRecord {
        let unmapped: Vec<&str> = pairs
            .iter()
            .map(|p| p.key.as_str())
            .filter(|k| !is_known_key(k))
            .collect();
        if !unmapped.is_empty() {
            debug!("pairs with no record field: {:?}", unmapped);
        }

        let invoice = InvoiceRecordBuilder::from_pairs(pairs)
            .fill_gaps(&quick_summary(text))
            .build();

        info!(
            "Extracted {} pairs from {} lines, vendor {:?}",
            pairs.len(),
            text.lines().count(),
            invoice.vendor.name
        );
        invoice
    }

    fn outcome_for(&self, invoice: InvoiceRecord) -> ProcessOutcome {
        let missing = invoice.missing_fields();
        if !missing.is_empty() {
            debug!("structured payload missing {:?}", missing);
        }

        let validation = self.validator.validate(&invoice);
        ProcessOutcome {
            pairs: Vec::new(),
            invoice,
            validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::FindingKind;
    use crate::models::vendor::VendorProfile;
    use crate::validation::InMemoryVendorStore;
    use rust_decimal::Decimal;

    fn store() -> InMemoryVendorStore {
        InMemoryVendorStore::new(vec![
            VendorProfile::new("v-1", "Northwind Advisory")
                .with_address("9 Harbor Rd")
                .with_phone("555-0101")
                .with_hourly_rate(Decimal::from(200)),
        ])
        .unwrap()
    }

    #[test]
    fn test_store_names_anchor_company_line() {
        let pipeline = InvoicePipeline::new(store(), &InvvalConfig::default());
        let outcome = pipeline.process_lines(&[
            "Northwind Advisory",
            "9 Harbor Rd",
            "",
            "Phone: 555-0101",
        ]);

        assert_eq!(outcome.invoice.vendor.name, "Northwind Advisory");
        assert_eq!(outcome.invoice.vendor.address, "9 Harbor Rd");
        assert!(!outcome.validation.has_kind(FindingKind::VendorNotFound));
    }

    #[test]
    fn test_anchoring_on_names_can_be_disabled() {
        let mut config = InvvalConfig::default();
        config.extraction.anchor_on_vendor_names = false;

        let pipeline = InvoicePipeline::new(store(), &config);
        let outcome = pipeline.process_text("Northwind Advisory\n9 Harbor Rd\n");

        assert!(outcome.invoice.vendor.name.is_empty());
        assert!(outcome.validation.has_kind(FindingKind::VendorNotFound));
    }

    #[test]
    fn test_structured_payload() {
        let pipeline = InvoicePipeline::new(store(), &InvvalConfig::default());
        let outcome = pipeline
            .process_structured(
                r#"{
                    "vendor": { "name": "Northwind Advisory", "address": "9 Harbor Rd", "phone": "555-0101" },
                    "line_items": [ { "hours": 2, "rate": 200, "amount": 400 } ]
                }"#,
            )
            .unwrap();

        assert!(outcome.pairs.is_empty());
        assert!(outcome.validation.is_valid());
    }

    #[test]
    fn test_extraction_matches_validated_record() {
        let pipeline = InvoicePipeline::new(store(), &InvvalConfig::default());
        let text = "Northwind Advisory\n9 Harbor Rd\n\nInvoice #77\n";

        let (pairs, invoice) = pipeline.extract_text(text);
        let outcome = pipeline.process_text(text);

        assert_eq!(pairs, outcome.pairs);
        assert_eq!(invoice, outcome.invoice);
        assert_eq!(invoice.vendor.name, "Northwind Advisory");
        assert_eq!(invoice.invoice_details.number, "77");
    }

    #[test]
    fn test_malformed_structured_payload_is_error() {
        let pipeline = InvoicePipeline::new(store(), &InvvalConfig::default());
        assert!(pipeline.process_structured("not json").is_err());
    }
}
