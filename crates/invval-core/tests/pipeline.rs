use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use invval_core::models::report::FindingKind;
use invval_core::{
    InMemoryVendorStore, InvoicePipeline, InvvalConfig, KeyValuePair, LineItem, VendorProfile,
    VendorStatus,
};

const INVOICE: &str = "\
Market Financial Consulting
450 East 78th Ave
Denver, CO 12345
Phone: (123) 456-7890
Fax: (123) 456-7891

INVOICE #00012
DATE: January 31, 2024

TO:
Alex Chen
Acme Corp
123 Main St
Springfield, IL 62701

FOR:
Financial advisory

DESCRIPTION
Consultation services
3.0
375.00
1,125.00

TOTAL $1,125.00
Total due in 15 days
";

fn vendor() -> VendorProfile {
    VendorProfile::new("mfc-001", "Market Financial Consulting")
        .with_address("450 East 78th Ave, Denver, CO 12345")
        .with_phone("(123) 456-7890")
        .with_fax("(123) 456-7891")
        .with_hourly_rate(Decimal::from(375))
        .with_allowed_variance(Decimal::from(5))
        .with_payment_terms("15 days")
}

fn pipeline_with(vendor: VendorProfile) -> InvoicePipeline<InMemoryVendorStore> {
    let store = InMemoryVendorStore::new(vec![vendor]).unwrap();
    InvoicePipeline::new(store, &InvvalConfig::default())
}

fn kv(key: &str, value: &str) -> KeyValuePair {
    KeyValuePair::new(key, value)
}

#[test]
fn test_text_invoice_end_to_end() {
    let outcome = pipeline_with(vendor()).process_text(INVOICE);

    assert_eq!(
        outcome.pairs,
        vec![
            kv("Company Name", "Market Financial Consulting"),
            kv("Company Address", "450 East 78th Ave, Denver, CO 12345"),
            kv("Phone", "(123) 456-7890"),
            kv("Fax", "(123) 456-7891"),
            kv("INVOICE", "#00012"),
            kv("DATE", "January 31, 2024"),
            kv("Client Name", "Alex Chen"),
            kv("Client Company", "Acme Corp"),
            kv("Client Address", "123 Main St, Springfield, IL 62701"),
            kv("Service", "Financial advisory"),
            kv("Description", "Consultation services"),
            kv("Hours", "3.0"),
            kv("Rate", "375.00"),
            kv("Amount", "1,125.00"),
            kv("TOTAL", "$1,125.00"),
            kv("Payment Terms", "Total due in 15 days"),
        ]
    );

    let invoice = &outcome.invoice;
    assert_eq!(invoice.invoice_details.number, "00012");
    assert_eq!(invoice.client.company, "Acme Corp");
    assert_eq!(
        invoice.line_items,
        vec![LineItem {
            description: "Consultation services".to_string(),
            hours: "3.0".to_string(),
            rate: "375.00".to_string(),
            amount: "1,125.00".to_string(),
        }]
    );
    assert_eq!(invoice.total, "$1,125.00");

    assert!(outcome.validation.is_valid());
    assert!(outcome.validation.errors().is_empty());
    assert!(outcome.validation.warnings().is_empty());
}

#[test]
fn test_overbilled_invoice() {
    let text = INVOICE.replace("375.00\n", "400.00\n");
    let outcome = pipeline_with(vendor()).process_text(&text);
    let validation = &outcome.validation;

    assert!(!validation.is_valid());
    let kinds: Vec<FindingKind> = validation.errors().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![FindingKind::RateVarianceExceeded, FindingKind::AmountMismatch]
    );
    assert_eq!(validation.errors()[0].expected, "375");
    assert_eq!(validation.errors()[0].received, "400.00");
    assert_eq!(validation.errors()[1].expected, "1200");
}

#[test]
fn test_contact_and_terms_drift_are_warnings() {
    let registered = vendor()
        .with_phone("(123) 000-0000")
        .with_payment_terms("30 days");
    let outcome = pipeline_with(registered).process_text(INVOICE);
    let validation = &outcome.validation;

    assert!(validation.is_valid());
    let fields: Vec<&str> = validation.warnings().iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, vec!["phone", "paymentTerms"]);
}

#[test]
fn test_unknown_vendor() {
    let other = VendorProfile::new("x-1", "Someone Else LLC");
    let outcome = pipeline_with(other).process_text(INVOICE);
    let validation = &outcome.validation;

    assert!(!validation.is_valid());
    assert_eq!(validation.errors().len(), 1);
    assert_eq!(validation.errors()[0].field, "vendor");
    assert_eq!(validation.errors()[0].received, "Market Financial Consulting");
    assert!(validation.warnings().is_empty());
}

#[test]
fn test_inactive_vendor() {
    let outcome =
        pipeline_with(vendor().with_status(VendorStatus::Inactive)).process_text(INVOICE);

    assert!(outcome.validation.is_valid());
    assert!(outcome.validation.has_kind(FindingKind::VendorInactive));
}

#[test]
fn test_structured_payload_matches_text_result() {
    let pipeline = pipeline_with(vendor());
    let from_text = pipeline.process_text(INVOICE);

    let payload = serde_json::to_string(&from_text.invoice).unwrap();
    let from_json = pipeline.process_structured(&payload).unwrap();

    assert_eq!(from_json.invoice, from_text.invoice);
    assert_eq!(from_json.validation, from_text.validation);
}

#[test]
fn test_model_response_payload() {
    let reply = r#"Sure, here is the invoice:
{
  "invoice_details": { "number": "00012", "date": "2024-01-31", "payment_terms": "Net 15 days" },
  "vendor": { "name": "market financial consulting", "address": "450 East 78th Ave, Denver, CO 12345", "phone": "(123) 456-7890", "fax": null },
  "line_items": [ { "description": "Consulting", "hours": 3, "rate": 375, "amount": 1125 } ],
  "total": 1125
}"#;

    let outcome = pipeline_with(vendor()).process_model_response(reply).unwrap();

    assert!(outcome.validation.is_valid());
    assert!(outcome.validation.warnings().is_empty());
    assert_eq!(outcome.invoice.total, "1125");
}

#[test]
fn test_validation_result_json_shape() {
    let outcome = pipeline_with(vendor()).process_text(&INVOICE.replace("1,125.00\n", "1,100.00\n"));
    let json = serde_json::to_value(&outcome.validation).unwrap();

    assert_eq!(json["isValid"], false);
    assert_eq!(json["errors"][0]["field"], "amount");
    assert_eq!(json["errors"][0]["expected"], "1125");
    assert_eq!(json["errors"][0]["received"], "1,100.00");
    assert_eq!(json["errors"][0]["message"], "Amount calculation mismatch");
}
