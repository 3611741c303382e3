//! Rate variance and amount recomputation checks.

use rust_decimal::Decimal;

use crate::invoice::rules::{format_amount, parse_amount};
use crate::models::invoice::{InvoiceRecord, LineItem};
use crate::models::report::{FindingKind, Findings, ValidationError};
use crate::models::vendor::VendorProfile;

use super::VendorCheck;

/// Checks the first line item's rate against the agreed rate and its amount
/// against `hours * rate`.
#[derive(Debug, Clone)]
pub struct FinancialValidator {
    amount_tolerance: Decimal,
}

impl FinancialValidator {
    pub fn new(amount_tolerance: Decimal) -> Self {
        Self { amount_tolerance }
    }

    fn check_rate(&self, vendor: &VendorProfile, item: &LineItem, findings: &mut Findings) {
        let Some(agreed) = vendor.hourly_rate.filter(|r| !r.is_zero()) else {
            return;
        };
        // Unreadable rates are reported by the amount check.
        let Some(rate) = parse_amount(&item.rate) else {
            return;
        };

        let variance = rate
            .checked_sub(agreed)
            .and_then(|d| d.abs().checked_div(agreed))
            .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED));
        let Some(variance) = variance else {
            findings.errors.push(out_of_range("rate", &item.rate));
            return;
        };
        let allowed = vendor.allowed_variance_percent();

        if variance > allowed {
            findings.errors.push(ValidationError::new(
                FindingKind::RateVarianceExceeded,
                "rate",
                format_amount(agreed),
                item.rate.clone(),
                format!("Rate exceeds allowed variance of {}%", allowed.normalize()),
            ));
        }
    }

    fn check_amount(&self, item: &LineItem, findings: &mut Findings) {
        let hours = required_number("hours", &item.hours, findings);
        let rate = required_number("rate", &item.rate, findings);
        let amount = required_number("amount", &item.amount, findings);

        let (Some(hours), Some(rate), Some(amount)) = (hours, rate, amount) else {
            return;
        };

        let Some(calculated) = hours.checked_mul(rate) else {
            findings.errors.push(out_of_range("amount", &item.amount));
            return;
        };
        let Some(difference) = calculated.checked_sub(amount) else {
            findings.errors.push(out_of_range("amount", &item.amount));
            return;
        };
        if difference.abs() > self.amount_tolerance {
            findings.errors.push(ValidationError::new(
                FindingKind::AmountMismatch,
                "amount",
                format_amount(calculated),
                item.amount.clone(),
                "Amount calculation mismatch",
            ));
        }
    }
}

impl Default for FinancialValidator {
    fn default() -> Self {
        Self::new(Decimal::new(1, 2))
    }
}

impl VendorCheck for FinancialValidator {
    fn name(&self) -> &'static str {
        "financial"
    }

    fn check(&self, vendor: &VendorProfile, invoice: &InvoiceRecord) -> Findings {
        let mut findings = Findings::default();

        let Some(item) = invoice.first_line_item() else {
            findings.errors.push(ValidationError::new(
                FindingKind::MalformedInput,
                "line_items",
                "at least one line item",
                "none",
                "Invoice has no line items",
            ));
            return findings;
        };

        self.check_rate(vendor, item, &mut findings);
        self.check_amount(item, &mut findings);
        findings
    }
}

/// Parse a numeric column, recording a malformed-input error when it is unusable.
fn required_number(field: &str, raw: &str, findings: &mut Findings) -> Option<Decimal> {
    let parsed = parse_amount(raw);
    if parsed.is_none() {
        let message = if raw.trim().is_empty() {
            format!("Line item {} is missing", field)
        } else {
            format!("Line item {} is not a number", field)
        };
        findings.errors.push(ValidationError::new(
            FindingKind::MalformedInput,
            field,
            "numeric value",
            raw,
            message,
        ));
    }
    parsed
}

/// Arithmetic on the column overflowed the decimal range.
fn out_of_range(field: &str, raw: &str) -> ValidationError {
    ValidationError::new(
        FindingKind::MalformedInput,
        field,
        "value within numeric range",
        raw,
        format!("Line item {} is out of range", field),
    )
}
