//! Payment terms containment check.

use crate::models::invoice::InvoiceRecord;
use crate::models::report::{FindingKind, Findings, ValidationWarning};
use crate::models::vendor::VendorProfile;

use super::VendorCheck;

/// Warns when the agreed terms do not appear verbatim in the invoice's terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentTermsValidator;

impl VendorCheck for PaymentTermsValidator {
    fn name(&self) -> &'static str {
        "payment_terms"
    }

    fn check(&self, vendor: &VendorProfile, invoice: &InvoiceRecord) -> Findings {
        let mut findings = Findings::default();

        let Some(agreed) = vendor.payment_terms.as_deref().filter(|t| !t.is_empty()) else {
            return findings;
        };

        if !invoice.invoice_details.payment_terms.contains(agreed) {
            findings.warnings.push(ValidationWarning::new(
                FindingKind::PaymentTermsMismatch,
                "paymentTerms",
                "Payment terms do not match vendor agreement",
            ));
        }

        findings
    }
}
