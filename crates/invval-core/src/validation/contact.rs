//! Address and phone comparison against the registered profile.

use crate::models::invoice::InvoiceRecord;
use crate::models::report::{FindingKind, Findings, ValidationWarning};
use crate::models::vendor::VendorProfile;

use super::VendorCheck;

/// Verbatim comparison of contact details. Differences are warnings only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactValidator;

impl VendorCheck for ContactValidator {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn check(&self, vendor: &VendorProfile, invoice: &InvoiceRecord) -> Findings {
        let mut findings = Findings::default();

        if vendor.address != invoice.vendor.address {
            findings.warnings.push(ValidationWarning::new(
                FindingKind::AddressMismatch,
                "address",
                "Vendor address does not match registered address",
            ));
        }

        if vendor.phone != invoice.vendor.phone {
            findings.warnings.push(ValidationWarning::new(
                FindingKind::PhoneMismatch,
                "phone",
                "Phone number does not match registered number",
            ));
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor() -> VendorProfile {
        VendorProfile::new("1", "Market Financial Consulting")
            .with_address("450 East 78th Ave, Denver, CO 12345")
            .with_phone("(123) 456-7890")
    }

    fn invoice(address: &str, phone: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new();
        record.vendor.address = address.to_string();
        record.vendor.phone = phone.to_string();
        record
    }

    #[test]
    fn test_matching_contact() {
        let record = invoice("450 East 78th Ave, Denver, CO 12345", "(123) 456-7890");
        assert!(ContactValidator.check(&vendor(), &record).is_empty());
    }

    #[test]
    fn test_mismatches_are_warnings() {
        let record = invoice("450 East 78th Avenue, Denver, CO 12345", "123-456-7890");
        let findings = ContactValidator.check(&vendor(), &record);

        assert!(findings.errors.is_empty());
        let fields: Vec<&str> = findings.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(fields, vec!["address", "phone"]);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let record = invoice("450 EAST 78TH AVE, DENVER, CO 12345", "(123) 456-7890");
        let findings = ContactValidator.check(&vendor(), &record);

        assert_eq!(findings.warnings.len(), 1);
        assert_eq!(findings.warnings[0].kind, FindingKind::AddressMismatch);
    }
}
