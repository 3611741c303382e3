//! Validation findings and the aggregated result.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Invoice vendor is not in the store. Ends the pass.
    VendorNotFound,
    /// Invoiced rate deviates from the agreed rate by more than allowed.
    RateVarianceExceeded,
    /// `hours * rate` does not match the line amount.
    AmountMismatch,
    /// A value the checks need is missing or not numeric.
    MalformedInput,
    AddressMismatch,
    PhoneMismatch,
    PaymentTermsMismatch,
    /// Vendor profile is marked inactive.
    VendorInactive,
}

impl FindingKind {
    /// Label used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::VendorNotFound => "vendor_not_found",
            FindingKind::RateVarianceExceeded => "rate_variance_exceeded",
            FindingKind::AmountMismatch => "amount_mismatch",
            FindingKind::MalformedInput => "malformed_input",
            FindingKind::AddressMismatch => "address_mismatch",
            FindingKind::PhoneMismatch => "phone_mismatch",
            FindingKind::PaymentTermsMismatch => "payment_terms_mismatch",
            FindingKind::VendorInactive => "vendor_inactive",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hard finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: FindingKind,
    pub field: String,
    pub expected: String,
    pub received: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(
        kind: FindingKind,
        field: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            expected: expected.into(),
            received: received.into(),
            message: message.into(),
        }
    }
}

/// Soft finding. Never affects validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub kind: FindingKind,
    pub field: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(kind: FindingKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of one validation pass.
///
/// Validity is derived from the error list at construction and the result has
/// no mutating methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// True if any error or warning has the given kind.
    pub fn has_kind(&self, kind: FindingKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind) || self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// Accumulates findings from independent checks.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, findings: Findings) {
        self.errors.extend(findings.errors);
        self.warnings.extend(findings.warnings);
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult::new(self.errors, self.warnings)
    }
}

/// Output of a single sub-check.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Findings {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl Findings {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_follows_errors_only() {
        let mut report = ReportBuilder::new();
        report.extend(Findings {
            errors: Vec::new(),
            warnings: vec![ValidationWarning::new(
                FindingKind::PhoneMismatch,
                "phone",
                "Phone number does not match registered number",
            )],
        });
        let result = report.finish();

        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let result = ValidationResult::new(
            vec![ValidationError::new(
                FindingKind::AmountMismatch,
                "amount",
                "1125",
                "1100",
                "Amount calculation mismatch",
            )],
            Vec::new(),
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isValid"], false);
        assert_eq!(value["errors"][0]["kind"], "amount_mismatch");
        assert_eq!(value["errors"][0]["expected"], "1125");
        assert!(value["warnings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_label_matches_serialized_name() {
        let kind = FindingKind::PaymentTermsMismatch;
        assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        assert_eq!(kind.to_string(), "payment_terms_mismatch");
    }
}
