//! Invoice validation against registered vendor profiles.
//!
//! The validator first matches the invoice's vendor name against the store.
//! Without a match the pass ends with a single `vendor` error. With a match
//! every check runs independently and the findings are merged.

mod contact;
mod financial;
pub mod store;
mod terms;

pub use contact::ContactValidator;
pub use financial::FinancialValidator;
pub use store::{match_vendor, InMemoryVendorStore, VendorMatch, VendorStore};
pub use terms::PaymentTermsValidator;

use tracing::{debug, info};

use crate::models::config::ValidationConfig;
use crate::models::invoice::InvoiceRecord;
use crate::models::report::{
    FindingKind, Findings, ReportBuilder, ValidationError, ValidationResult, ValidationWarning,
};
use crate::models::vendor::VendorProfile;

/// A single check run against a matched vendor.
pub trait VendorCheck {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn check(&self, vendor: &VendorProfile, invoice: &InvoiceRecord) -> Findings;
}

/// Warns when the matched profile is inactive.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusValidator;

impl VendorCheck for StatusValidator {
    fn name(&self) -> &'static str {
        "status"
    }

    fn check(&self, vendor: &VendorProfile, _invoice: &InvoiceRecord) -> Findings {
        let mut findings = Findings::default();
        if !vendor.is_active() {
            findings.warnings.push(ValidationWarning::new(
                FindingKind::VendorInactive,
                "status",
                "Vendor is marked inactive",
            ));
        }
        findings
    }
}

/// Validates invoices against a vendor store.
#[derive(Debug, Clone)]
pub struct InvoiceValidator<S> {
    store: S,
    financial: FinancialValidator,
    warn_on_inactive_vendor: bool,
}

impl<S: VendorStore> InvoiceValidator<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &ValidationConfig::default())
    }

    pub fn with_config(store: S, config: &ValidationConfig) -> Self {
        Self {
            store,
            financial: FinancialValidator::new(config.amount_tolerance),
            warn_on_inactive_vendor: config.warn_on_inactive_vendor,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate one invoice. Never fails: data problems become findings.
    pub fn validate(&self, invoice: &InvoiceRecord) -> ValidationResult {
        let name = &invoice.vendor.name;

        let vendor = match match_vendor(&self.store, name) {
            VendorMatch::Matched(vendor) => vendor,
            VendorMatch::NotFound => {
                info!("Vendor {:?} not found in store", name);
                return ValidationResult::new(
                    vec![ValidationError::new(
                        FindingKind::VendorNotFound,
                        "vendor",
                        "registered vendor",
                        name.as_str(),
                        "Vendor not found in database",
                    )],
                    Vec::new(),
                );
            }
        };

        debug!("Matched vendor {} ({})", vendor.name, vendor.id);

        let mut checks: Vec<&dyn VendorCheck> = Vec::with_capacity(4);
        checks.push(&ContactValidator);
        checks.push(&self.financial);
        checks.push(&PaymentTermsValidator);
        if self.warn_on_inactive_vendor {
            checks.push(&StatusValidator);
        }

        let mut report = ReportBuilder::new();
        for check in checks {
            let findings = check.check(vendor, invoice);
            if !findings.is_empty() {
                debug!(
                    "{} check: {} errors, {} warnings",
                    check.name(),
                    findings.errors.len(),
                    findings.warnings.len()
                );
            }
            report.extend(findings);
        }

        let result = report.finish();
        info!(
            "Validated invoice for {}: valid={} errors={} warnings={}",
            vendor.name,
            result.is_valid(),
            result.errors().len(),
            result.warnings().len()
        );
        result
    }
}
