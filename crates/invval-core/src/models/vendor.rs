//! Registered vendor profiles.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reference record a vendor's invoices are validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    /// Store identifier.
    pub id: String,

    /// Registered name, matched case-insensitively against the invoice.
    pub name: String,

    /// Registered postal address, compared verbatim.
    #[serde(default)]
    pub address: String,

    /// Registered phone number, compared verbatim.
    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub fax: String,

    /// Agreed hourly rate. No rate check runs without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<Decimal>,

    /// Agreed payment terms, expected as a substring of the invoice's terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,

    /// Permitted deviation from `hourly_rate`, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_variance: Option<Decimal>,

    #[serde(default)]
    pub status: VendorStatus,
}

/// Whether the vendor is currently engaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    #[default]
    Active,
    Inactive,
}

impl VendorProfile {
    /// Create an active profile with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            phone: String::new(),
            fax: String::new(),
            hourly_rate: None,
            payment_terms: None,
            allowed_variance: None,
            status: VendorStatus::Active,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_fax(mut self, fax: impl Into<String>) -> Self {
        self.fax = fax.into();
        self
    }

    pub fn with_hourly_rate(mut self, rate: Decimal) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    pub fn with_payment_terms(mut self, terms: impl Into<String>) -> Self {
        self.payment_terms = Some(terms.into());
        self
    }

    pub fn with_allowed_variance(mut self, percent: Decimal) -> Self {
        self.allowed_variance = Some(percent);
        self
    }

    pub fn with_status(mut self, status: VendorStatus) -> Self {
        self.status = status;
        self
    }

    /// Allowed variance in percent; an absent value means no deviation is allowed.
    pub fn allowed_variance_percent(&self) -> Decimal {
        self.allowed_variance.unwrap_or(Decimal::ZERO)
    }

    pub fn is_active(&self) -> bool {
        self.status == VendorStatus::Active
    }
}
