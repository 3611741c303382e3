//! Core library for invoice field extraction and vendor validation.
//!
//! This crate provides:
//! - Line-scanning extraction of labeled invoice fields from text
//! - Normalization of scanner output or structured payloads into invoice records
//! - Validation of invoices against registered vendor profiles

pub mod error;
pub mod invoice;
pub mod models;
pub mod pipeline;
pub mod validation;

pub use error::{InvvalError, PayloadError, Result, StoreError};
pub use invoice::{
    quick_summary, FieldExtractor, InvoiceRecordBuilder, KeyValuePair, QuickSummary,
};
pub use models::config::InvvalConfig;
pub use models::invoice::{ClientInfo, InvoiceDetails, InvoiceRecord, LineItem, VendorInfo};
pub use models::report::{
    FindingKind, ValidationError, ValidationResult, ValidationWarning,
};
pub use models::vendor::{VendorProfile, VendorStatus};
pub use pipeline::{InvoicePipeline, ProcessOutcome};
pub use validation::{InMemoryVendorStore, InvoiceValidator, VendorStore};
