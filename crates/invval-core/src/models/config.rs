//! Configuration structures for the extraction and validation pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InvvalError, Result};

/// Main configuration for the invval pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvvalConfig {
    /// Line scanner configuration.
    pub extraction: ExtractionConfig,

    /// Validator configuration.
    pub validation: ValidationConfig,

    /// Vendor store location.
    pub vendors: VendorStoreConfig,
}

/// Line scanner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Line prefixes that mark the vendor's company name.
    pub company_anchors: Vec<String>,

    /// Register every vendor name from the store as a company anchor.
    pub anchor_on_vendor_names: bool,

    /// Uppercase tokens that label a value without a delimiter ("TOTAL 1,125.00").
    pub label_tokens: Vec<String>,

    /// Exact lines that open the line-item table.
    pub line_item_headers: Vec<String>,

    /// Case-insensitive keywords that identify a line-item description.
    pub description_keywords: Vec<String>,

    /// Number of lines after a description that may hold hours, rate and amount.
    pub lookahead_window: usize,

    /// Phrases that mark a payment-terms line.
    pub payment_terms_phrases: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            company_anchors: vec!["Market Financial".to_string()],
            anchor_on_vendor_names: true,
            label_tokens: ["INVOICE", "DATE", "TOTAL", "AMOUNT", "RATE", "HOURS"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            line_item_headers: vec!["DESCRIPTION".to_string()],
            description_keywords: vec!["consultation services".to_string()],
            lookahead_window: 3,
            payment_terms_phrases: vec!["Total due in".to_string()],
        }
    }
}

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted difference between `hours * rate` and the line amount.
    pub amount_tolerance: Decimal,

    /// Emit a warning when the matched vendor is inactive.
    pub warn_on_inactive_vendor: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: Decimal::new(1, 2),
            warn_on_inactive_vendor: true,
        }
    }
}

/// Vendor store location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorStoreConfig {
    /// JSON file holding an array of vendor profiles.
    pub store_path: Option<PathBuf>,
}

impl InvvalConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| InvvalError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| InvvalError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
