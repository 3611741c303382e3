//! Error types for the invval-core library.
//!
//! Data-quality problems in an invoice are never errors here: they become
//! findings in a [`ValidationResult`](crate::models::report::ValidationResult).
//! These types cover faults in the surrounding contract only.

use thiserror::Error;

/// Main error type for the invval library.
#[derive(Error, Debug)]
pub enum InvvalError {
    /// Vendor store could not be loaded.
    #[error("vendor store error: {0}")]
    Store(#[from] StoreError),

    /// Structured payload from the upstream structuring service was unusable.
    #[error("structured payload error: {0}")]
    Payload(#[from] PayloadError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to loading the vendor profile store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store file is not a JSON array of vendor profiles.
    #[error("failed to parse vendor store: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two profiles share a name once case is folded.
    #[error("duplicate vendor name: {0}")]
    DuplicateName(String),

    /// A profile has an empty name and could never be matched.
    #[error("vendor {id} has an empty name")]
    EmptyName { id: String },
}

/// Errors related to the structured interchange payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The payload is not valid JSON for the interchange shape.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for the invval library.
pub type Result<T> = std::result::Result<T, InvvalError>;
