//! Error types for the record store.

use crate::types::Collection;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record not found in {collection}: {id}")]
    RecordNotFound { collection: Collection, id: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// True when the error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RecordNotFound { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Required-field failures reported by input validation.
///
/// The store itself accepts anything; these mirror the checks the entry
/// screens perform before calling it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{collection}: required field `{field}` is empty")]
    MissingField {
        collection: Collection,
        field: &'static str,
    },

    #[error("invoices: item {index} has no product name")]
    UnnamedItem { index: usize },

    #[error("receipts: amount must not be zero")]
    ZeroAmount,
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
