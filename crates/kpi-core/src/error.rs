//! Error types for KPI operations.
//!
//! This module defines [`KpiError`]. The aggregation engine itself never fails;
//! these errors come from the boundaries around it: parsing raw rows, record
//! sources, and preference stores.

use thiserror::Error;

/// Errors that can occur at the boundaries of the metrics engine.
#[derive(Error, Debug)]
pub enum KpiError {
    /// A period label or preference document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The requested client has no data in a source.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// No record source has been registered.
    #[error("Source not configured: {0}")]
    SourceNotConfigured(String),

    /// Error interacting with a preference store.
    #[error("Store error: {0}")]
    Store(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`KpiError`].
pub type Result<T> = std::result::Result<T, KpiError>;
