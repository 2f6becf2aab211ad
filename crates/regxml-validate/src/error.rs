//! Error types for schema validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised around a validation run.
///
/// A document that fails its schema is not an error; it yields an
/// `Invalid` [`regxml_model::ValidationResult`].
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The document to validate could not be read.
    #[error("failed to read {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema file does not exist.
    #[error("schema not found: {path}")]
    SchemaNotFound { path: PathBuf },

    /// The schema could not be parsed.
    #[error("failed to parse schema {path}")]
    SchemaParse { path: PathBuf },

    /// A path could not be handed to the C library.
    #[error("path contains an interior NUL byte: {path}")]
    InvalidPath { path: PathBuf },

    /// The document exceeds what the backend accepts in one buffer.
    #[error("document too large: {len} bytes")]
    DocumentTooLarge { len: usize },

    /// The backend could not allocate a context.
    #[error("libxml2 failed to allocate a {what}")]
    Allocation { what: &'static str },
}

impl ValidateError {
    /// Negative status code reported for this failure.
    pub fn code(&self) -> i32 {
        match self {
            ValidateError::ReadDocument { .. } => -1,
            ValidateError::SchemaNotFound { .. } => -2,
            ValidateError::SchemaParse { .. } => -3,
            ValidateError::InvalidPath { .. } => -4,
            ValidateError::DocumentTooLarge { .. } => -5,
            ValidateError::Allocation { .. } => -6,
        }
    }
}

/// Result type for validation helpers.
pub type Result<T> = std::result::Result<T, ValidateError>;
