#![deny(unsafe_code)]

//! Schema validation of generated report XML.
//!
//! Backends implement [`SchemaValidator`]. The `libxml2` feature is on by
//! default and performs full XSD validation through the system libxml2.
//! Building with `default-features = false` leaves only
//! [`WellFormedValidator`], which checks well-formedness and reports every
//! parseable document as `NotChecked`, so nothing passes without a schema
//! check.
//!
//! Validation never retries and never corrects: the result is reported as is.

mod error;
#[cfg(feature = "libxml2")]
mod libxml2;
mod wellformed;

use std::fs;
use std::path::Path;

use regxml_model::ValidationResult;

pub use error::{Result, ValidateError};
#[cfg(feature = "libxml2")]
pub use libxml2::Libxml2Validator;
pub use wellformed::WellFormedValidator;

/// A backend that checks a serialized document against an XSD file.
pub trait SchemaValidator {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Validates `xml` against the schema at `schema`.
    ///
    /// Backend failures (unreadable schema, allocation) come back as
    /// `InternalError` results rather than `Err`.
    fn validate(&self, xml: &[u8], schema: &Path) -> ValidationResult;
}

/// The XSD backend, or the well-formedness check when libxml2 is compiled out.
pub fn default_validator() -> Box<dyn SchemaValidator> {
    #[cfg(feature = "libxml2")]
    {
        Box::new(Libxml2Validator::new())
    }
    #[cfg(not(feature = "libxml2"))]
    {
        Box::new(WellFormedValidator)
    }
}

/// Validates serialized XML with the default backend.
pub fn validate(xml: &[u8], schema: &Path) -> ValidationResult {
    default_validator().validate(xml, schema)
}

/// Reads `path` and validates it with `validator`.
pub fn validate_file_with(
    validator: &dyn SchemaValidator,
    path: &Path,
    schema: &Path,
) -> Result<ValidationResult> {
    let xml = fs::read(path).map_err(|source| ValidateError::ReadDocument {
        path: path.to_path_buf(),
        source,
    })?;
    let result = validator.validate(&xml, schema);
    tracing::debug!(
        file = %path.display(),
        backend = validator.name(),
        status = result.status.as_str(),
        diagnostics = result.diagnostics.len(),
        "Validated document"
    );
    Ok(result)
}

/// Reads `path` and validates it with the default backend.
pub fn validate_file(path: &Path, schema: &Path) -> Result<ValidationResult> {
    validate_file_with(default_validator().as_ref(), path, schema)
}
