//! Outcome of validating one serialized document against a schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Invalid,
    /// The validator itself failed (schema unreadable, parser error).
    InternalError { code: i32 },
    /// The document parsed but was never checked against the schema.
    NotChecked,
}

impl ValidationStatus {
    /// Maps a libxml2-style return code: 0 valid, positive invalid,
    /// negative internal error.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ValidationStatus::Valid,
            c if c > 0 => ValidationStatus::Invalid,
            c => ValidationStatus::InternalError { code: c },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Invalid => "invalid",
            ValidationStatus::InternalError { .. } => "error",
            ValidationStatus::NotChecked => "unchecked",
        }
    }
}

/// A single validator message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// `line:column` or a file name, whatever the backend can supply.
    pub location: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: Option<String>, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{location}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new(status: ValidationStatus, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            status,
            diagnostics,
        }
    }

    pub fn valid() -> Self {
        Self::new(ValidationStatus::Valid, Vec::new())
    }

    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_return_codes() {
        assert_eq!(ValidationStatus::from_code(0), ValidationStatus::Valid);
        assert_eq!(ValidationStatus::from_code(3), ValidationStatus::Invalid);
        assert_eq!(
            ValidationStatus::from_code(-1),
            ValidationStatus::InternalError { code: -1 }
        );
        assert!(ValidationResult::valid().passed());
    }

    #[test]
    fn unchecked_document_does_not_pass() {
        let result = ValidationResult::new(ValidationStatus::NotChecked, Vec::new());
        assert!(!result.passed());
        assert_eq!(result.status.as_str(), "unchecked");
    }
}
