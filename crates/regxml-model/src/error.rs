use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::ReportType;

/// Identifies the offending cell of a build error: report, section and tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub report: ReportType,
    pub section: String,
    pub tag: String,
}

impl Location {
    pub fn new(report: ReportType, section: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            report,
            section: section.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in {} section '{}'",
            self.tag, self.report, self.section
        )
    }
}

/// First error found while building one document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("{at}: field cannot be empty")]
    MissingRequiredField { at: Location },

    #[error("{at}: '{value}' is not one of {allowed:?}")]
    DomainValueViolation {
        at: Location,
        value: String,
        allowed: Vec<String>,
    },

    #[error("{at}: length {actual} exceeds the maximum of {max}")]
    LengthExceeded {
        at: Location,
        max: usize,
        actual: usize,
    },

    #[error("{at}: length {actual} does not match the required length {expected}")]
    LengthMismatch {
        at: Location,
        expected: usize,
        actual: usize,
    },

    #[error("{at}: '{value}' must be a whole, non-negative number")]
    NotAnUnsignedInteger { at: Location, value: String },

    #[error("{at}: '{value}' must be an integer")]
    NotAnInteger { at: Location, value: String },

    #[error("{at}: '{value}' must be a text value")]
    NotAString { at: Location, value: String },

    #[error("{at}: '{value}' is not a date")]
    InvalidDate { at: Location, value: String },

    #[error("{at}: value required when {counterpart} is filled and vice versa")]
    ConditionalFieldViolation { at: Location, counterpart: String },

    #[error("{at}: no rules implemented for '{value}'")]
    UnsupportedReportSubtype { at: Location, value: String },

    #[error("{report} rules cannot be applied to {input} input")]
    InputMismatch {
        report: ReportType,
        input: &'static str,
    },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            BuildError::DomainValueViolation { .. } => ErrorKind::DomainValueViolation,
            BuildError::LengthExceeded { .. } => ErrorKind::LengthExceeded,
            BuildError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            BuildError::NotAnUnsignedInteger { .. } => ErrorKind::NotAnUnsignedInteger,
            BuildError::NotAnInteger { .. } => ErrorKind::NotAnInteger,
            BuildError::NotAString { .. } => ErrorKind::NotAString,
            BuildError::InvalidDate { .. } => ErrorKind::InvalidDate,
            BuildError::ConditionalFieldViolation { .. } => ErrorKind::ConditionalFieldViolation,
            BuildError::UnsupportedReportSubtype { .. } => ErrorKind::UnsupportedReportSubtype,
            BuildError::InputMismatch { .. } => ErrorKind::InputMismatch,
        }
    }

    /// Location of the offending field, if the error concerns one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            BuildError::MissingRequiredField { at }
            | BuildError::DomainValueViolation { at, .. }
            | BuildError::LengthExceeded { at, .. }
            | BuildError::LengthMismatch { at, .. }
            | BuildError::NotAnUnsignedInteger { at, .. }
            | BuildError::NotAnInteger { at, .. }
            | BuildError::NotAString { at, .. }
            | BuildError::InvalidDate { at, .. }
            | BuildError::ConditionalFieldViolation { at, .. }
            | BuildError::UnsupportedReportSubtype { at, .. } => Some(at),
            BuildError::InputMismatch { .. } => None,
        }
    }

    /// Tag of the offending field, if any.
    pub fn tag(&self) -> Option<&str> {
        self.location().map(|at| at.tag.as_str())
    }
}

/// Error taxonomy shared by the builder, ingest and driver layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingRequiredField,
    DomainValueViolation,
    LengthExceeded,
    LengthMismatch,
    NotAnUnsignedInteger,
    NotAnInteger,
    NotAString,
    InvalidDate,
    ConditionalFieldViolation,
    NoInputFilesFound,
    UnsupportedReportSubtype,
    InputMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingRequiredField => "MissingRequiredField",
            ErrorKind::DomainValueViolation => "DomainValueViolation",
            ErrorKind::LengthExceeded => "LengthExceeded",
            ErrorKind::LengthMismatch => "LengthMismatch",
            ErrorKind::NotAnUnsignedInteger => "NotAnUnsignedInteger",
            ErrorKind::NotAnInteger => "NotAnInteger",
            ErrorKind::NotAString => "NotAString",
            ErrorKind::InvalidDate => "InvalidDate",
            ErrorKind::ConditionalFieldViolation => "ConditionalFieldViolation",
            ErrorKind::NoInputFilesFound => "NoInputFilesFound",
            ErrorKind::UnsupportedReportSubtype => "UnsupportedReportSubtype",
            ErrorKind::InputMismatch => "InputMismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
