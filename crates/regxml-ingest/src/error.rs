//! Error types for spreadsheet ingestion.

use std::path::PathBuf;

use regxml_model::ErrorKind;
use thiserror::Error;

/// Errors that can occur while discovering or reading input workbooks.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No `.xls`/`.xlsx` file in the input directory.
    #[error("no input files found in {path}")]
    NoInputFilesFound { path: PathBuf },

    // === Workbook Errors ===
    /// calamine could not open the workbook.
    #[error("failed to open workbook {path}: {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// calamine could not read a worksheet.
    #[error("failed to read sheet '{sheet}' of {path}: {message}")]
    SheetRead {
        path: PathBuf,
        sheet: String,
        message: String,
    },

    /// Workbook has no worksheets.
    #[error("workbook has no sheets: {path}")]
    EmptyWorkbook { path: PathBuf },

    // === Form Sheet Errors ===
    /// OFK sheet without a `Kolomtag` row.
    #[error("sheet '{sheet}' has no Kolomtag row")]
    MissingKolomtag { sheet: String },

    /// OFK sheet without a form tag in its first data row.
    #[error("sheet '{sheet}' has no form tag")]
    MissingFormTag { sheet: String },
}

impl IngestError {
    /// Taxonomy name, for the failures that have one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            IngestError::NoInputFilesFound { .. } => Some(ErrorKind::NoInputFilesFound),
            _ => None,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
