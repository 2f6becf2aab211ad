use std::path::PathBuf;

use regxml_model::{ReportType, ValidationResult};

/// What happened to one input workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    Skipped,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub status: FileStatus,
    pub output: Option<PathBuf>,
    /// Error kind name for skipped files.
    pub kind: Option<String>,
    pub detail: String,
}

#[derive(Debug)]
pub struct ValidationOutcome {
    pub file: PathBuf,
    pub result: ValidationResult,
}

#[derive(Debug)]
pub struct RunResult {
    pub report: ReportType,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub schema: PathBuf,
    pub files: Vec<FileOutcome>,
    pub validations: Vec<ValidationOutcome>,
}

impl RunResult {
    pub fn written(&self) -> usize {
        self.files
            .iter()
            .filter(|file| file.status == FileStatus::Written)
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.files.len() - self.written()
    }

    pub fn failed_validations(&self) -> usize {
        self.validations
            .iter()
            .filter(|outcome| !outcome.result.passed())
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.skipped() > 0 || self.failed_validations() > 0
    }
}
