//! Per-file conversion and the validation pass.
//!
//! Errors are caught at the file boundary: a failing workbook is logged and
//! recorded as skipped, and the remaining files are still processed.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, error, info_span};

use regxml_ingest::{IngestError, list_xml_files, load_input};
use regxml_model::{BuildError, RuleRegistry};
use regxml_report::{output_path_for, write_xml_file};
use regxml_validate::{SchemaValidator, validate_file_with};

use crate::types::{FileOutcome, FileStatus, ValidationOutcome};

/// Loads, builds and writes one workbook; returns the written path.
pub fn convert_file(path: &Path, registry: &RuleRegistry, output_dir: &Path) -> Result<PathBuf> {
    let input = load_input(path, registry)?;
    let document = regxml_core::build_input(&input, registry)?;
    let output = output_path_for(path, output_dir);
    write_xml_file(&output, &document)?;
    Ok(output)
}

/// Converts every file, logging and recording failures instead of stopping.
pub fn convert_files(
    files: &[PathBuf],
    registry: &RuleRegistry,
    output_dir: &Path,
) -> Vec<FileOutcome> {
    files
        .iter()
        .map(|path| {
            let span = info_span!(
                "convert",
                report = %registry.report,
                file = %file_label(path)
            );
            let _guard = span.enter();
            let start = Instant::now();
            match convert_file(path, registry, output_dir) {
                Ok(output) => {
                    debug!(
                        output = %output.display(),
                        duration_ms = start.elapsed().as_millis(),
                        "Wrote report"
                    );
                    FileOutcome {
                        input: path.clone(),
                        status: FileStatus::Written,
                        output: Some(output),
                        kind: None,
                        detail: String::new(),
                    }
                }
                Err(err) => {
                    let failure = Failure::from_error(&err);
                    error!(
                        report = %registry.report,
                        kind = %failure.kind,
                        tag = failure.tag.as_deref().unwrap_or("-"),
                        section = failure.section.as_deref().unwrap_or("-"),
                        "Skipping {}: {err:#}",
                        file_label(path)
                    );
                    FileOutcome {
                        input: path.clone(),
                        status: FileStatus::Skipped,
                        output: None,
                        kind: Some(failure.kind),
                        detail: format!("{err:#}"),
                    }
                }
            }
        })
        .collect()
}

/// Validates every `.xml` file in `output_dir` against `schema`.
///
/// Passing files are logged at debug; failing files at error together with
/// each diagnostic.
pub fn validate_outputs(
    output_dir: &Path,
    schema: &Path,
    validator: &dyn SchemaValidator,
) -> Result<Vec<ValidationOutcome>> {
    let files = list_xml_files(output_dir)?;
    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let result = validate_file_with(validator, &file, schema)?;
        if result.passed() {
            debug!(file = %file_label(&file), "Validation passed");
        } else {
            error!(
                file = %file_label(&file),
                status = result.status.as_str(),
                schema = %schema.display(),
                "Validation failed"
            );
            for diagnostic in &result.diagnostics {
                error!(file = %file_label(&file), "{diagnostic}");
            }
        }
        outcomes.push(ValidationOutcome { file, result });
    }
    Ok(outcomes)
}

/// Error kind and location extracted from a conversion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: String,
    pub tag: Option<String>,
    pub section: Option<String>,
}

impl Failure {
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(build) = cause.downcast_ref::<BuildError>() {
                return Self {
                    kind: build.kind().as_str().to_string(),
                    tag: build.tag().map(str::to_string),
                    section: build.location().map(|at| at.section.clone()),
                };
            }
            if let Some(ingest) = cause.downcast_ref::<IngestError>() {
                let kind = ingest
                    .kind()
                    .map_or("IngestError", |kind| kind.as_str())
                    .to_string();
                return Self {
                    kind,
                    tag: None,
                    section: None,
                };
            }
        }
        Self {
            kind: "OutputError".to_string(),
            tag: None,
            section: None,
        }
    }
}

pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regxml_model::{Location, ReportType};

    #[test]
    fn test_failure_from_build_error() {
        let err = anyhow::Error::new(BuildError::MissingRequiredField {
            at: Location::new(ReportType::Aif, "Base currency", "FXEURRate"),
        });
        let failure = Failure::from_error(&err);
        assert_eq!(failure.kind, "MissingRequiredField");
        assert_eq!(failure.tag.as_deref(), Some("FXEURRate"));
        assert_eq!(failure.section.as_deref(), Some("Base currency"));
    }

    #[test]
    fn test_failure_from_ingest_error() {
        let err = anyhow::Error::new(IngestError::MissingKolomtag {
            sheet: "BT".to_string(),
        });
        assert_eq!(Failure::from_error(&err).kind, "IngestError");
    }

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Path::new("/in/fund.xlsx")), "fund.xlsx");
    }
}
