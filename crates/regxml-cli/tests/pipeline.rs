//! Integration tests for the conversion and validation passes.

use std::fs;

use regxml_cli::pipeline::{convert_files, validate_outputs};
use regxml_cli::types::{FileStatus, RunResult};
use regxml_model::{DocumentNode, ReportType, ValidationStatus};
use regxml_report::write_xml_file;
use regxml_validate::WellFormedValidator;
use tempfile::TempDir;

const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="AIFMReportingInfo">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="AIFMContentType" type="xs:positiveInteger"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>
"#;

fn output_dir_fixture() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let schema = dir.path().join("report.xsd");
    fs::write(&schema, SCHEMA).unwrap();

    let mut root = DocumentNode::new("AIFMReportingInfo");
    root.children.push(DocumentNode::with_text("AIFMContentType", "1"));
    write_xml_file(&dir.path().join("good.xml"), &root).unwrap();
    fs::write(dir.path().join("bad.xml"), "<AIFMReportingInfo>").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    (dir, schema)
}

#[test]
fn unreadable_workbook_is_skipped_and_run_continues() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("a-broken.xlsx");
    let also_broken = dir.path().join("b-broken.xls");
    fs::write(&broken, b"not a workbook").unwrap();
    fs::write(&also_broken, b"still not a workbook").unwrap();

    let registry = regxml_standards::registry(ReportType::Aifm);
    let outcomes = convert_files(&[broken, also_broken], registry, dir.path());

    assert_eq!(outcomes.len(), 2);
    for outcome in &outcomes {
        assert_eq!(outcome.status, FileStatus::Skipped);
        assert_eq!(outcome.kind.as_deref(), Some("IngestError"));
        assert!(outcome.output.is_none());
        assert!(outcome.detail.contains("failed to open workbook"));
    }
    assert!(!dir.path().join("a-broken.xml").exists());
}

#[test]
fn validation_covers_every_xml_in_output_dir() {
    let (dir, schema) = output_dir_fixture();

    let outcomes = validate_outputs(dir.path(), &schema, &WellFormedValidator).unwrap();

    let names: Vec<_> = outcomes
        .iter()
        .map(|outcome| outcome.file.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["bad.xml", "good.xml"]);
    assert_eq!(outcomes[0].result.status, ValidationStatus::Invalid);
    assert_eq!(outcomes[1].result.status, ValidationStatus::NotChecked);

    let result = RunResult {
        report: ReportType::Aifm,
        input_dir: dir.path().to_path_buf(),
        output_dir: dir.path().to_path_buf(),
        schema,
        files: Vec::new(),
        validations: outcomes,
    };
    assert_eq!(result.failed_validations(), 2);
    assert!(result.has_errors());
}

#[cfg(feature = "libxml2")]
#[test]
fn schema_checked_outputs_pass_or_fail_individually() {
    let (dir, schema) = output_dir_fixture();
    let validator = regxml_validate::default_validator();

    let outcomes = validate_outputs(dir.path(), &schema, validator.as_ref()).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].result.status, ValidationStatus::Invalid);
    assert!(outcomes[1].result.passed(), "{:?}", outcomes[1].result.diagnostics);
}

#[test]
fn missing_output_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nowhere");
    let err = validate_outputs(&missing, &dir.path().join("x.xsd"), &WellFormedValidator)
        .unwrap_err();
    assert!(err.to_string().contains("directory not found"));
}
