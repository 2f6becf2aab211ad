//! Opt-out validator for builds without libxml2: well-formedness only.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use regxml_model::{Diagnostic, ValidationResult, ValidationStatus};

use crate::SchemaValidator;
use crate::error::ValidateError;

/// Checks that a document parses as XML with a single closed root element.
///
/// The schema file must exist but its content is not interpreted. A
/// well-formed document therefore comes back as `NotChecked`, which never
/// counts as passed; only malformed documents are reported `Invalid`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WellFormedValidator;

impl SchemaValidator for WellFormedValidator {
    fn name(&self) -> &'static str {
        "well-formed"
    }

    fn validate(&self, xml: &[u8], schema: &Path) -> ValidationResult {
        if !schema.is_file() {
            let err = ValidateError::SchemaNotFound {
                path: schema.to_path_buf(),
            };
            return ValidationResult::new(
                ValidationStatus::InternalError { code: err.code() },
                vec![Diagnostic::new(None, err.to_string())],
            );
        }

        match check_well_formed(xml) {
            Ok(()) => ValidationResult::new(
                ValidationStatus::NotChecked,
                vec![Diagnostic::new(
                    None,
                    format!(
                        "well-formed; XSD check against {} not performed",
                        schema.display()
                    ),
                )],
            ),
            Err(diagnostic) => ValidationResult::new(ValidationStatus::Invalid, vec![diagnostic]),
        }
    }
}

fn check_well_formed(xml: &[u8]) -> Result<(), Diagnostic> {
    let mut reader = Reader::from_reader(xml);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader.read_event().map_err(|err| {
            let at = offset(reader.buffer_position(), xml.len());
            Diagnostic::new(Some(line_col(xml, at)), err.to_string())
        })?;
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    let end = Some(line_col(xml, xml.len()));
    match (roots, depth) {
        (0, _) => Err(Diagnostic::new(end, "document has no root element")),
        (_, open) if open > 0 => Err(Diagnostic::new(
            end,
            format!("{open} element(s) not closed at end of document"),
        )),
        (n, _) if n > 1 => Err(Diagnostic::new(
            end,
            format!("document has {n} root elements"),
        )),
        _ => Ok(()),
    }
}

fn offset(position: u64, len: usize) -> usize {
    usize::try_from(position).map_or(len, |pos| pos.min(len))
}

/// 1-based `line:column` of a byte offset.
fn line_col(xml: &[u8], at: usize) -> String {
    let before = &xml[..at];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let column = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(at, |nl| at - nl - 1)
        + 1;
    format!("{line}:{column}")
}
