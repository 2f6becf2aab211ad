#![deny(unsafe_code)]

//! Spreadsheet ingestion for regulatory reports.
//!
//! This crate finds input workbooks and normalizes them into the shapes the
//! builder consumes.
//!
//! # Features
//!
//! - **Discovery**: list `.xls`/`.xlsx` inputs and generated `.xml` outputs
//! - **Workbooks**: read every sheet into a dense [`Grid`] via calamine
//! - **Field tables**: AIF/AIFM sheets with positional columns
//! - **Form sheets**: OFK sheets keyed by their `Kolomtag` row
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use regxml_ingest::{load_input, require_workbooks};
//! use regxml_model::ReportType;
//!
//! let registry = regxml_standards::registry(ReportType::Aifm);
//! for file in require_workbooks(Path::new("input"))? {
//!     let input = load_input(&file, registry)?;
//! }
//! ```

mod discovery;
mod error;
mod fields;
mod forms;
mod workbook;

use std::path::Path;

use regxml_model::{ReportInput, RuleRegistry};

// === Error Types ===
pub use error::{IngestError, Result};

// === File Discovery ===
pub use discovery::{WORKBOOK_EXTENSIONS, list_workbooks, list_xml_files, require_workbooks};

// === Workbook Reading ===
pub use workbook::{Grid, cell_value, grid_from_range, read_workbook};

// === Normalization ===
pub use fields::field_table_from_grid;
pub use forms::{KOLOMTAG, form_sheet_from_grid, form_workbook_from_grids};

/// Loads one input file in the shape the registry expects.
///
/// AIF and AIFM read the first sheet as a field table; OFK reads every sheet
/// the registry does not skip as a form sheet.
pub fn load_input(path: &Path, registry: &RuleRegistry) -> Result<ReportInput> {
    let grids = read_workbook(path)?;
    let input = if registry.report.uses_field_table() {
        // read_workbook rejects workbooks without sheets.
        let first = grids.first().map(field_table_from_grid).unwrap_or_default();
        tracing::debug!(rows = first.rows().len(), "Normalized field table");
        ReportInput::Fields(first)
    } else {
        let skip = registry
            .forms()
            .map(|forms| forms.skip_sheets.as_slice())
            .unwrap_or_default();
        let workbook = form_workbook_from_grids(&grids, skip)?;
        tracing::debug!(sheets = workbook.sheets.len(), "Normalized form workbook");
        ReportInput::Forms(workbook)
    };
    Ok(input)
}
