#![deny(unsafe_code)]

//! Rule-driven document builder.
//!
//! Turns a normalized input (a field table for AIF/AIFM, a form workbook for
//! OFK) into a [`DocumentNode`] tree by walking a [`RuleRegistry`]:
//!
//! - **root**: root element, generated attributes and header rows
//! - **sections**: fields, sweeps, repeating groups and checks
//! - **forms**: OFK column checks and subform output
//!
//! The builder is pure. It does not log, and on failure returns the first
//! [`BuildError`] without a partial tree.

mod eval;
mod forms;
mod root;
mod sections;

use chrono::{Local, NaiveDateTime};

use regxml_model::{
    BuildError, DocumentNode, FieldTable, FormWorkbook, RegistryBody, ReportInput, Result,
    RuleRegistry,
};

pub use eval::is_unsigned_integer;
pub use root::reporting_period;

/// Builds a field-table report stamped with the current local time.
pub fn build(table: &FieldTable, registry: &RuleRegistry) -> Result<DocumentNode> {
    build_at(table, registry, Local::now().naive_local())
}

/// Builds a field-table report as of `now`.
pub fn build_at(
    table: &FieldTable,
    registry: &RuleRegistry,
    now: NaiveDateTime,
) -> Result<DocumentNode> {
    let RegistryBody::Sections(sections) = &registry.body else {
        return Err(mismatch(registry, "field table"));
    };
    let mut root = root::build_root(registry, Some(table), now)?;
    sections::build_sections(
        &mut root,
        sections,
        eval::Scope::table(table),
        registry.report,
    )?;
    Ok(root)
}

/// Builds a form-workbook report stamped with the current local time.
pub fn build_forms(workbook: &FormWorkbook, registry: &RuleRegistry) -> Result<DocumentNode> {
    build_forms_at(workbook, registry, Local::now().naive_local())
}

pub fn build_forms_at(
    workbook: &FormWorkbook,
    registry: &RuleRegistry,
    now: NaiveDateTime,
) -> Result<DocumentNode> {
    let RegistryBody::Forms(rules) = &registry.body else {
        return Err(mismatch(registry, "form workbook"));
    };
    let mut root = root::build_root(registry, None, now)?;
    forms::build_forms(&mut root, workbook, rules)?;
    Ok(root)
}

/// Dispatches on the shape of the input.
pub fn build_input(input: &ReportInput, registry: &RuleRegistry) -> Result<DocumentNode> {
    build_input_at(input, registry, Local::now().naive_local())
}

pub fn build_input_at(
    input: &ReportInput,
    registry: &RuleRegistry,
    now: NaiveDateTime,
) -> Result<DocumentNode> {
    match input {
        ReportInput::Fields(table) => build_at(table, registry, now),
        ReportInput::Forms(workbook) => build_forms_at(workbook, registry, now),
    }
}

fn mismatch(registry: &RuleRegistry, input: &'static str) -> BuildError {
    BuildError::InputMismatch {
        report: registry.report,
        input,
    }
}
