//! OFK workbooks: per-sheet column checks, then one subform per sheet.

use regxml_model::{
    BuildError, CellValue, ColumnChecks, ColumnSlice, DocumentNode, FormRules, FormSheet,
    FormWorkbook, ReportType, Result,
};

use crate::eval::Context;

/// A sheet after key handling and blocked-column removal.
struct PreparedSheet<'a> {
    sheet: &'a FormSheet,
    /// `(column name, source index)` of every column kept for output.
    kept: Vec<(&'a str, usize)>,
    rows: Vec<Vec<CellValue>>,
}

pub(crate) fn build_forms(
    root: &mut DocumentNode,
    workbook: &FormWorkbook,
    rules: &FormRules,
) -> Result<()> {
    let prepared: Vec<PreparedSheet<'_>> = workbook
        .sheets
        .iter()
        .filter(|sheet| !rules.skips(&sheet.name))
        .map(|sheet| prepare(sheet, rules))
        .collect();

    // Nothing is emitted unless every sheet passes.
    for sheet in &prepared {
        if let Some(checks) = rules.checks_for(&sheet.sheet.name) {
            validate_sheet(sheet, checks)?;
        }
    }

    for sheet in &prepared {
        let name = sheet.sheet.name.as_str();
        let Some(control_tag) = rules.control_tag(name) else {
            return Err(BuildError::UnsupportedReportSubtype {
                at: context(name).at(name),
                value: name.to_string(),
            });
        };

        let form = root.last_child_or_insert(sheet.sheet.form_tag.trim());
        let mut subform = DocumentNode::new(name);
        for cells in &sheet.rows {
            let mut record = DocumentNode::new(control_tag);
            for &(column, idx) in &sheet.kept {
                let text = cells.get(idx).map(CellValue::to_text).unwrap_or_default();
                record.children.push(DocumentNode::with_text(column, text));
            }
            subform.children.push(record);
        }
        form.children.push(subform);
    }
    Ok(())
}

fn prepare<'a>(sheet: &'a FormSheet, rules: &FormRules) -> PreparedSheet<'a> {
    let keep_key = rules.keeps_key_cells(&sheet.name);
    let blocked = rules.blocked_for(&sheet.name);
    let len = sheet.columns.len();

    let kept = sheet
        .columns
        .iter()
        .enumerate()
        .filter(|(idx, _)| !blocked.is_some_and(|b| b.contains(*idx, len)))
        .map(|(idx, name)| (name.trim(), idx))
        .collect();

    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            let mut cells = row.cells.clone();
            cells.resize(len, CellValue::Empty);
            if !keep_key && let Some(key) = cells.first_mut() {
                *key = CellValue::Text(row.label.trim().to_string());
            }
            cells
        })
        .collect();

    PreparedSheet { sheet, kept, rows }
}

fn validate_sheet(prepared: &PreparedSheet<'_>, checks: &ColumnChecks) -> Result<()> {
    let columns = &prepared.sheet.columns;
    let in_slices = |slices: &[ColumnSlice], name: &str| {
        slices.iter().any(|slice| {
            columns[slice.resolve(columns.len())]
                .iter()
                .any(|column| column.trim() == name)
        })
    };
    let ctx = context(&prepared.sheet.name);

    for cells in &prepared.rows {
        for &(name, idx) in &prepared.kept {
            let cell = &cells[idx];
            if in_slices(checks.integer, name) {
                if cell.is_empty() {
                    return Err(ctx.missing(name));
                }
                let Some(value) = cell.as_integer() else {
                    return Err(BuildError::NotAnInteger {
                        at: ctx.at(name),
                        value: cell.to_text(),
                    });
                };
                if value < 0 && in_slices(checks.non_negative, name) {
                    return Err(BuildError::NotAnUnsignedInteger {
                        at: ctx.at(name),
                        value: value.to_string(),
                    });
                }
            } else if in_slices(checks.text, name) {
                if cell.is_empty() {
                    return Err(ctx.missing(name));
                }
                if !cell.is_text() {
                    return Err(BuildError::NotAString {
                        at: ctx.at(name),
                        value: cell.to_text(),
                    });
                }
                let actual = cell.to_text().chars().count();
                if checks.country_code && name == "Land" && actual != 2 {
                    return Err(BuildError::LengthMismatch {
                        at: ctx.at(name),
                        expected: 2,
                        actual,
                    });
                }
            }
        }
    }
    Ok(())
}

fn context(sheet: &str) -> Context<'_> {
    Context {
        report: ReportType::Ofk,
        section: sheet,
    }
}
