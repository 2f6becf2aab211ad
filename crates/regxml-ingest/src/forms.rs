//! OFK sheets onto [`FormSheet`].

use regxml_model::{CellValue, FormRow, FormSheet, FormWorkbook};

use crate::error::{IngestError, Result};
use crate::workbook::Grid;

/// Label of the row that names the columns.
pub const KOLOMTAG: &str = "Kolomtag";

const TITLE_ROW: usize = 0;
const FORM_TAG_ROW: usize = 1;
const LABEL_COL: usize = 0;

/// Maps one OFK sheet.
///
/// Row 0 is a title row. The form tag is the first non-empty cell after the
/// label column in row 1. Column A holds row labels; the `Kolomtag` row names
/// the columns and every other labelled row is a data row.
pub fn form_sheet_from_grid(grid: &Grid) -> Result<FormSheet> {
    let width = grid.width();

    let form_tag = (LABEL_COL + 1..width)
        .map(|col| grid.cell(FORM_TAG_ROW, col))
        .find(|cell| !cell.is_empty())
        .map(CellValue::to_text)
        .ok_or_else(|| IngestError::MissingFormTag {
            sheet: grid.name.clone(),
        })?;

    let kolomtag_row = (TITLE_ROW + 1..grid.height())
        .find(|&row| label(grid, row) == KOLOMTAG)
        .ok_or_else(|| IngestError::MissingKolomtag {
            sheet: grid.name.clone(),
        })?;

    // (grid column, name) for every named column.
    let columns: Vec<(usize, String)> = (LABEL_COL + 1..width)
        .map(|col| (col, grid.cell(kolomtag_row, col).to_text()))
        .filter(|(_, name)| !name.is_empty())
        .collect();

    let mut sheet = FormSheet::new(grid.name.as_str(), form_tag)
        .with_columns(columns.iter().map(|(_, name)| name.as_str()));

    for row in TITLE_ROW + 1..grid.height() {
        let row_label = label(grid, row);
        if row_label.is_empty() || row == kolomtag_row {
            continue;
        }
        let cells = columns
            .iter()
            .map(|(col, _)| grid.cell(row, *col).clone())
            .collect();
        sheet = sheet.with_row(FormRow::new(row_label, cells));
    }

    Ok(sheet)
}

/// Maps every sheet of an OFK workbook not named in `skip`, in sheet order.
pub fn form_workbook_from_grids(grids: &[Grid], skip: &[&str]) -> Result<FormWorkbook> {
    grids
        .iter()
        .filter(|grid| !skip.contains(&grid.name.as_str()))
        .map(form_sheet_from_grid)
        .collect::<Result<Vec<_>>>()
        .map(FormWorkbook::new)
}

fn label(grid: &Grid, row: usize) -> String {
    grid.cell(row, LABEL_COL).to_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        value.into()
    }

    fn sample() -> Grid {
        Grid::new(
            "WVU-L",
            vec![
                vec![text("Winst-en-verliesrekening"), CellValue::Empty],
                vec![CellValue::Empty, text("WVU"), CellValue::Empty],
                vec![text("Kolomtag"), text("Regel"), CellValue::Empty, text("Bedrag")],
                vec![text("r1"), CellValue::Empty, text("ignored"), CellValue::Int(12)],
                vec![CellValue::Empty, text("no label")],
                vec![text("r2"), CellValue::Empty, CellValue::Empty, CellValue::Int(-4)],
            ],
        )
    }

    #[test]
    fn test_form_sheet_layout() {
        let sheet = form_sheet_from_grid(&sample()).unwrap();
        assert_eq!(sheet.name, "WVU-L");
        assert_eq!(sheet.form_tag, "WVU");
        assert_eq!(sheet.columns, vec!["Regel", "Bedrag"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].label, "r1");
        assert_eq!(sheet.rows[0].cells, vec![CellValue::Empty, CellValue::Int(12)]);
        assert_eq!(sheet.rows[1].cells[1], CellValue::Int(-4));
    }

    #[test]
    fn test_missing_kolomtag() {
        let grid = Grid::new(
            "BT",
            vec![vec![text("title")], vec![CellValue::Empty, text("BT")]],
        );
        let err = form_sheet_from_grid(&grid).unwrap_err();
        assert!(matches!(err, IngestError::MissingKolomtag { .. }));
    }

    #[test]
    fn test_skipped_sheets_are_not_parsed() {
        let overview = Grid::new("Formulierenoverzicht", vec![vec![text("Overzicht")]]);
        let workbook =
            form_workbook_from_grids(&[overview, sample()], &["Formulierenoverzicht"]).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        assert_eq!(workbook.sheets[0].name, "WVU-L");
    }

    #[test]
    fn test_missing_form_tag() {
        let grid = Grid::new("BT", vec![vec![text("title")]]);
        let err = form_sheet_from_grid(&grid).unwrap_err();
        assert!(matches!(err, IngestError::MissingFormTag { .. }));
    }
}
