//! Raw worksheet access through calamine.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use regxml_model::CellValue;

use crate::error::{IngestError, Result};

/// One worksheet as a dense grid anchored at cell A1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Cell at `(row, col)`; out-of-range cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Reads every worksheet of a workbook, in sheet order.
pub fn read_workbook(path: &Path) -> Result<Vec<Grid>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    }

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::SheetRead {
                path: path.to_path_buf(),
                sheet: name.clone(),
                message: e.to_string(),
            })?;
        grids.push(grid_from_range(&name, &range));
    }

    tracing::debug!(
        path = %path.display(),
        sheets = grids.len(),
        "Read workbook"
    );
    Ok(grids)
}

/// Converts a calamine range into a grid, padding the rows and columns that
/// precede the range so indices match sheet coordinates.
pub fn grid_from_range(name: &str, range: &Range<Data>) -> Grid {
    let (first_row, first_col) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); first_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; first_col];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    Grid::new(name, rows)
}

/// Maps one calamine cell onto the model's cell type.
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            CellValue::Text(s.clone())
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(CellValue::Float(dt.as_f64()), CellValue::DateTime),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_from_range_pads_offset() {
        let mut range = Range::new((1, 1), (2, 2));
        range.set_value((1, 1), Data::String("Kolomtag".into()));
        range.set_value((2, 2), Data::Float(4.0));

        let grid = grid_from_range("BT", &range);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(1, 1), &CellValue::Text("Kolomtag".into()));
        assert_eq!(grid.cell(2, 2), &CellValue::Float(4.0));
        assert_eq!(grid.cell(0, 0), &CellValue::Empty);
        assert_eq!(grid.cell(9, 9), &CellValue::Empty);
    }

    #[test]
    fn test_cell_value_blank_text_is_empty() {
        assert_eq!(cell_value(&Data::String("  ".into())), CellValue::Empty);
        assert_eq!(cell_value(&Data::Int(-7)), CellValue::Int(-7));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
    }
}
