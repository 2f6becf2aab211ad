//! AIF/AIFM sheets: positional columns onto a [`FieldTable`].
//!
//! The sheet has no header row. Columns are read by position:
//! `xmlTags, Id, XMLDescription, Input_1 .. Input_12`. Sheets with fewer
//! columns (AIFM stops at `Input_2`) leave the remaining slots empty.

use regxml_model::{CellValue, FieldRow, FieldTable, INPUT_SLOTS, IdKind};

use crate::workbook::Grid;

const TAG_COL: usize = 0;
const ID_COL: usize = 1;
const DESCRIPTION_COL: usize = 2;
const FIRST_INPUT_COL: usize = 3;

/// Builds the field table from one grid, keeping sheet order.
///
/// Rows with neither a tag nor an id are dropped.
pub fn field_table_from_grid(grid: &Grid) -> FieldTable {
    (0..grid.height())
        .filter_map(|row| field_row(grid, row))
        .collect()
}

fn field_row(grid: &Grid, row: usize) -> Option<FieldRow> {
    let tag = strip_brackets(&grid.cell(row, TAG_COL).to_text()).to_string();
    let (id, id_kind) = id_cell(grid.cell(row, ID_COL));
    if tag.is_empty() && id.is_empty() {
        return None;
    }

    let mut field = FieldRow::new(tag, id)
        .with_id_kind(id_kind)
        .with_description(grid.cell(row, DESCRIPTION_COL).to_text());
    for (offset, slot) in (1..=INPUT_SLOTS as u8).enumerate() {
        let value = grid.cell(row, FIRST_INPUT_COL + offset).to_text();
        if !value.is_empty() {
            field = field.with_input(slot, value);
        }
    }
    Some(field)
}

/// Text ids label section rows; numeric ids number group members.
fn id_cell(cell: &CellValue) -> (String, IdKind) {
    match cell {
        CellValue::Int(_) | CellValue::Float(_) if cell.is_integer() => {
            (cell.to_text(), IdKind::Number)
        }
        other => (other.to_text(), IdKind::Label),
    }
}

fn strip_brackets(tag: &str) -> &str {
    tag.trim().trim_matches(|c| c == '<' || c == '>').trim()
}
