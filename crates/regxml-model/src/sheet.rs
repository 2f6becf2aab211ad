//! Typed cells and the form-sheet view used by OFK workbooks.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::field_table::FieldTable;

/// Raw spreadsheet value. `Empty` is a value of its own, not an absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// True for `Empty` and for text that trims to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for output and for the field table.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Numeric cells holding a whole number.
    pub fn is_integer(&self) -> bool {
        self.as_integer().is_some()
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 => {
                Some(*f as i64)
            }
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

/// One labelled data row of a form sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormRow {
    pub label: String,
    /// One cell per named column, in column order.
    pub cells: Vec<CellValue>,
}

impl FormRow {
    pub fn new(label: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            label: label.into(),
            cells,
        }
    }
}

/// One OFK sheet: a subform of the form named by `form_tag`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSheet {
    pub name: String,
    pub form_tag: String,
    /// Column names from the `Kolomtag` row.
    pub columns: Vec<String>,
    pub rows: Vec<FormRow>,
}

impl FormSheet {
    pub fn new(name: impl Into<String>, form_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            form_tag: form_tag.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_row(mut self, row: FormRow) -> Self {
        self.rows.push(row);
        self
    }
}

/// All sheets of one OFK workbook in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormWorkbook {
    pub sheets: Vec<FormSheet>,
}

impl FormWorkbook {
    pub fn new(sheets: Vec<FormSheet>) -> Self {
        Self { sheets }
    }
}

/// The normalized content of one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportInput {
    Fields(FieldTable),
    Forms(FormWorkbook),
}

impl ReportInput {
    pub fn shape(&self) -> &'static str {
        match self {
            ReportInput::Fields(_) => "field table",
            ReportInput::Forms(_) => "form workbook",
        }
    }
}
