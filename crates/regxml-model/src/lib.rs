pub mod document;
pub mod error;
pub mod field_table;
pub mod report;
pub mod rules;
pub mod sheet;
pub mod validation;

pub use document::DocumentNode;
pub use error::{BuildError, ErrorKind, Location, Result};
pub use field_table::{FieldRow, FieldTable, INPUT_SLOTS, IdKind, Slot};
pub use report::ReportType;
pub use rules::{
    BlockedColumns, Check, ColumnChecks, ColumnSlice, Constraint, FieldRule, FormRules,
    Generated, GroupRule, Item, MemberSelector, Predicate, Presence, RegistryBody, RootAttribute,
    RootRule, RowKey, RuleRegistry, SectionRule, Source, Sweep, TimestampFormat, Transform,
};
pub use sheet::{CellValue, FormRow, FormSheet, FormWorkbook, ReportInput};
pub use validation::{Diagnostic, ValidationResult, ValidationStatus};
