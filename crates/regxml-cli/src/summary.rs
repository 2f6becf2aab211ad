use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use regxml_cli::pipeline::file_label;
use regxml_cli::types::{FileOutcome, FileStatus, RunResult, ValidationOutcome};
use regxml_model::ValidationStatus;

pub fn print_summary(result: &RunResult) {
    println!("Report: {}", result.report);
    println!("Input: {}", result.input_dir.display());
    println!("Output: {}", result.output_dir.display());
    println!("Schema: {}", result.schema.display());

    if !result.files.is_empty() {
        println!("{}", files_table(&result.files));
    }
    if !result.validations.is_empty() {
        println!("{}", validation_table(&result.validations));
    }
    println!(
        "{} written, {} skipped, {} of {} XML file(s) failed validation",
        result.written(),
        result.skipped(),
        result.failed_validations(),
        result.validations.len()
    );
}

fn files_table(files: &[FileOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Status"),
        header_cell("Output"),
        header_cell("Detail"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for file in files {
        let (status, detail) = match file.status {
            FileStatus::Written => (Cell::new("written").fg(Color::Green), dim_cell("-")),
            FileStatus::Skipped => (
                Cell::new(file.kind.as_deref().unwrap_or("skipped")).fg(Color::Red),
                Cell::new(&file.detail),
            ),
        };
        table.add_row(vec![
            Cell::new(file_label(&file.input)).add_attribute(Attribute::Bold),
            status,
            file.output
                .as_deref()
                .map_or_else(|| dim_cell("-"), |path| Cell::new(file_label(path))),
            detail,
        ]);
    }
    table
}

fn validation_table(validations: &[ValidationOutcome]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Validation"),
        header_cell("Messages"),
        header_cell("First message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    for outcome in validations {
        let result = &outcome.result;
        let first = result
            .diagnostics
            .first()
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![
            Cell::new(file_label(&outcome.file)).add_attribute(Attribute::Bold),
            status_cell(result.status),
            Cell::new(result.diagnostics.len()),
            first,
        ]);
    }
    table
}

fn status_cell(status: ValidationStatus) -> Cell {
    let color = match status {
        ValidationStatus::Valid => Color::Green,
        ValidationStatus::Invalid => Color::Red,
        ValidationStatus::InternalError { .. } | ValidationStatus::NotChecked => Color::Yellow,
    };
    Cell::new(status.as_str()).fg(color)
}

/// Compact style for simple listings.
pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_summary_table_style(table: &mut Table) {
    apply_table_style(table);
    table.set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
