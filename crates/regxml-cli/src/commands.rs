use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use regxml_cli::config::{FileConfig, Overrides, Settings};
use regxml_cli::pipeline::{convert_files, validate_outputs};
use regxml_cli::types::{RunResult, ValidationOutcome};
use regxml_ingest::require_workbooks;
use regxml_model::{BlockedColumns, RegistryBody, ReportType, RuleRegistry};
use regxml_validate::default_validator;

use crate::cli::{RunArgs, ValidateArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_report(
    report: ReportType,
    args: &RunArgs,
    file: Option<&FileConfig>,
) -> Result<RunResult> {
    let registry = regxml_standards::registry(report);
    let settings = Settings::resolve(
        report,
        registry.schema,
        &Overrides {
            input_dir: args.input_dir.clone(),
            output_dir: args.output_dir.clone(),
            schema: args.schema.clone(),
        },
        file,
    );
    let run_span = info_span!("run", report = %report, version = registry.version);
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 1: Discover input workbooks
    // =========================================================================
    let files = require_workbooks(&settings.input_dir)?;
    info!(
        input_dir = %settings.input_dir.display(),
        file_count = files.len(),
        "discovery complete"
    );

    // =========================================================================
    // Stage 2: Load, build and write each workbook
    // =========================================================================
    let convert_start = Instant::now();
    let outcomes = convert_files(&files, registry, &settings.output_dir);
    let mut result = RunResult {
        report,
        input_dir: settings.input_dir.clone(),
        output_dir: settings.output_dir.clone(),
        schema: settings.schema.clone(),
        files: outcomes,
        validations: Vec::new(),
    };
    info!(
        written = result.written(),
        skipped = result.skipped(),
        duration_ms = convert_start.elapsed().as_millis(),
        "conversion complete"
    );

    // =========================================================================
    // Stage 3: Validate every XML file in the output directory
    // =========================================================================
    if args.no_validate {
        info!("validation skipped");
    } else if !settings.output_dir.is_dir() {
        warn!(
            output_dir = %settings.output_dir.display(),
            "output directory missing; validation skipped"
        );
    } else {
        result.validations = validate_stage(&settings)?;
    }

    Ok(result)
}

pub fn run_validate(args: &ValidateArgs, file: Option<&FileConfig>) -> Result<RunResult> {
    let report = ReportType::from(args.report);
    let registry = regxml_standards::registry(report);
    let settings = Settings::resolve(
        report,
        registry.schema,
        &Overrides {
            input_dir: None,
            output_dir: args.dir.clone(),
            schema: args.schema.clone(),
        },
        file,
    );
    let run_span = info_span!("validate", report = %report);
    let _run_guard = run_span.enter();
    let validations = validate_stage(&settings)?;
    Ok(RunResult {
        report,
        input_dir: settings.input_dir,
        output_dir: settings.output_dir,
        schema: settings.schema,
        files: Vec::new(),
        validations,
    })
}

fn validate_stage(settings: &Settings) -> Result<Vec<ValidationOutcome>> {
    let validator = default_validator();
    let start = Instant::now();
    let outcomes = validate_outputs(&settings.output_dir, &settings.schema, validator.as_ref())
        .with_context(|| format!("validate {}", settings.output_dir.display()))?;
    let failed = outcomes
        .iter()
        .filter(|outcome| !outcome.result.passed())
        .count();
    info!(
        backend = validator.name(),
        schema = %settings.schema.display(),
        file_count = outcomes.len(),
        failed,
        duration_ms = start.elapsed().as_millis(),
        "validation complete"
    );
    Ok(outcomes)
}

pub fn run_rules(report: ReportType) -> Result<()> {
    let registry = regxml_standards::registry(report);
    println!(
        "{} rules v{} (root <{}>, schema {})",
        registry.report, registry.version, registry.root.element, registry.schema
    );
    println!("{}", rules_table(registry));
    Ok(())
}

fn rules_table(registry: &RuleRegistry) -> Table {
    let mut table = Table::new();
    apply_table_style(&mut table);
    match &registry.body {
        RegistryBody::Sections(sections) => {
            table.set_header(vec![
                header_cell("Section"),
                header_cell("Parent"),
                header_cell("Fields"),
                header_cell("Sweeps"),
                header_cell("Groups"),
                header_cell("Checks"),
            ]);
            for section in sections {
                table.add_row(vec![
                    section.name.to_string(),
                    section.parent.join("/"),
                    section.count("field").to_string(),
                    section.count("sweep").to_string(),
                    section.count("group").to_string(),
                    section.count("check").to_string(),
                ]);
            }
        }
        RegistryBody::Forms(forms) => {
            table.set_header(vec![
                header_cell("Sheet"),
                header_cell("Control tag"),
                header_cell("Key cells"),
                header_cell("Blocked"),
                header_cell("Checks"),
            ]);
            for (sheet, tag) in &forms.control_tags {
                let blocked = forms
                    .blocked_for(sheet)
                    .map_or_else(|| "-".to_string(), blocked_label);
                table.add_row(vec![
                    (*sheet).to_string(),
                    (*tag).to_string(),
                    yes_no(forms.keeps_key_cells(sheet)).to_string(),
                    blocked,
                    yes_no(forms.checks_for(sheet).is_some()).to_string(),
                ]);
            }
        }
    }
    table
}

fn blocked_label(blocked: BlockedColumns) -> String {
    match blocked {
        BlockedColumns::Last => "last column".to_string(),
        BlockedColumns::Indexes(indexes) => indexes
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "-" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_label() {
        assert_eq!(blocked_label(BlockedColumns::Last), "last column");
        assert_eq!(blocked_label(BlockedColumns::Indexes(&[3, 4])), "3, 4");
    }

    #[test]
    fn test_rules_table_lists_every_section() {
        for report in ReportType::ALL {
            let registry = regxml_standards::registry(report);
            let table = rules_table(registry);
            let expected = match &registry.body {
                RegistryBody::Sections(sections) => sections.len(),
                RegistryBody::Forms(forms) => forms.control_tags.len(),
            };
            assert_eq!(table.row_iter().count(), expected, "{report}");
        }
    }
}
