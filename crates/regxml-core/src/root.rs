use chrono::{Datelike, NaiveDateTime};

use regxml_model::{
    BuildError, DocumentNode, FieldTable, Generated, Location, Result, RootAttribute,
    RuleRegistry, Slot,
};

const HEADER_SECTION: &str = "Header";

/// Root element with its attributes and leading elements.
pub(crate) fn build_root(
    registry: &RuleRegistry,
    table: Option<&FieldTable>,
    now: NaiveDateTime,
) -> Result<DocumentNode> {
    let rule = &registry.root;
    let mut root = DocumentNode::new(rule.element);

    for attribute in &rule.attributes {
        match attribute {
            RootAttribute::Fixed { name, value } => root.push_attribute(*name, *value),
            RootAttribute::Generated { name, value } => {
                root.push_attribute(*name, generate(*value, now));
            }
            RootAttribute::HeaderRows { first, last, count } => {
                let Some(table) = table else { continue };
                let rows: Vec<_> = table.labelled(*first, *last).take(*count).collect();
                if rows.len() < *count {
                    return Err(BuildError::MissingRequiredField {
                        at: Location::new(
                            registry.report,
                            HEADER_SECTION,
                            format!("header row {}", rows.len() + 1),
                        ),
                    });
                }
                // Only a filled first row with an empty follower is rejected.
                if let Some((lead, rest)) = rows.split_first()
                    && !lead.value(Slot::Input(1)).trim().is_empty()
                    && let Some(blank) = rest
                        .iter()
                        .find(|row| row.value(Slot::Input(1)).trim().is_empty())
                {
                    return Err(BuildError::MissingRequiredField {
                        at: Location::new(registry.report, HEADER_SECTION, blank.tag.as_str()),
                    });
                }
                for row in rows {
                    root.push_attribute(row.tag.as_str(), row.value(Slot::Input(1)).trim());
                }
            }
        }
    }

    for (element, value) in &rule.leading {
        root.children
            .push(DocumentNode::with_text(*element, generate(*value, now)));
    }

    Ok(root)
}

fn generate(value: Generated, now: NaiveDateTime) -> String {
    match value {
        Generated::Timestamp(format) => now.format(format.pattern()).to_string(),
        Generated::ReportingPeriod { template } => {
            template.replace("{period}", &reporting_period(now))
        }
    }
}

/// The month before `now`, as `YYYY-MM`.
pub fn reporting_period(now: NaiveDateTime) -> String {
    let (year, month) = match now.month() {
        1 => (now.year() - 1, 12),
        m => (now.year(), m - 1),
    };
    format!("{year:04}-{month:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(9, 30, 5))
            .expect("valid timestamp")
    }

    #[test]
    fn reporting_period_rolls_back_the_year() {
        assert_eq!(reporting_period(at(2020, 4, 15)), "2020-03");
        assert_eq!(reporting_period(at(2021, 1, 2)), "2020-12");
        assert_eq!(reporting_period(at(2021, 11, 30)), "2021-10");
    }
}
