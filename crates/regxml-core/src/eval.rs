//! Value resolution, predicates, constraints and transforms.

use chrono::{NaiveDate, NaiveDateTime};

use regxml_model::{
    BuildError, Constraint, FieldRow, FieldTable, Location, Predicate, ReportType, Result,
    RowKey, Source, Transform,
};

/// Group member being built, with its rank.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Member<'a> {
    pub row: &'a FieldRow,
    pub rank: u32,
}

/// What rule sources resolve against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub table: &'a FieldTable,
    pub member: Option<Member<'a>>,
}

impl<'a> Scope<'a> {
    pub fn table(table: &'a FieldTable) -> Self {
        Self {
            table,
            member: None,
        }
    }

    pub fn with_member(self, member: Member<'a>) -> Self {
        Self {
            member: Some(member),
            ..self
        }
    }

    /// Trimmed value of a source; missing rows and slots read as `""`.
    pub fn resolve(&self, source: Source) -> String {
        match source {
            Source::Field { row, slot } => {
                let found = match row {
                    RowKey::Tagged { first, last, tag } => self.table.tagged(first, last, tag),
                    RowKey::Id(id) => self.table.by_id(id),
                };
                found.map_or_else(String::new, |row| row.value(slot).trim().to_string())
            }
            Source::Member(slot) => self
                .member
                .map_or_else(String::new, |m| m.row.value(slot).trim().to_string()),
            Source::Rank => self
                .member
                .map_or_else(String::new, |m| m.rank.to_string()),
        }
    }

    pub fn holds(&self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Always => true,
            Predicate::Present(source) => !self.resolve(*source).is_empty(),
            Predicate::Empty(source) => self.resolve(*source).is_empty(),
            Predicate::Equals(source, value) => self.resolve(*source) == *value,
            Predicate::EqualsIgnoreCase(source, value) => {
                self.resolve(*source).eq_ignore_ascii_case(value)
            }
            Predicate::Not(inner) => !self.holds(inner),
            Predicate::RowsExist { first, last } => {
                self.table.labelled(*first, *last).next().is_some()
            }
            Predicate::All(all) => all.iter().all(|p| self.holds(p)),
            Predicate::Any(any) => any.iter().any(|p| self.holds(p)),
        }
    }
}

/// Section and report used to locate errors.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub report: ReportType,
    pub section: &'a str,
}

impl Context<'_> {
    pub fn at(&self, tag: &str) -> Location {
        Location::new(self.report, self.section, tag)
    }

    pub fn missing(&self, tag: &str) -> BuildError {
        BuildError::MissingRequiredField { at: self.at(tag) }
    }
}

pub(crate) fn check_constraint(
    constraint: Constraint,
    value: &str,
    ctx: &Context<'_>,
    tag: &str,
) -> Result<()> {
    match constraint {
        Constraint::UnsignedInteger => {
            if !is_unsigned_integer(value) {
                return Err(BuildError::NotAnUnsignedInteger {
                    at: ctx.at(tag),
                    value: value.to_string(),
                });
            }
        }
        Constraint::MaxLength(max) => {
            let actual = value.chars().count();
            if actual > max {
                return Err(BuildError::LengthExceeded {
                    at: ctx.at(tag),
                    max,
                    actual,
                });
            }
        }
        Constraint::OneOf(allowed) => {
            if !allowed.contains(&value) {
                return Err(BuildError::DomainValueViolation {
                    at: ctx.at(tag),
                    value: value.to_string(),
                    allowed: allowed.iter().map(|v| (*v).to_string()).collect(),
                });
            }
        }
    }
    Ok(())
}

/// Digits only: no sign, no fraction, no exponent.
pub fn is_unsigned_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub(crate) fn apply_transform(
    transform: Transform,
    value: &str,
    ctx: &Context<'_>,
    tag: &str,
) -> Result<String> {
    match transform {
        Transform::Verbatim => Ok(value.to_string()),
        Transform::Upper => Ok(value.to_uppercase()),
        Transform::Lower => Ok(value.to_lowercase()),
        Transform::Blank => Ok(String::new()),
        Transform::DateOnly if value.is_empty() => Ok(String::new()),
        Transform::DateOnly => date_only(value)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .ok_or_else(|| BuildError::InvalidDate {
                at: ctx.at(tag),
                value: value.to_string(),
            }),
    }
}

fn date_only(value: &str) -> Option<NaiveDate> {
    const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regxml_model::Slot;

    fn ctx() -> Context<'static> {
        Context {
            report: ReportType::Aifm,
            section: "Test",
        }
    }

    #[test]
    fn date_only_strips_time() {
        let out = apply_transform(Transform::DateOnly, "2024-06-30 00:00:00", &ctx(), "D");
        assert_eq!(out.as_deref(), Ok("2024-06-30"));
        let out = apply_transform(Transform::DateOnly, "2024-06-30", &ctx(), "D");
        assert_eq!(out.as_deref(), Ok("2024-06-30"));
        let err = apply_transform(Transform::DateOnly, "30/06/2024", &ctx(), "D");
        assert!(matches!(err, Err(BuildError::InvalidDate { .. })));
    }

    #[test]
    fn max_length_counts_characters() {
        let value = "é".repeat(4);
        assert!(check_constraint(Constraint::MaxLength(4), &value, &ctx(), "C").is_ok());
        let err = check_constraint(Constraint::MaxLength(3), &value, &ctx(), "C");
        assert!(matches!(
            err,
            Err(BuildError::LengthExceeded { max: 3, actual: 4, .. })
        ));
    }

    #[test]
    fn missing_rows_resolve_empty() {
        let table = FieldTable::new(vec![FieldRow::new("BaseCurrency", "48").with_input(1, " usd ")]);
        let scope = Scope::table(&table);
        assert_eq!(scope.resolve(Source::tagged(48, 53, "BaseCurrency")), "usd");
        assert_eq!(scope.resolve(Source::tagged(48, 53, "FXEURRate")), "");
        assert_eq!(scope.resolve(Source::Member(Slot::Input(1))), "");
        assert!(scope.holds(&Predicate::equals_ignore_case(
            Source::tagged(48, 53, "BaseCurrency"),
            "USD"
        )));
    }
}
