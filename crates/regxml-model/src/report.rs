//! Report types handled by the converter.
//!
//! Each report type has its own XML schema, root element and rule registry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A regulatory report type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Alternative Investment Fund record (AIFMD Annex IV, fund level).
    Aif,
    /// Alternative Investment Fund Manager record (AIFMD Annex IV, manager level).
    Aifm,
    /// DNB balance and flow report, one sheet per subform.
    Ofk,
}

impl ReportType {
    /// All report types in a stable order.
    pub const ALL: [ReportType; 3] = [ReportType::Aif, ReportType::Aifm, ReportType::Ofk];

    /// Returns the upper-case code used in logs and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Aif => "AIF",
            ReportType::Aifm => "AIFM",
            ReportType::Ofk => "OFK",
        }
    }

    /// True when the input is a single field table (AIF, AIFM) rather
    /// than a workbook of form sheets (OFK).
    pub fn uses_field_table(&self) -> bool {
        !matches!(self, ReportType::Ofk)
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "AIF" => Ok(ReportType::Aif),
            "AIFM" => Ok(ReportType::Aifm),
            "OFK" | "OFK-K" => Ok(ReportType::Ofk),
            _ => Err(format!("Unknown report type: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("aif".parse::<ReportType>(), Ok(ReportType::Aif));
        assert_eq!(" AIFM ".parse::<ReportType>(), Ok(ReportType::Aifm));
        assert_eq!("ofk-k".parse::<ReportType>(), Ok(ReportType::Ofk));
        assert!("fund".parse::<ReportType>().is_err());
    }

    #[test]
    fn display_matches_code() {
        for report in ReportType::ALL {
            assert_eq!(report.to_string(), report.as_str());
            assert_eq!(report.as_str().parse::<ReportType>(), Ok(report));
        }
    }
}
