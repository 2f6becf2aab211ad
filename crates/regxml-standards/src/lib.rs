#![deny(unsafe_code)]

//! Rule registries for every supported report type.
//!
//! Registries are built once on first use and never change afterwards.

mod aif;
mod aifm;
mod ofk;

use std::sync::LazyLock;

use regxml_model::{ReportType, RuleRegistry};

pub use aifm::MARKET_CODE_TYPES;
pub use ofk::CONTROL_TAGS;

static AIF: LazyLock<RuleRegistry> = LazyLock::new(aif::registry);
static AIFM: LazyLock<RuleRegistry> = LazyLock::new(aifm::registry);
static OFK: LazyLock<RuleRegistry> = LazyLock::new(ofk::registry);

/// Returns the process-wide registry for a report type.
pub fn registry(report: ReportType) -> &'static RuleRegistry {
    match report {
        ReportType::Aif => &AIF,
        ReportType::Aifm => &AIFM,
        ReportType::Ofk => &OFK,
    }
}
