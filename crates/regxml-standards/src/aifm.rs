//! AIFMD Annex IV manager-level record (`AIFMD_DATMAN_V1.2.xsd`).

use regxml_model::{
    Check, Constraint, FieldRule, Generated, GroupRule, MemberSelector, Predicate, RegistryBody,
    ReportType, RootAttribute, RootRule, RuleRegistry, SectionRule, Slot, Source, Sweep,
    TimestampFormat, Transform,
};

/// Allowed `MarketCodeType` values for the five principal markets.
pub const MARKET_CODE_TYPES: &[&str] = &["MIC", "XXX", "OTC", "NOT"];

const RECORD: (u32, u32) = (4, 9);
const OBLIGATION: (u32, u32) = (10, 15);
const DETAILS: (u32, u32) = (16, 21);
const IDENTIFIER: (u32, u32) = (22, 25);
const ASSETS: (u32, u32) = (33, 38);

const RECORD_INFO: &[&str] = &["AIFMRecordInfo"];
const COMPLETE: &[&str] = &["AIFMRecordInfo", "AIFMCompleteDescription"];

fn field(range: (u32, u32), tag: &'static str) -> FieldRule {
    FieldRule::tagged(range.0, range.1, tag)
}

fn source(range: (u32, u32), tag: &'static str) -> Source {
    Source::tagged(range.0, range.1, tag)
}

pub(crate) fn registry() -> RuleRegistry {
    RuleRegistry {
        report: ReportType::Aifm,
        version: "1.2",
        schema: "AIFMD_DATMAN_V1.2.xsd",
        root: RootRule {
            element: "AIFMReportingInfo",
            attributes: vec![
                RootAttribute::Fixed {
                    name: "xsi:noNamespaceSchemaLocation",
                    value: "AIFMD_DATMAN_V1.2.xsd",
                },
                RootAttribute::Generated {
                    name: "CreationDateAndTime",
                    value: Generated::Timestamp(TimestampFormat::Seconds),
                },
                RootAttribute::HeaderRows {
                    first: 1,
                    last: 3,
                    count: 2,
                },
                RootAttribute::Fixed {
                    name: "xmlns:xsi",
                    value: "http://www.w3.org/2001/XMLSchema-instance",
                },
            ],
            leading: Vec::new(),
        },
        body: RegistryBody::Sections(vec![
            SectionRule::new("Record info", RECORD_INFO).item(
                Sweep::rows(RECORD.0, RECORD.1)
                    .required()
                    .transform("ReportingPeriodStartDate", Transform::DateOnly)
                    .transform("ReportingPeriodEndDate", Transform::DateOnly),
            ),
            obligation(),
            SectionRule::new("Record details", RECORD_INFO)
                .item(Sweep::rows(DETAILS.0, DETAILS.1).required()),
            identifier(),
            principal_markets(),
            principal_instruments(),
            assets_under_management(),
        ]),
    }
}

fn obligation() -> SectionRule {
    let frequency = source(OBLIGATION, "AIFMReportingObligationChangeFrequencyCode");
    let contents = source(OBLIGATION, "AIFMReportingObligationChangeContentsCode");
    let assumption = source(OBLIGATION, "AssumptionDescription");
    let assumption_pair = Predicate::All(vec![
        Predicate::present(source(OBLIGATION, "QuestionNumber")),
        Predicate::empty(assumption),
    ]);

    SectionRule::new("Reporting obligation", RECORD_INFO)
        .item(field(OBLIGATION, "AIFMReportingObligationChangeFrequencyCode"))
        .item(field(OBLIGATION, "AIFMReportingObligationChangeContentsCode"))
        .item(
            field(OBLIGATION, "AIFMReportingObligationChangeQuarter")
                .when(Predicate::Any(vec![
                    Predicate::present(frequency),
                    Predicate::present(contents),
                ]))
                .required(),
        )
        .item(field(OBLIGATION, "LastReportingFlag").required().lower())
        .item(Check::Constrain {
            element: "AssumptionDescription",
            source: assumption,
            constraint: Constraint::MaxLength(300),
        })
        .item(
            field(OBLIGATION, "QuestionNumber")
                .when(assumption_pair.clone())
                .always(),
        )
        .item(
            field(OBLIGATION, "AssumptionDescription")
                .when(assumption_pair)
                .always(),
        )
}

fn identifier() -> SectionRule {
    let member_state = Predicate::present(source(IDENTIFIER, "ReportingMemberState"));
    let path = ["AIFMIdentifier"];

    SectionRule::new("Identifier", COMPLETE)
        .item(field(IDENTIFIER, "AIFMIdentifierLEI").at(&path))
        .item(field(IDENTIFIER, "AIFMIdentifierBIC").at(&path))
        .item(
            field(IDENTIFIER, "ReportingMemberState")
                .at(&path)
                .when(member_state.clone())
                .always(),
        )
        .item(
            field(IDENTIFIER, "AIFMNationalCode")
                .at(&path)
                .when(member_state)
                .always(),
        )
}

fn principal_markets() -> SectionRule {
    let code_type = Source::description();
    let market = ["MarketIdentification"];

    let group = GroupRule::new(
        MemberSelector::Ids(vec![
            ("1st", 1),
            ("2nd", 2),
            ("3rd", 3),
            ("4th", 4),
            ("5th", 5),
        ]),
        &["AIFMPrincipalMarkets"],
        "AIFMFivePrincipalMarket",
    )
    .item(FieldRule::rank())
    .item(
        FieldRule::member("MarketCodeType", Slot::Description)
            .at(&market)
            .required()
            .constraint(Constraint::OneOf(MARKET_CODE_TYPES)),
    )
    .item(
        FieldRule::member("MarketCode", Slot::Input(1))
            .at(&market)
            .when(Predicate::equals(code_type, "MIC"))
            .required()
            .constraint(Constraint::MaxLength(4)),
    )
    .item(
        FieldRule::member("AggregatedValueAmount", Slot::Input(2))
            .when(Predicate::equals(code_type, "NOT").negate())
            .required()
            .constraint(Constraint::UnsignedInteger),
    );

    SectionRule::new("Principal markets", COMPLETE).item(group)
}

fn principal_instruments() -> SectionRule {
    let group = GroupRule::new(
        MemberSelector::NumericIds { first: 1, last: 5 },
        &["AIFMPrincipalInstruments"],
        "AIFMPrincipalInstrument",
    )
    .item(Check::RequireAll {
        when: Predicate::Always,
        fields: vec![
            ("SubAssetType", Source::description()),
            ("AggregatedValueAmount", Source::input(1)),
        ],
    })
    .item(FieldRule::rank())
    .item(FieldRule::member("SubAssetType", Slot::Description).always())
    .item(
        FieldRule::member("AggregatedValueAmount", Slot::Input(1))
            .when(Predicate::equals(Source::description(), "NTA_NTA_NOTA").negate())
            .always()
            .constraint(Constraint::UnsignedInteger),
    );

    SectionRule::new("Principal instruments", COMPLETE).item(group)
}

fn assets_under_management() -> SectionRule {
    let currency = source(ASSETS, "BaseCurrency");
    let in_base = Predicate::All(vec![
        Predicate::present(source(ASSETS, "AUMAmountInBaseCurrency")),
        Predicate::present(currency),
    ]);
    let non_euro = Predicate::All(vec![
        in_base.clone(),
        Predicate::equals_ignore_case(currency, "EUR").negate(),
    ]);
    // Holds whenever a base currency is given; the OTH comparison never
    // decides the outcome on its own.
    let other_description = Predicate::All(vec![
        in_base.clone(),
        Predicate::Any(vec![
            Predicate::present(currency),
            Predicate::equals(source(ASSETS, "FXEUROtherReferenceRateDescription"), "OTH"),
        ]),
    ]);
    let description = ["AIFMBaseCurrencyDescription"];

    SectionRule::new("Assets under management", COMPLETE)
        .item(
            field(ASSETS, "AUMAmountInEuro")
                .required()
                .constraint(Constraint::UnsignedInteger),
        )
        .item(
            field(ASSETS, "BaseCurrency")
                .at(&description)
                .when(in_base.clone())
                .always()
                .upper(),
        )
        .item(
            field(ASSETS, "AUMAmountInBaseCurrency")
                .at(&description)
                .when(in_base)
                .always()
                .constraint(Constraint::UnsignedInteger),
        )
        .item(Check::RequireAll {
            when: non_euro.clone(),
            fields: vec![
                (
                    "FXEURReferenceRateType",
                    source(ASSETS, "FXEURReferenceRateType"),
                ),
                ("FXEURRate", source(ASSETS, "FXEURRate")),
            ],
        })
        .item(
            field(ASSETS, "FXEURReferenceRateType")
                .at(&description)
                .when(non_euro.clone())
                .always(),
        )
        .item(
            field(ASSETS, "FXEURRate")
                .at(&description)
                .when(non_euro)
                .always(),
        )
        .item(
            field(ASSETS, "FXEUROtherReferenceRateDescription")
                .at(&description)
                .when(other_description)
                .always(),
        )
}
