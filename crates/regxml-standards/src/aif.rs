//! AIFMD Annex IV fund-level record (`AIFMD_DATAIF_V1.2.xsd`).

use regxml_model::{
    Check, Constraint, FieldRule, Generated, GroupRule, MemberSelector, Predicate, RegistryBody,
    ReportType, RootAttribute, RootRule, RuleRegistry, SectionRule, Slot, Source, Sweep,
    TimestampFormat, Transform,
};

const RECORD: (u32, u32) = (4, 9);
const OBLIGATION: (u32, u32) = (10, 15);
const DETAILS: (u32, u32) = (16, 23);
const IDENTIFICATION: (u32, u32) = (24, 32);
const SHARE_CLASS: (u32, u32) = (33, 40);
const MASTER_FEEDER: (u32, u32) = (41, 44);
const PRIME_BROKERS: (u32, u32) = (45, 47);
const BASE_CURRENCY: (u32, u32) = (48, 53);
const JURISDICTION: (u32, u32) = (54, 57);
const STRATEGY: (u32, u32) = (58, 60);
const HFT: (u32, u32) = (62, 63);
const NAV_FOCUS: (u32, u32) = (78, 85);
const AUM_FOCUS: (u32, u32) = (86, 93);
const INVESTORS: (u32, u32) = (118, 120);

const RECORD_INFO: &[&str] = &["AIFRecordInfo"];
const PRINCIPAL_INFO: &[&str] = &[
    "AIFRecordInfo",
    "AIFCompleteDescription",
    "AIFPrincipalInfo",
];
const DESCRIPTION: &[&str] = &[
    "AIFRecordInfo",
    "AIFCompleteDescription",
    "AIFPrincipalInfo",
    "AIFDescription",
];
const CONCENTRATION: &[&str] = &[
    "AIFRecordInfo",
    "AIFCompleteDescription",
    "AIFPrincipalInfo",
    "MostImportantConcentration",
];

fn field(range: (u32, u32), tag: &'static str) -> FieldRule {
    FieldRule::tagged(range.0, range.1, tag)
}

fn source(range: (u32, u32), tag: &'static str) -> Source {
    Source::tagged(range.0, range.1, tag)
}

fn sweep(range: (u32, u32)) -> Sweep {
    Sweep::rows(range.0, range.1)
}

fn predominant_type() -> Source {
    source(JURISDICTION, "PredominantAIFType")
}

pub(crate) fn registry() -> RuleRegistry {
    RuleRegistry {
        report: ReportType::Aif,
        version: "1.2",
        schema: "AIFMD_DATAIF_V1.2.xsd",
        root: RootRule {
            element: "AIFReportingInfo",
            attributes: vec![
                RootAttribute::Fixed {
                    name: "xsi:noNamespaceSchemaLocation",
                    value: "AIFMD_DATAIF_V1.2.xsd",
                },
                RootAttribute::Generated {
                    name: "CreationDateAndTime",
                    value: Generated::Timestamp(TimestampFormat::FractionalZulu),
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
        body: RegistryBody::Sections(sections()),
    }
}

fn sections() -> Vec<SectionRule> {
    vec![
        SectionRule::new("Record info", RECORD_INFO).item(
            sweep(RECORD)
                .required()
                .transform("ReportingPeriodStartDate", Transform::DateOnly)
                .transform("ReportingPeriodEndDate", Transform::DateOnly),
        ),
        obligation(),
        SectionRule::new("Record details", RECORD_INFO).item(sweep(DETAILS).required()),
        SectionRule::new("Identification", PRINCIPAL_INFO)
            .item(Check::PairedPresence {
                first: (
                    "ReportingMemberState",
                    source(IDENTIFICATION, "ReportingMemberState"),
                ),
                second: ("AIFNationalCode", source(IDENTIFICATION, "AIFNationalCode")),
            })
            .item(sweep(IDENTIFICATION).at(&["AIFIdentification"])),
        share_class(),
        master_feeder(),
        // The prime broker block lists the fund identifiers whenever the
        // prime broker rows exist; their own values are not read.
        SectionRule::new("Prime brokers", DESCRIPTION).item(
            sweep(IDENTIFICATION)
                .at(&["PrimeBrokers", "PrimeBrokerIdentification"])
                .when(Predicate::rows_exist(PRIME_BROKERS.0, PRIME_BROKERS.1)),
        ),
        base_currency(),
        SectionRule::new("Jurisdiction", DESCRIPTION)
            .item(Check::RequireAll {
                when: Predicate::Always,
                fields: vec![("PredominantAIFType", predominant_type())],
            })
            .item(sweep(JURISDICTION)),
        investment_strategy(),
        SectionRule::new("High-frequency trading", DESCRIPTION).item(sweep(HFT)),
        main_instruments(),
        SectionRule::new("NAV geographical focus", PRINCIPAL_INFO)
            .item(sweep(NAV_FOCUS).at(&["NAVGeographicalFocus"]).required()),
        SectionRule::new("AUM geographical focus", PRINCIPAL_INFO)
            .item(sweep(AUM_FOCUS).at(&["AUMGeographicalFocus"]).always()),
        principal_exposures(),
        portfolio_concentrations(),
        SectionRule::new("Typical position size", CONCENTRATION).item(
            FieldRule::new("TypicalPositionSize", Source::id("113"))
                .when(Predicate::equals(predominant_type(), "PEQF"))
                .always(),
        ),
        principal_markets(),
        SectionRule::new("Investor concentration", CONCENTRATION)
            .item(sweep(INVESTORS).at(&["InvestorConcentration"]).required()),
    ]
}

fn obligation() -> SectionRule {
    let frequency = source(OBLIGATION, "AIFReportingObligationChangeFrequencyCode");
    let contents = source(OBLIGATION, "AIFReportingObligationChangeContentsCode");
    let question = source(OBLIGATION, "QuestionNumber");
    let assumption = source(OBLIGATION, "AssumptionDescription");
    // QuestionNumber and AssumptionDescription only appear when the
    // description is blank; the length limit applies regardless.
    let assumption_pair = Predicate::All(vec![
        Predicate::present(question),
        Predicate::empty(assumption),
    ]);

    SectionRule::new("Reporting obligation", RECORD_INFO)
        .item(field(OBLIGATION, "AIFReportingObligationChangeFrequencyCode"))
        .item(field(OBLIGATION, "AIFReportingObligationChangeContentsCode"))
        .item(
            field(OBLIGATION, "AIFReportingObligationChangeQuarter")
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

fn share_class() -> SectionRule {
    let flag = source(SHARE_CLASS, "ShareClassFlag");
    let declined = Predicate::equals_ignore_case(flag, "false");

    // The flag element carries text only when it declines share classes.
    // Otherwise every share class row, the flag included, gets its own
    // identifier.
    SectionRule::new("Share class", PRINCIPAL_INFO)
        .item(
            field(SHARE_CLASS, "ShareClassFlag")
                .when(declined.clone())
                .always(),
        )
        .item(
            field(SHARE_CLASS, "ShareClassFlag")
                .when(declined.clone().negate())
                .always()
                .blank(),
        )
        .item(Check::RequireAll {
            when: Predicate::equals_ignore_case(flag, "true"),
            fields: vec![("ShareClassName", source(SHARE_CLASS, "ShareClassName"))],
        })
        .item(
            sweep(SHARE_CLASS)
                .at(&["ShareClassIdentification"])
                .each_in("ShareClassIdentifier")
                .when(declined.negate()),
        )
}

fn master_feeder() -> SectionRule {
    let status = source(MASTER_FEEDER, "AIFMasterFeederStatus");
    let feeder = Predicate::equals_ignore_case(status, "FEEDER");
    let master = ["MasterAIFsIdentification", "MasterAIFIdentification"];
    let nca = [
        "MasterAIFsIdentification",
        "MasterAIFIdentification",
        "AIFIdentifierNCA",
    ];

    SectionRule::new("Master feeder", DESCRIPTION)
        .item(field(MASTER_FEEDER, "AIFMasterFeederStatus").always().upper())
        .item(Check::RequireAll {
            when: feeder.clone(),
            fields: vec![("AIFName", source(MASTER_FEEDER, "AIFName"))],
        })
        .item(Check::RequireAll {
            when: Predicate::All(vec![
                feeder.clone(),
                Predicate::present(source(MASTER_FEEDER, "ReportingMemberState")),
            ]),
            fields: vec![("AIFNationalCode", source(MASTER_FEEDER, "AIFNationalCode"))],
        })
        .item(
            field(MASTER_FEEDER, "AIFName")
                .at(&master)
                .when(feeder.clone())
                .required(),
        )
        .item(
            field(MASTER_FEEDER, "ReportingMemberState")
                .at(&nca)
                .when(feeder.clone()),
        )
        .item(field(MASTER_FEEDER, "AIFNationalCode").at(&nca).when(feeder))
}

fn base_currency() -> SectionRule {
    let currency = source(BASE_CURRENCY, "BaseCurrency");
    let rate_type = source(BASE_CURRENCY, "FXEURReferenceRateType");
    let non_euro = Predicate::equals_ignore_case(currency, "EUR").negate();
    let description = ["AIFBaseCurrencyDescription"];

    SectionRule::new("Base currency", DESCRIPTION)
        .item(Check::RequireAll {
            when: Predicate::All(vec![
                Predicate::present(currency),
                Predicate::present(source(BASE_CURRENCY, "AIFNetAssetValue")),
            ]),
            fields: vec![(
                "AUMAmountInBaseCurrency",
                source(BASE_CURRENCY, "AUMAmountInBaseCurrency"),
            )],
        })
        .item(
            field(BASE_CURRENCY, "BaseCurrency")
                .at(&description)
                .always()
                .upper(),
        )
        .item(
            field(BASE_CURRENCY, "AUMAmountInBaseCurrency")
                .at(&description)
                .always(),
        )
        .item(Check::RequireAll {
            when: non_euro.clone(),
            fields: vec![
                ("FXEURReferenceRateType", rate_type),
                ("FXEURRate", source(BASE_CURRENCY, "FXEURRate")),
            ],
        })
        .item(
            field(BASE_CURRENCY, "FXEURReferenceRateType")
                .at(&description)
                .when(non_euro.clone())
                .always()
                .upper(),
        )
        .item(
            field(BASE_CURRENCY, "FXEURRate")
                .at(&description)
                .when(non_euro)
                .always(),
        )
        .item(
            field(BASE_CURRENCY, "FXEUROtherReferenceRateDescription")
                .at(&description)
                .when(Predicate::equals_ignore_case(rate_type, "OTH"))
                .required(),
        )
        .item(field(BASE_CURRENCY, "AIFNetAssetValue").always())
}

fn investment_strategy() -> SectionRule {
    let hedge_fund = Predicate::equals(predominant_type(), "HFND");
    let private_equity = Predicate::equals(predominant_type(), "PEQF");

    SectionRule::new("Investment strategy", DESCRIPTION)
        .item(Check::Unsupported {
            when: Predicate::All(vec![
                hedge_fund.clone().negate(),
                private_equity.clone().negate(),
            ]),
            element: "PredominantAIFType",
            source: predominant_type(),
        })
        .item(
            sweep(STRATEGY)
                .at(&[
                    "HedgeFundInvestmentStrategies",
                    "HedgeFundInvestmentStrategy",
                ])
                .when(hedge_fund)
                .always(),
        )
        .item(
            sweep(STRATEGY)
                .at(&[
                    "PrivateEquityFundInvestmentStrategies",
                    "PrivateEquityFundInvestmentStrategy",
                ])
                .when(private_equity)
                .required(),
        )
}

fn main_instruments() -> SectionRule {
    let traded = Predicate::equals(Source::description(), "NTA_NTA_NOTA").negate();
    let code_type = Source::input(1);
    let aii = Predicate::equals(code_type, "AII");
    let aii_path = ["AIIInstrumentIdentification"];

    let group = GroupRule::new(
        MemberSelector::Tags {
            prefix: "m",
            first: 1,
            last: 5,
        },
        &["MainInstrumentsTraded"],
        "MainInstrumentTraded",
    )
    .item(FieldRule::rank())
    .item(FieldRule::member("SubAssetType", Slot::Description).always())
    .item(
        FieldRule::member("InstrumentCodeType", Slot::Input(1))
            .when(traded.clone())
            .required(),
    )
    .item(
        FieldRule::member("InstrumentName", Slot::Input(2))
            .when(traded.clone())
            .required(),
    )
    .item(
        FieldRule::member("ISINInstrumentIdentification", Slot::Input(3))
            .when(Predicate::equals(code_type, "ISIN"))
            .required(),
    )
    .item(
        FieldRule::member("AIIExchangeCode", Slot::Input(4))
            .at(&aii_path)
            .when(aii.clone())
            .required(),
    )
    .item(
        FieldRule::member("AIIDerivativeType", Slot::Input(5))
            .at(&aii_path)
            .when(aii.clone())
            .required(),
    )
    .item(
        FieldRule::member("AIIPutCallIdentifier", Slot::Input(6))
            .at(&aii_path)
            .when(aii.clone())
            .required(),
    )
    .item(
        FieldRule::member("AIIExpiryDate", Slot::Input(7))
            .at(&aii_path)
            .when(aii.clone())
            .required(),
    )
    .item(
        FieldRule::member("AIIStrikePrice", Slot::Input(8))
            .at(&aii_path)
            .when(aii)
            .required(),
    )
    .item(
        FieldRule::member("PositionValue", Slot::Input(11))
            .when(traded.clone())
            .always(),
    )
    .item(
        FieldRule::member("PositionType", Slot::Input(10))
            .when(traded)
            .always()
            .upper(),
    )
    .item(
        FieldRule::member("ShortPositionHedgingRate", Slot::Input(12))
            .when(Predicate::equals_ignore_case(Source::input(10), "S"))
            .always(),
    );

    SectionRule::new("Main instruments traded", PRINCIPAL_INFO).item(group)
}

fn principal_exposures() -> SectionRule {
    let exposed = Predicate::equals(Source::description(), "NTA").negate();
    let counterparty = ["CounterpartyIdentification"];

    let group = GroupRule::new(
        MemberSelector::Tags {
            prefix: "p",
            first: 1,
            last: 10,
        },
        &["PrincipalExposures"],
        "PrincipalExposure",
    )
    .item(FieldRule::rank())
    .item(FieldRule::member("AssetMacroType", Slot::Description).always())
    .item(
        FieldRule::member("SubAssetType", Slot::Input(1))
            .when(exposed.clone())
            .always(),
    )
    .item(
        FieldRule::member("PositionType", Slot::Input(2))
            .when(exposed.clone())
            .always(),
    )
    .item(
        FieldRule::member("AggregatedValueAmount", Slot::Input(3))
            .when(exposed.clone())
            .always(),
    )
    .item(
        FieldRule::member("AggregatedValueRate", Slot::Input(4))
            .when(exposed.clone())
            .always(),
    )
    .item(
        FieldRule::member("EntityName", Slot::Input(5))
            .at(&counterparty)
            .when(exposed.clone()),
    )
    .item(
        FieldRule::member("EntityIdentificationBIC", Slot::Input(7))
            .at(&counterparty)
            .when(exposed.clone()),
    )
    .item(
        FieldRule::member("EntityIdentificationLEI", Slot::Input(6))
            .at(&counterparty)
            .when(exposed),
    );

    SectionRule::new("Principal exposures", PRINCIPAL_INFO).item(group)
}

fn portfolio_concentrations() -> SectionRule {
    let concentrated = Predicate::equals(Source::description(), "NTA_NTA").negate();
    let market_type = Source::input(2);
    let market = ["MarketIdentification"];
    let counterparty = ["CounterpartyIdentification"];

    let group = GroupRule::new(
        MemberSelector::Tags {
            prefix: "q",
            first: 1,
            last: 5,
        },
        &["PortfolioConcentrations"],
        "PortfolioConcentration",
    )
    .item(FieldRule::rank())
    .item(FieldRule::member("AssetType", Slot::Description).always())
    .item(
        FieldRule::member("PositionType", Slot::Input(1))
            .when(concentrated.clone())
            .always(),
    )
    .item(
        FieldRule::member("MarketCodeType", Slot::Input(2))
            .at(&market)
            .when(concentrated)
            .always(),
    )
    .item(
        FieldRule::member("MarketCode", Slot::Input(3))
            .at(&market)
            .when(Predicate::equals(market_type, "MIC"))
            .always(),
    )
    .item(FieldRule::member("AggregatedValueAmount", Slot::Input(4)).always())
    .item(FieldRule::member("AggregatedValueRate", Slot::Input(5)).always())
    .item(
        FieldRule::member("EntityName", Slot::Input(6))
            .at(&counterparty)
            .when(Predicate::equals(market_type, "OTC")),
    )
    .item(FieldRule::member("EntityIdentificationBIC", Slot::Input(8)).at(&counterparty))
    .item(FieldRule::member("EntityIdentificationLEI", Slot::Input(7)).at(&counterparty));

    SectionRule::new("Portfolio concentrations", CONCENTRATION).item(group)
}

fn principal_markets() -> SectionRule {
    let code_type = Source::description();
    let market = ["MarketIdentification"];

    let group = GroupRule::new(
        MemberSelector::Tags {
            prefix: "r",
            first: 1,
            last: 3,
        },
        &["AIFPrincipalMarkets"],
        "AIFPrincipalMarket",
    )
    .item(FieldRule::rank())
    .item(
        FieldRule::member("MarketCodeType", Slot::Description)
            .at(&market)
            .required()
            .upper(),
    )
    .item(
        FieldRule::member("MarketCode", Slot::Input(1))
            .at(&market)
            .when(Predicate::equals_ignore_case(code_type, "MIC"))
            .required(),
    )
    .item(
        FieldRule::member("AggregatedValueAmount", Slot::Input(2))
            .when(Predicate::equals_ignore_case(code_type, "NOT").negate())
            .required(),
    );

    SectionRule::new("Principal markets", CONCENTRATION).item(group)
}
