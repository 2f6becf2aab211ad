use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use regxml_core::{build_at, build_forms_at, build_input_at, is_unsigned_integer};
use regxml_model::{
    BuildError, CellValue, DocumentNode, ErrorKind, FieldRow, FieldTable, FormRow, FormSheet,
    FormWorkbook, IdKind, ReportInput, ReportType,
};
use regxml_standards::registry;

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(10, 11, 12))
        .expect("valid timestamp")
}

fn row(tag: &str, id: &str, value: &str) -> FieldRow {
    FieldRow::new(tag, id).with_input(1, value)
}

fn header() -> Vec<FieldRow> {
    vec![
        row("ReportingMemberState", "1", "NL"),
        row("Version", "2", "1.2"),
    ]
}

fn aifm_rows() -> Vec<FieldRow> {
    let mut rows = header();
    rows.extend([
        row("AIFMReportingCode", "4", "3"),
        row("ReportingPeriodStartDate", "5", "2024-01-01 00:00:00"),
        row("LastReportingFlag", "13", "False"),
        row("AIFMIdentifierLEI", "22", "LEI123"),
        FieldRow::new("AIFMFivePrincipalMarket", "1st")
            .with_description("MIC")
            .with_input(1, "XAMS")
            .with_input(2, "500"),
        FieldRow::new("AIFMFivePrincipalMarket", "2nd").with_description("NOT"),
        row("AUMAmountInEuro", "33", "1000"),
    ]);
    rows
}

fn aif_rows(currency: &[FieldRow]) -> Vec<FieldRow> {
    let mut rows = header();
    rows.push(row("LastReportingFlag", "13", "TRUE"));
    rows.extend(currency.iter().cloned());
    rows.push(row("PredominantAIFType", "55", "HFND"));
    rows
}

fn outline(node: &DocumentNode, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match &node.text {
        Some(text) => out.push(format!("{indent}{} = {text}", node.name)),
        None => out.push(format!("{indent}{}", node.name)),
    }
    for child in &node.children {
        outline(child, depth + 1, out);
    }
}

fn expect_error(result: regxml_model::Result<DocumentNode>) -> BuildError {
    match result {
        Ok(tree) => panic!("expected a build error, got {} nodes", tree.node_count()),
        Err(err) => err,
    }
}

#[test]
fn aifm_document_outline() {
    let table = FieldTable::new(aifm_rows());
    let tree = build_at(&table, registry(ReportType::Aifm), at(2024, 5, 17)).expect("valid input");

    let mut lines = Vec::new();
    outline(&tree, 0, &mut lines);
    insta::assert_snapshot!(lines.join("\n"), @r"
    AIFMReportingInfo
      AIFMRecordInfo
        AIFMReportingCode = 3
        ReportingPeriodStartDate = 2024-01-01
        LastReportingFlag = false
        AIFMCompleteDescription
          AIFMIdentifier
            AIFMIdentifierLEI = LEI123
          AIFMPrincipalMarkets
            AIFMFivePrincipalMarket
              Ranking = 1
              MarketIdentification
                MarketCodeType = MIC
                MarketCode = XAMS
              AggregatedValueAmount = 500
            AIFMFivePrincipalMarket
              Ranking = 2
              MarketIdentification
                MarketCodeType = NOT
          AUMAmountInEuro = 1000
    ");
}

#[test]
fn aifm_root_attributes() {
    let table = FieldTable::new(aifm_rows());
    let tree = build_at(&table, registry(ReportType::Aifm), at(2024, 5, 17)).expect("valid input");

    assert_eq!(tree.attribute("CreationDateAndTime"), Some("2024-05-17T10:11:12"));
    assert_eq!(tree.attribute("ReportingMemberState"), Some("NL"));
    assert_eq!(tree.attribute("Version"), Some("1.2"));
    assert_eq!(
        tree.attribute("xsi:noNamespaceSchemaLocation"),
        Some("AIFMD_DATMAN_V1.2.xsd")
    );
}

#[test]
fn aif_timestamp_has_fraction_and_zone() {
    let table = FieldTable::new(aif_rows(&[row("BaseCurrency", "48", "EUR")]));
    let tree = build_at(&table, registry(ReportType::Aif), at(2024, 5, 17)).expect("valid input");

    assert_eq!(
        tree.attribute("CreationDateAndTime"),
        Some("2024-05-17T10:11:12.0Z")
    );
    let description = [
        "AIFRecordInfo",
        "AIFCompleteDescription",
        "AIFPrincipalInfo",
        "AIFDescription",
        "AIFBaseCurrencyDescription",
    ];
    let base = tree.path(&description).expect("base currency block");
    assert_eq!(base.text_at(&["BaseCurrency"]), Some("EUR"));
    assert!(base.child("FXEURRate").is_none());
}

#[test]
fn foreign_currency_requires_rate_type() {
    let table = FieldTable::new(aif_rows(&[
        row("BaseCurrency", "48", "USD"),
        row("FXEURRate", "51", "1.08"),
    ]));
    let err = expect_error(build_at(&table, registry(ReportType::Aif), at(2024, 5, 17)));

    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.tag(), Some("FXEURReferenceRateType"));
    let location = err.location().expect("located error");
    assert_eq!(location.section, "Base currency");
    assert_eq!(location.report, ReportType::Aif);
}

#[test]
fn other_rate_type_requires_description() {
    let table = FieldTable::new(aif_rows(&[
        row("BaseCurrency", "48", "usd"),
        row("FXEURReferenceRateType", "50", "OTH"),
        row("FXEURRate", "51", "1.08"),
    ]));
    let err = expect_error(build_at(&table, registry(ReportType::Aif), at(2024, 5, 17)));

    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.tag(), Some("FXEUROtherReferenceRateDescription"));
}

#[test]
fn market_code_type_outside_domain() {
    let mut rows = aifm_rows();
    rows.push(FieldRow::new("AIFMFivePrincipalMarket", "3rd").with_description("ABC"));
    let err = expect_error(build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aifm),
        at(2024, 5, 17),
    ));

    match err {
        BuildError::DomainValueViolation { at, value, allowed } => {
            assert_eq!(at.tag, "MarketCodeType");
            assert_eq!(value, "ABC");
            assert_eq!(allowed, vec!["MIC", "XXX", "OTC", "NOT"]);
        }
        other => panic!("expected a domain violation, got {other:?}"),
    }
}

#[test]
fn assumption_description_length_limit() {
    let build = |len: usize| {
        let mut rows = aifm_rows();
        rows.push(row("AssumptionDescription", "15", &"a".repeat(len)));
        build_at(
            &FieldTable::new(rows),
            registry(ReportType::Aifm),
            at(2024, 5, 17),
        )
    };

    assert!(build(300).is_ok());
    let err = expect_error(build(301));
    assert!(matches!(
        err,
        BuildError::LengthExceeded {
            max: 300,
            actual: 301,
            ..
        }
    ));
}

#[test]
fn group_members_follow_rank_order() {
    let mut rows = aifm_rows();
    rows.retain(|row| row.tag != "AIFMFivePrincipalMarket");
    for id in ["3rd", "1st", "5th", "2nd", "4th"] {
        rows.push(FieldRow::new("AIFMFivePrincipalMarket", id).with_description("NOT"));
    }
    let tree = build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aifm),
        at(2024, 5, 17),
    )
    .expect("valid input");

    let markets = tree
        .path(&[
            "AIFMRecordInfo",
            "AIFMCompleteDescription",
            "AIFMPrincipalMarkets",
        ])
        .expect("markets block");
    let ranks: Vec<&str> = markets
        .children_named("AIFMFivePrincipalMarket")
        .filter_map(|market| market.text_at(&["Ranking"]))
        .collect();
    assert_eq!(ranks, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn tagged_group_ranks_come_from_the_id_column() {
    let mut rows = aif_rows(&[row("BaseCurrency", "48", "EUR")]);
    for (tag, id) in [("m1", "3"), ("m2", "1"), ("m3", "2")] {
        rows.push(
            FieldRow::new(tag, id)
                .with_id_kind(IdKind::Number)
                .with_description("NTA_NTA_NOTA"),
        );
    }
    let tree = build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aif),
        at(2024, 5, 17),
    )
    .expect("valid input");

    let traded = tree
        .path(&[
            "AIFRecordInfo",
            "AIFCompleteDescription",
            "AIFPrincipalInfo",
            "MainInstrumentsTraded",
        ])
        .expect("instruments block");
    let ranks: Vec<&str> = traded
        .children
        .iter()
        .filter_map(|instrument| instrument.text_at(&["Ranking"]))
        .collect();
    assert_eq!(ranks, vec!["1", "2", "3"]);
}

#[test]
fn unsigned_amount_rejects_negative_values() {
    let mut rows = aifm_rows();
    rows.retain(|row| row.tag != "AUMAmountInEuro");
    rows.push(row("AUMAmountInEuro", "33", "-5"));
    let err = expect_error(build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aifm),
        at(2024, 5, 17),
    ));
    assert_eq!(err.kind(), ErrorKind::NotAnUnsignedInteger);
    assert_eq!(err.tag(), Some("AUMAmountInEuro"));
}

#[test]
fn missing_required_field_yields_no_tree() {
    let mut rows = aifm_rows();
    rows.retain(|row| row.tag != "AUMAmountInEuro");
    let err = expect_error(build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aifm),
        at(2024, 5, 17),
    ));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    let location = err.location().expect("located error");
    assert_eq!(location.tag, "AUMAmountInEuro");
    assert_eq!(location.section, "Assets under management");
}

#[test]
fn unsupported_fund_type() {
    let mut rows = aif_rows(&[row("BaseCurrency", "48", "EUR")]);
    rows.retain(|row| row.tag != "PredominantAIFType");
    rows.push(row("PredominantAIFType", "55", "REST"));
    let err = expect_error(build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aif),
        at(2024, 5, 17),
    ));
    match err {
        BuildError::UnsupportedReportSubtype { at, value } => {
            assert_eq!(at.tag, "PredominantAIFType");
            assert_eq!(value, "REST");
        }
        other => panic!("expected an unsupported subtype, got {other:?}"),
    }
}

#[test]
fn rebuilding_is_idempotent_apart_from_the_timestamp() {
    let table = FieldTable::new(aifm_rows());
    let aifm = registry(ReportType::Aifm);

    let first = build_at(&table, aifm, at(2024, 5, 17)).expect("valid input");
    let again = build_at(&table, aifm, at(2024, 5, 17)).expect("valid input");
    assert_eq!(first, again);

    let mut early = first;
    let mut late = build_at(&table, aifm, at(2025, 2, 1)).expect("valid input");
    assert_ne!(early, late);
    early.remove_attribute("CreationDateAndTime");
    late.remove_attribute("CreationDateAndTime");
    assert_eq!(early, late);
}

#[test]
fn input_shape_must_match_registry() {
    let table = ReportInput::Fields(FieldTable::new(aifm_rows()));
    let err = expect_error(build_input_at(&table, registry(ReportType::Ofk), at(2024, 5, 17)));
    assert_eq!(err.kind(), ErrorKind::InputMismatch);

    let forms = ReportInput::Forms(FormWorkbook::default());
    let err = expect_error(build_input_at(&forms, registry(ReportType::Aif), at(2024, 5, 17)));
    assert_eq!(err.kind(), ErrorKind::InputMismatch);
}

const PRINCIPAL: &[&str] = &[
    "AIFRecordInfo",
    "AIFCompleteDescription",
    "AIFPrincipalInfo",
];

fn build_aif(rows: Vec<FieldRow>) -> regxml_model::Result<DocumentNode> {
    build_at(
        &FieldTable::new(rows),
        registry(ReportType::Aif),
        at(2024, 5, 17),
    )
}

fn aif_with(extra: &[FieldRow]) -> Vec<FieldRow> {
    let mut rows = aif_rows(&[row("BaseCurrency", "48", "EUR")]);
    rows.extend(extra.iter().cloned());
    rows
}

fn private_equity(extra: &[FieldRow]) -> Vec<FieldRow> {
    let mut rows = aif_with(extra);
    rows.retain(|row| row.tag != "PredominantAIFType");
    rows.push(row("PredominantAIFType", "55", "PEQF"));
    rows
}

fn principal(tree: &DocumentNode) -> &DocumentNode {
    tree.path(PRINCIPAL).expect("principal info block")
}

fn description(tree: &DocumentNode) -> &DocumentNode {
    principal(tree)
        .child("AIFDescription")
        .expect("description block")
}

fn instrument(tag: &str, rank: &str, sub_asset: &str) -> FieldRow {
    FieldRow::new(tag, rank)
        .with_id_kind(IdKind::Number)
        .with_description(sub_asset)
}

fn first_instrument(tree: &DocumentNode) -> &DocumentNode {
    principal(tree)
        .path(&["MainInstrumentsTraded", "MainInstrumentTraded"])
        .expect("instrument block")
}

#[test]
fn identification_codes_come_in_pairs() {
    let rows = aif_with(&[row("ReportingMemberState", "24", "NL")]);
    let err = expect_error(build_aif(rows));
    match err {
        BuildError::ConditionalFieldViolation { at, counterpart } => {
            assert_eq!(at.tag, "AIFNationalCode");
            assert_eq!(at.section, "Identification");
            assert_eq!(counterpart, "ReportingMemberState");
        }
        other => panic!("expected a conditional field violation, got {other:?}"),
    }

    let err = expect_error(build_aif(aif_with(&[row("AIFNationalCode", "25", "F001")])));
    assert_eq!(err.kind(), ErrorKind::ConditionalFieldViolation);
    assert_eq!(err.tag(), Some("ReportingMemberState"));

    let tree = build_aif(aif_with(&[
        row("ReportingMemberState", "24", "NL"),
        row("AIFNationalCode", "25", "F001"),
    ]))
    .expect("valid input");
    let identification = principal(&tree)
        .child("AIFIdentification")
        .expect("identification block");
    assert_eq!(identification.text_at(&["ReportingMemberState"]), Some("NL"));
    assert_eq!(identification.text_at(&["AIFNationalCode"]), Some("F001"));
}

#[test]
fn share_class_rows_each_get_an_identifier() {
    let tree = build_aif(aif_with(&[
        row("ShareClassFlag", "33", "true"),
        row("ShareClassNationalCode", "34", "NC1"),
        row("ShareClassIdentifierISIN", "35", "NL0000000002"),
        row("ShareClassIdentifierCUSIP", "36", ""),
        row("ShareClassName", "37", "Class A"),
    ]))
    .expect("valid input");

    let info = principal(&tree);
    assert_eq!(info.text_at(&["ShareClassFlag"]), Some(""));

    let identification = info
        .child("ShareClassIdentification")
        .expect("share class block");
    let identifiers: Vec<&DocumentNode> =
        identification.children_named("ShareClassIdentifier").collect();
    assert_eq!(identifiers.len(), 5);

    let filled: Vec<(&str, Option<&str>)> = identifiers
        .iter()
        .flat_map(|identifier| identifier.children.iter())
        .map(|child| (child.name.as_str(), child.text.as_deref()))
        .collect();
    assert_eq!(
        filled,
        vec![
            ("ShareClassFlag", Some("true")),
            ("ShareClassNationalCode", Some("NC1")),
            ("ShareClassIdentifierISIN", Some("NL0000000002")),
            ("ShareClassName", Some("Class A")),
        ]
    );
    assert!(identifiers[3].children.is_empty());
}

#[test]
fn share_classes_require_a_name() {
    let err = expect_error(build_aif(aif_with(&[
        row("ShareClassFlag", "33", "TRUE"),
        row("ShareClassNationalCode", "34", "NC1"),
    ])));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.tag(), Some("ShareClassName"));
}

#[test]
fn declined_share_classes_keep_the_flag_only() {
    let tree = build_aif(aif_with(&[
        row("ShareClassFlag", "33", "False"),
        row("ShareClassNationalCode", "34", "NC1"),
    ]))
    .expect("valid input");

    let info = principal(&tree);
    assert_eq!(info.text_at(&["ShareClassFlag"]), Some("False"));
    assert_eq!(info.children_named("ShareClassFlag").count(), 1);
    assert!(info.child("ShareClassIdentification").is_none());
}

#[test]
fn prime_broker_block_lists_the_fund_identifiers() {
    let identification = [
        row("ReportingMemberState", "24", "NL"),
        row("AIFNationalCode", "25", "F001"),
        row("AIFIdentifierLEI", "26", "LEI999"),
    ];

    let without = build_aif(aif_with(&identification)).expect("valid input");
    assert!(description(&without).child("PrimeBrokers").is_none());

    let mut rows = aif_with(&identification);
    rows.push(row("PrimeBrokerName", "45", "Broker & Co"));
    let with = build_aif(rows).expect("valid input");
    let broker = description(&with)
        .path(&["PrimeBrokers", "PrimeBrokerIdentification"])
        .expect("prime broker block");
    let copied: Vec<(&str, Option<&str>)> = broker
        .children
        .iter()
        .map(|child| (child.name.as_str(), child.text.as_deref()))
        .collect();
    assert_eq!(
        copied,
        vec![
            ("ReportingMemberState", Some("NL")),
            ("AIFNationalCode", Some("F001")),
            ("AIFIdentifierLEI", Some("LEI999")),
        ]
    );
}

#[test]
fn feeder_fund_requires_master_name() {
    let rows = aif_with(&[row("AIFMasterFeederStatus", "41", "feeder")]);
    let err = expect_error(build_aif(rows));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.tag(), Some("AIFName"));
    assert_eq!(err.location().map(|at| at.section.as_str()), Some("Master feeder"));

    let tree = build_aif(aif_with(&[
        row("AIFMasterFeederStatus", "41", "feeder"),
        row("AIFName", "42", "Master Fund"),
    ]))
    .expect("valid input");
    let block = description(&tree);
    assert_eq!(block.text_at(&["AIFMasterFeederStatus"]), Some("FEEDER"));
    assert_eq!(
        block.text_at(&["MasterAIFsIdentification", "MasterAIFIdentification", "AIFName"]),
        Some("Master Fund")
    );
}

#[test]
fn master_fund_needs_no_master_name() {
    let tree = build_aif(aif_with(&[row("AIFMasterFeederStatus", "41", "master")]))
        .expect("valid input");
    let block = description(&tree);
    assert_eq!(block.text_at(&["AIFMasterFeederStatus"]), Some("MASTER"));
    assert!(block.child("MasterAIFsIdentification").is_none());
}

#[test]
fn traded_instrument_requires_code_type() {
    let rows = aif_with(&[instrument("m1", "1", "SEC_LEQ_IFIN")]);
    let err = expect_error(build_aif(rows));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.tag(), Some("InstrumentCodeType"));
    assert_eq!(
        err.location().map(|at| at.section.as_str()),
        Some("Main instruments traded")
    );

    let tree = build_aif(aif_with(&[instrument("m1", "1", "NTA_NTA_NOTA")]))
        .expect("valid input");
    let untraded = first_instrument(&tree);
    assert_eq!(untraded.text_at(&["SubAssetType"]), Some("NTA_NTA_NOTA"));
    for absent in ["InstrumentCodeType", "InstrumentName", "PositionType"] {
        assert!(untraded.child(absent).is_none(), "{absent} emitted");
    }
}

#[test]
fn isin_instrument_carries_isin_only() {
    let tree = build_aif(aif_with(&[instrument("m1", "1", "SEC_LEQ_IFIN")
        .with_input(1, "ISIN")
        .with_input(2, "Acme Holding")
        .with_input(3, "NL0000000001")
        .with_input(7, "2024-12-20")
        .with_input(10, "l")
        .with_input(11, "250")]))
    .expect("valid input");

    let traded = first_instrument(&tree);
    assert_eq!(traded.text_at(&["InstrumentCodeType"]), Some("ISIN"));
    assert_eq!(
        traded.text_at(&["ISINInstrumentIdentification"]),
        Some("NL0000000001")
    );
    assert!(traded.child("AIIInstrumentIdentification").is_none());
    assert_eq!(traded.text_at(&["PositionType"]), Some("L"));
    assert!(traded.child("ShortPositionHedgingRate").is_none());

    let err = expect_error(build_aif(aif_with(&[instrument("m1", "1", "SEC_LEQ_IFIN")
        .with_input(1, "ISIN")
        .with_input(2, "Acme Holding")])));
    assert_eq!(err.tag(), Some("ISINInstrumentIdentification"));
}

#[test]
fn aii_instrument_carries_exchange_details() {
    let tree = build_aif(aif_with(&[instrument("m1", "1", "DER_EQD_OPTN")
        .with_input(1, "AII")
        .with_input(2, "Index option")
        .with_input(3, "NL0000000001")
        .with_input(4, "XEUR")
        .with_input(5, "O")
        .with_input(6, "C")
        .with_input(7, "2024-12-20")
        .with_input(8, "100")
        .with_input(10, "S")
        .with_input(11, "50")
        .with_input(12, "0.5")]))
    .expect("valid input");

    let traded = first_instrument(&tree);
    assert!(traded.child("ISINInstrumentIdentification").is_none());
    let aii = traded
        .child("AIIInstrumentIdentification")
        .expect("AII block");
    let names: Vec<&str> = aii.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "AIIExchangeCode",
            "AIIDerivativeType",
            "AIIPutCallIdentifier",
            "AIIExpiryDate",
            "AIIStrikePrice",
        ]
    );
    assert_eq!(aii.text_at(&["AIIExpiryDate"]), Some("2024-12-20"));
    assert_eq!(aii.text_at(&["AIIStrikePrice"]), Some("100"));
    assert_eq!(traded.text_at(&["ShortPositionHedgingRate"]), Some("0.5"));

    let err = expect_error(build_aif(aif_with(&[instrument("m1", "1", "DER_EQD_OPTN")
        .with_input(1, "AII")
        .with_input(2, "Index option")
        .with_input(4, "XEUR")
        .with_input(5, "O")
        .with_input(6, "C")
        .with_input(7, "2024-12-20")])));
    assert_eq!(err.tag(), Some("AIIStrikePrice"));
}

#[test]
fn private_equity_strategy_and_position_size() {
    let tree = build_aif(private_equity(&[
        row("PrivateEquityFundStrategyType", "58", "VENT_CAPL"),
        row("PrimaryStrategyFlag", "59", "true"),
        row("TypicalPositionSize", "113", "MEDIUM"),
    ]))
    .expect("valid input");

    let block = description(&tree);
    assert!(block.child("HedgeFundInvestmentStrategies").is_none());
    let strategy = block
        .path(&[
            "PrivateEquityFundInvestmentStrategies",
            "PrivateEquityFundInvestmentStrategy",
        ])
        .expect("strategy block");
    assert_eq!(
        strategy.text_at(&["PrivateEquityFundStrategyType"]),
        Some("VENT_CAPL")
    );
    assert_eq!(strategy.text_at(&["PrimaryStrategyFlag"]), Some("true"));
    assert_eq!(
        principal(&tree).text_at(&["MostImportantConcentration", "TypicalPositionSize"]),
        Some("MEDIUM")
    );

    let hedge = build_aif(aif_with(&[row("TypicalPositionSize", "113", "MEDIUM")]))
        .expect("valid input");
    assert!(
        principal(&hedge)
            .path(&["MostImportantConcentration", "TypicalPositionSize"])
            .is_none()
    );
}

#[test]
fn private_equity_strategy_rows_must_be_filled() {
    let err = expect_error(build_aif(private_equity(&[
        row("PrivateEquityFundStrategyType", "58", "VENT_CAPL"),
        row("StrategyNAVRate", "60", ""),
    ])));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
    assert_eq!(err.tag(), Some("StrategyNAVRate"));
    assert_eq!(
        err.location().map(|at| at.section.as_str()),
        Some("Investment strategy")
    );
}

fn wvu_sheet(amount: CellValue) -> FormSheet {
    FormSheet::new("WVU-L", "WVU")
        .with_columns(["Regel", "Omschrijving", "Bedrag"])
        .with_row(FormRow::new(
            "r1",
            vec![CellValue::Empty, "Belastinglatentie".into(), amount],
        ))
}

#[test]
fn ofk_header_names_the_previous_month() {
    let workbook = FormWorkbook::default();
    let tree = build_forms_at(&workbook, registry(ReportType::Ofk), at(2021, 1, 5))
        .expect("empty workbook");

    assert_eq!(tree.name, "OFK-K");
    assert_eq!(tree.attribute("xmlns"), Some("bb.dnb.nl"));
    assert_eq!(
        tree.attribute("xsi:schemaLocation"),
        Some("bb.dnb.nl OFK-K.2020-12.xsd")
    );
    assert_eq!(tree.text_at(&["rappOpmerkingen"]), Some("OFK 2020-12"));
}

#[test]
fn ofk_sheet_without_control_tag_is_unsupported() {
    let workbook = FormWorkbook::new(vec![FormSheet::new("XX-Y", "XX")]);
    let err = expect_error(build_forms_at(
        &workbook,
        registry(ReportType::Ofk),
        at(2021, 1, 5),
    ));
    assert_eq!(err.kind(), ErrorKind::UnsupportedReportSubtype);
}

#[test]
fn ofk_rows_become_control_tag_records() {
    let workbook = FormWorkbook::new(vec![wvu_sheet(CellValue::Int(12))]);
    let tree = build_forms_at(&workbook, registry(ReportType::Ofk), at(2021, 1, 5))
        .expect("valid workbook");
    assert_eq!(
        tree.text_at(&["WVU", "WVU-L", "LatenUitz", "Regel"]),
        Some("r1")
    );
    assert_eq!(
        tree.text_at(&["WVU", "WVU-L", "LatenUitz", "Bedrag"]),
        Some("12")
    );
}

#[test]
fn ofk_negative_amount_is_rejected() {
    let workbook = FormWorkbook::new(vec![wvu_sheet(CellValue::Int(-3))]);
    let err = expect_error(build_forms_at(
        &workbook,
        registry(ReportType::Ofk),
        at(2021, 1, 5),
    ));
    assert_eq!(err.kind(), ErrorKind::NotAnUnsignedInteger);
    let location = err.location().expect("located error");
    assert_eq!(location.section, "WVU-L");
    assert_eq!(location.tag, "Bedrag");
}

#[test]
fn ofk_text_amount_is_not_an_integer() {
    let workbook = FormWorkbook::new(vec![wvu_sheet("twaalf".into())]);
    let err = expect_error(build_forms_at(
        &workbook,
        registry(ReportType::Ofk),
        at(2021, 1, 5),
    ));
    assert_eq!(err.kind(), ErrorKind::NotAnInteger);
}

proptest! {
    #[test]
    fn digit_strings_are_unsigned(value in "[0-9]{1,18}") {
        prop_assert!(is_unsigned_integer(&value));
    }

    #[test]
    fn signed_or_fractional_values_are_rejected(n in 1u32..1_000_000, frac in 1u32..100) {
        let negative = format!("-{n}");
        let fractional = format!("{n}.{frac}");
        prop_assert!(!is_unsigned_integer(&negative));
        prop_assert!(!is_unsigned_integer(&fractional));
    }
}
