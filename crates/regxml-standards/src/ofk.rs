//! DNB OFK-K balance and flow report: one sheet per subform.

use regxml_model::{
    BlockedColumns, ColumnChecks, ColumnSlice, FormRules, Generated, RegistryBody, ReportType,
    RootAttribute, RootRule, RuleRegistry,
};

const fn s(start: isize, end: isize) -> ColumnSlice {
    ColumnSlice::range(start, end)
}

const fn tail(start: isize) -> ColumnSlice {
    ColumnSlice::from(start)
}

/// Sheet name to the control tag wrapping each data row.
pub const CONTROL_TAGS: &[(&str, &str)] = &[
    ("AD-A", "AlgDeeln"),
    ("AD-C", "DeelnAct"),
    ("ADO-C", "OnrGoed"),
    ("AEB-A", "Aandelen"),
    ("AEB-AI", "Aandelen"),
    ("AEBB-A", "Aandelen"),
    ("AEBB-AI", "Aandelen"),
    ("AEBB-G", "GeldmarktPap"),
    ("AEBB-K", "KapitaalmarktPap"),
    ("AEBB-KGI", "Schuldpapier"),
    ("AEB-G", "GeldmarktPap"),
    ("AEB-K", "KapitaalmarktPap"),
    ("AEB-KGI", "Schuldpapier"),
    ("AEI-A", "Aandelen"),
    ("AEI-AI", "Aandelen"),
    ("AEI-G", "GeldmarktPap"),
    ("AEI-K", "KapitaalmarktPap"),
    ("AEI-KGI", "Schuldpapier"),
    ("AEL-A", "Aandelen"),
    ("AEL-AI", "Aandelen"),
    ("AEL-G", "GeldmarktPap"),
    ("AEL-K", "KapitaalmarktPap"),
    ("AEL-KGI", "Schuldpapier"),
    ("AEN-A", "Aandelen"),
    ("AEN-AI", "Aandelen"),
    ("AENB-A", "Aandelen"),
    ("AENB-AI", "Aandelen"),
    ("AENB-G", "GeldmarktPap"),
    ("AENB-K", "KapitaalmarktPap"),
    ("AENB-KGI", "Schuldpapier"),
    ("AENL-A", "Aandelen"),
    ("AENL-AI", "Aandelen"),
    ("AENL-G", "GeldmarktPap"),
    ("AENL-K", "KapitaalmarktPap"),
    ("AENL-KGI", "Schuldpapier"),
    ("AEN-G", "GeldmarktPap"),
    ("AEN-K", "KapitaalmarktPap"),
    ("AEN-KGI", "Schuldpapier"),
    ("AEU-A", "Aandelen"),
    ("AEU-AI", "Aandelen"),
    ("AEU-G", "GeldmarktPap"),
    ("AEU-K", "KapitaalmarktPap"),
    ("AEU-KGI", "Schuldpapier"),
    ("ANF-C", "ActivaNietFin"),
    ("ANF-CGM", "ActivaNietFin"),
    ("ANF-CGJ", "ActivaNietFin"),
    ("AO-DI", "DeelnIntInst"),
    ("AOE-A", "Aandelen"),
    ("AOE-AI", "Aandelen"),
    ("AOE-G", "GeldmarktPap"),
    ("AOE-K", "KapitaalmarktPap"),
    ("AOE-KGI", "Schuldpapier"),
    ("AO-FL", "LeasesUG"),
    ("AO-HK", "HandUGK"),
    ("AO-HL", "HandUGL"),
    ("AO-HY", "HypoUG"),
    ("AO-LK", "LeningUGK"),
    ("AO-LL", "LeningUGL"),
    ("AO-OK", "OverigeUGK"),
    ("AO-OL", "OverigeUGL"),
    ("AO-RC", "RecCourant"),
    ("AO-RP", "RepoUG"),
    ("AR", "StichKap"),
    ("AV-LP", "TechVoorz"),
    ("AV-VV", "LopenAanspr"),
    ("BENB-A", "Aandelen"),
    ("BENB-AI", "Aandelen"),
    ("BENB-G", "GeldmarktPap"),
    ("BENB-K", "KapitaalmarktPap"),
    ("BENB-KGI", "Schuldpapier"),
    ("BT", "BalansTotaal"),
    ("D-FB", "Futures"),
    ("D-FN", "Futures"),
    ("DO-FB", "Futures"),
    ("D-OK", "OptiesGekocht"),
    ("DO-OK", "OptiesGekocht"),
    ("DO-OS", "OptiesGeschr"),
    ("DO-OTR", "OTCDerivaten"),
    ("DO-OTV", "OTVDerivaten"),
    ("D-OS", "OptiesGeschr"),
    ("D-OTR", "OTCDerivaten"),
    ("D-OTV", "OTVDerivaten"),
    ("IO-GO", "OntwHulpGebond"),
    ("IO-OO", "OntwHulpSchenk"),
    ("IO-XH", "InkomOverdracht"),
    ("GD-ECM", "DienstExtraConcern"),
    ("GD-ICM", "DienstIntraConcern"),
    ("GD-GLM", "RandLGebruiksLicent"),
    ("GD-RLM", "RandLReprodLicent"),
    ("GD-ECJ", "DienstExtraConcern"),
    ("GD-ICJ", "DienstIntraConcern"),
    ("GD-GLJ", "RandLGebruiksLicent"),
    ("GD-RLJ", "RandLReprodLicent"),
    ("IWB", "IntrWaarde"),
    ("KO-KW", "SchuldKwijtSch"),
    ("KO-OG", "OnrGoedBtlOv"),
    ("KO-SR", "Stamrechten"),
    ("KO-VO", "OverKapitOverdr"),
    ("PD-A", "AlgDeeln"),
    ("PD-C", "DeelnPass"),
    ("PEN-A", "Aandelen"),
    ("PEN-AI", "Aandelen"),
    ("PENB-A", "Aandelen"),
    ("PENB-AI", "Aandelen"),
    ("PENB-G", "GeldmarktPap"),
    ("PENB-K", "KapitaalmarktPap"),
    ("PENB-KGI", "Schuldpapier"),
    ("PENL-A", "Aandelen"),
    ("PENL-AI", "Aandelen"),
    ("PENL-G", "GeldmarktPap"),
    ("PENL-K", "KapitaalmarktPap"),
    ("PENL-KGI", "Schuldpapier"),
    ("PEN-G", "GeldmarktPap"),
    ("PEN-K", "KapitaalmarktPap"),
    ("PEN-KGI", "Schuldpapier"),
    ("PN-OS", "NedTegenpartij"),
    ("PO-FL", "LeasesOG"),
    ("PO-HK", "HandOGK"),
    ("PO-HL", "HandOGL"),
    ("PO-LK", "LeningOGK"),
    ("PO-LL", "LeningOGL"),
    ("PO-OK", "OverigeOGK"),
    ("PO-OL", "OverigeOGL"),
    ("PO-RP", "RepoOG"),
    ("PV-LP", "TechVoorz"),
    ("PV-OV", "OverVoorz"),
    ("PV-VV", "LopenAanspr"),
    ("SB-K", "ParticipatieUGK"),
    ("SB-L", "ParticipatieUGL"),
    ("SN-K", "ParticipatieOGK"),
    ("SN-L", "ParticipatieOGL"),
    ("WE-A", "Aandelen"),
    ("WE-AI", "Aandelen"),
    ("WE-G", "GeldmarktPap"),
    ("WE-K", "KapitaalmarktPap"),
    ("WE-KGI", "Schuldpapier"),
    ("WI-A", "Aandelen"),
    ("WI-AI", "Aandelen"),
    ("WI-G", "GeldmarktPap"),
    ("WI-K", "KapitaalmarktPap"),
    ("WI-KGI", "Schuldpapier"),
    ("WVA-B", "Bestemming"),
    ("WVA-R", "Resulaten"),
    ("WVA-Z", "Resulaten"),
    ("WVB-B", "Baten"),
    ("WVB-L", "Bedrijfskosten"),
    ("WVB-O", "Bedrijfskosten"),
    ("WVB-S", "Loonkosten"),
    ("WVP", "WinstVerlPremUitk"),
    ("WVP-ZA", "AanvZorg"),
    ("WVP-ZZ", "ZorgZvw"),
    ("WVT-BL", "TotBatenLasten"),
    ("WVU-B", "WinstVerlBuiten"),
    ("WVU-L", "LatenUitz"),
];

/// Columns the regulator blocks, by positional index after key handling.
const BLOCKED: &[(&[&str], BlockedColumns)] = &[
    (&["AD-C", "PD-C"], BlockedColumns::Last),
    (
        &["AEB-A", "AEN-A"],
        BlockedColumns::Indexes(&[1, 11, 12, 13, 14, 15, 16]),
    ),
    (
        &["AEB-AI"],
        BlockedColumns::Indexes(&[2, 3, 7, 8, 11, 12, 13, 14, 15, 16]),
    ),
    (
        &["AEB-G", "AEB-K", "AEN-G", "AEN-K"],
        BlockedColumns::Indexes(&[1, 17]),
    ),
    (
        &["AEB-KGI"],
        BlockedColumns::Indexes(&[2, 3, 7, 8, 11, 12, 15, 16, 17]),
    ),
    (
        &["AEN-AI"],
        BlockedColumns::Indexes(&[3, 7, 8, 11, 12, 13, 14, 15, 16]),
    ),
    (
        &["AEN-KGI"],
        BlockedColumns::Indexes(&[3, 7, 8, 11, 12, 15, 16, 17]),
    ),
    (
        &["AO-FL", "AO-HL", "AO-LK", "AO-LL", "AO-RP"],
        BlockedColumns::Indexes(&[13]),
    ),
    (&["AO-HY"], BlockedColumns::Indexes(&[2, 13])),
    (
        &["AO-OK", "AO-OL"],
        BlockedColumns::Indexes(&[10, 11, 13, 14, 15]),
    ),
    (&["AO-RC"], BlockedColumns::Indexes(&[10, 11, 14, 15])),
    (&["D-FB"], BlockedColumns::Indexes(&[1, 3, 4, 7, 8, 9, 10])),
    (&["D-OK", "D-OS"], BlockedColumns::Indexes(&[1, 7, 8])),
    (&["D-OTR", "D-OTV"], BlockedColumns::Indexes(&[1, 8, 9])),
    (
        &["PEN-A"],
        BlockedColumns::Indexes(&[1, 10, 11, 12, 13, 14, 15]),
    ),
    (
        &["PEN-AI"],
        BlockedColumns::Indexes(&[6, 7, 10, 11, 12, 13, 14, 15]),
    ),
    (
        &["PEN-KGI"],
        BlockedColumns::Indexes(&[6, 7, 10, 11, 14, 15, 16]),
    ),
    (&["PEN-G", "PEN-K"], BlockedColumns::Indexes(&[1, 16])),
    (
        &["PO-OK", "PO-OL"],
        BlockedColumns::Indexes(&[10, 11, 12, 14, 15]),
    ),
    (&["PV-OV"], BlockedColumns::Indexes(&[1, 2])),
    (
        &["PO-FL", "PO-HL", "PO-LK", "PO-LL", "PO-RP"],
        BlockedColumns::Indexes(&[12]),
    ),
    (&["WVA-B"], BlockedColumns::Indexes(&[1])),
    (&["WVB-B", "WVB-L", "WVB-S"], BlockedColumns::Indexes(&[1, 3])),
];

const CHECKS: &[(&[&str], ColumnChecks)] = &[
    (
        &["AD-C", "PD-C"],
        ColumnChecks {
            integer: &[s(3, -1)],
            non_negative: &[s(4, 6), s(7, 8)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["AD-A", "PD-A"],
        ColumnChecks {
            integer: &[s(3, 4)],
            non_negative: &[],
            text: &[s(1, 3), tail(-1)],
            country_code: true,
        },
    ),
    (
        &["ADO-C"],
        ColumnChecks {
            integer: &[tail(2)],
            non_negative: &[s(2, 5), s(-2, -1)],
            text: &[s(1, 2)],
            country_code: true,
        },
    ),
    (
        &["AEB-A", "AEN-A"],
        ColumnChecks {
            integer: &[s(4, 11), tail(-1)],
            non_negative: &[s(5, 7)],
            text: &[s(2, 4)],
            country_code: true,
        },
    ),
    (
        &["AEB-AI"],
        ColumnChecks {
            integer: &[s(4, 7), s(9, 11), tail(-1)],
            non_negative: &[s(5, 7)],
            text: &[s(1, 2)],
            country_code: false,
        },
    ),
    (
        &["AEB-G", "AEB-K", "AEN-G", "AEN-K"],
        ColumnChecks {
            integer: &[s(4, -1)],
            non_negative: &[s(5, 7), s(13, 15)],
            text: &[s(2, 4)],
            country_code: true,
        },
    ),
    (
        &["AEB-KGI"],
        ColumnChecks {
            integer: &[s(4, 7), s(9, 11), s(13, 15)],
            non_negative: &[s(5, 7), s(13, 15)],
            text: &[s(1, 2)],
            country_code: false,
        },
    ),
    (
        &["AEN-AI"],
        ColumnChecks {
            integer: &[s(4, 7), s(9, 11), tail(-1)],
            non_negative: &[s(5, 7)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["AEN-KGI"],
        ColumnChecks {
            integer: &[s(4, 7), s(9, 11), s(13, 15)],
            non_negative: &[s(5, 7), s(13, 15)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["ANF-C"],
        ColumnChecks {
            integer: &[tail(1)],
            non_negative: &[s(2, 4)],
            text: &[],
            country_code: false,
        },
    ),
    (
        &["AO-FL", "AO-HL", "AO-LK", "AO-LL", "AO-RP"],
        ColumnChecks {
            integer: &[s(3, 13), tail(-2)],
            non_negative: &[s(3, 6), s(9, 13), tail(-1)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["AO-HY"],
        ColumnChecks {
            integer: &[s(3, 13), tail(-2)],
            non_negative: &[s(3, 6), s(9, 13), tail(-1)],
            text: &[s(1, 2)],
            country_code: true,
        },
    ),
    (
        &["AO-OK", "AO-OL"],
        ColumnChecks {
            integer: &[s(3, 10), s(12, 13)],
            non_negative: &[s(3, 6), s(9, 10), s(12, 13)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["AO-RC"],
        ColumnChecks {
            integer: &[s(3, 10), s(12, 14)],
            non_negative: &[s(4, 6), s(12, 14)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["D-FB"],
        ColumnChecks {
            integer: &[s(5, 7)],
            non_negative: &[s(5, 7)],
            text: &[s(2, 3)],
            country_code: true,
        },
    ),
    (
        &["D-OK", "D-OS"],
        ColumnChecks {
            integer: &[s(4, 7), tail(-2)],
            non_negative: &[s(4, 7), tail(-2)],
            text: &[s(2, 4)],
            country_code: true,
        },
    ),
    (
        &["D-OTR", "D-OTV"],
        ColumnChecks {
            integer: &[s(4, 8), tail(-3)],
            non_negative: &[s(4, 8), tail(-2)],
            text: &[s(2, 4)],
            country_code: true,
        },
    ),
    (
        &["GD-ECM", "GD-ICM"],
        ColumnChecks {
            integer: &[s(2, 4)],
            non_negative: &[s(2, 4)],
            text: &[s(1, 2), tail(-1)],
            country_code: true,
        },
    ),
    (
        &["PEN-A"],
        ColumnChecks {
            integer: &[s(3, 10), tail(-1)],
            non_negative: &[s(4, 6), s(9, 10), tail(-1)],
            text: &[s(2, 3)],
            country_code: true,
        },
    ),
    (
        &["PEN-AI"],
        ColumnChecks {
            integer: &[s(3, 6), s(8, 10), tail(-1)],
            non_negative: &[s(3, 6), s(9, 10), tail(-1)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["PEN-KGI"],
        ColumnChecks {
            integer: &[s(3, 6), s(8, 10), s(13, 15)],
            non_negative: &[s(3, 6), s(9, 10), s(13, 15)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["PEN-G", "PEN-K"],
        ColumnChecks {
            integer: &[s(3, -1)],
            non_negative: &[s(3, 6), s(9, 14), s(-2, -1)],
            text: &[s(2, 3)],
            country_code: true,
        },
    ),
    (
        &["PO-OK", "PO-OL"],
        ColumnChecks {
            integer: &[s(3, 10), s(-3, -2)],
            non_negative: &[s(3, 6), s(9, 10), s(-3, -2)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["PV-OV"],
        ColumnChecks {
            integer: &[tail(3)],
            non_negative: &[s(4, 6)],
            text: &[],
            country_code: false,
        },
    ),
    (
        &["PO-FL", "PO-HL", "PO-LK", "PO-LL", "PO-RP"],
        ColumnChecks {
            integer: &[s(3, 12), tail(-3)],
            non_negative: &[s(3, 6), s(9, 12), s(-3, -2), tail(-1)],
            text: &[s(1, 3)],
            country_code: true,
        },
    ),
    (
        &["WVA-B"],
        ColumnChecks {
            integer: &[s(2, 3)],
            non_negative: &[],
            text: &[],
            country_code: false,
        },
    ),
    (
        &["WVB-B", "WVB-L", "WVB-S"],
        ColumnChecks {
            integer: &[s(2, 3)],
            non_negative: &[s(2, 3)],
            text: &[],
            country_code: false,
        },
    ),
    (
        &["WVU-B", "WVU-L"],
        ColumnChecks {
            integer: &[s(2, 3)],
            non_negative: &[s(2, 3)],
            text: &[s(1, 2)],
            country_code: false,
        },
    ),
    (
        &["WVA-R"],
        ColumnChecks {
            integer: &[s(1, 2)],
            non_negative: &[],
            text: &[],
            country_code: false,
        },
    ),
];

pub(crate) fn registry() -> RuleRegistry {
    RuleRegistry {
        report: ReportType::Ofk,
        version: "2020-03",
        schema: "OFK-K.2020-03.xsd",
        root: RootRule {
            element: "OFK-K",
            attributes: vec![
                RootAttribute::Fixed {
                    name: "xmlns",
                    value: "bb.dnb.nl",
                },
                RootAttribute::Fixed {
                    name: "xmlns:xsi",
                    value: "http://www.w3.org/2001/XMLSchema-instance",
                },
                RootAttribute::Generated {
                    name: "xsi:schemaLocation",
                    value: Generated::ReportingPeriod {
                        template: "bb.dnb.nl OFK-K.{period}.xsd",
                    },
                },
            ],
            leading: vec![(
                "rappOpmerkingen",
                Generated::ReportingPeriod {
                    template: "OFK {period}",
                },
            )],
        },
        body: RegistryBody::Forms(FormRules {
            skip_sheets: vec!["Formulierenoverzicht"],
            control_tags: CONTROL_TAGS.to_vec(),
            keep_key_cells: vec!["AD-A", "PD-A"],
            blocked: BLOCKED.to_vec(),
            checks: CHECKS.to_vec(),
        }),
    }
}
