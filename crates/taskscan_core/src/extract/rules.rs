//! Rule tables and curated seed values.
//!
//! Each table is an ordered cascade; earlier entries take priority. Examples
//! next to the part-number shapes show the typeset variants they target.

use crate::extract::rule::{Canonicalizer, RuleCascade, RuleSpec};
use once_cell::sync::Lazy;

use Canonicalizer::{
    CollapseWhitespace, Duration, DurationPair, Fixed, JoinGroups, StripWhitespace, Verbatim,
};

/// Six-group slash-delimited task code, e.g. `21/51/10/601/001/001`.
pub const TASK_NUMBER_PATTERN: &str = r"\b\d{2}/\d{2}/\d{2}/\d{3}/\d{3}/\d{3}\b";

/// Literal part-number-list marker.
pub const ALL_MPN_PATTERN: &str = r"(?i)\bALL\s+MP/N\b";
pub const ALL_MPN: &str = "ALL MP/N";

pub const ATA_SPECS: &[RuleSpec] = &[
    RuleSpec::new(
        "ata_from_task_number",
        r"\b(\d{2})/(\d{2})/\d{2}/\d{3}/\d{3}/\d{3}\b",
        JoinGroups("-"),
    ),
    RuleSpec::new("ata_label", r"ATA\s+(\d{2})\s*[-\s]\s*(\d{2})", JoinGroups("-")),
];

pub const TASK_NUMBER_SPECS: &[RuleSpec] =
    &[RuleSpec::new("task_number", TASK_NUMBER_PATTERN, Verbatim)];

pub const LIMIT_SPECS: &[RuleSpec] = &[
    RuleSpec::new("month_pair", r"(\d+)\s*M\s*,\s*(\d+)\s*M", DurationPair("M")),
    RuleSpec::new(
        "flight_hour_pair",
        r"(\d+)\s*FH\s*,\s*(\d+)\s*FH",
        DurationPair("FH"),
    ),
    RuleSpec::new("month_overhaul", r"(\d+)\s*M\s*(?:TSM|TSI)", Duration("M")),
    RuleSpec::new("flight_hours", r"(\d+)\s*FH", Duration("FH")),
    RuleSpec::new("months", r"(\d+)\s*M", Duration("M")),
];

pub const MET_REFERENCE: RuleSpec = RuleSpec::new(
    "met_reference",
    r"\bMET\s+\d{2}\.\d{2}\.\d{2}\.\d{3}\b",
    CollapseWhitespace,
);

pub const CMM_REFERENCE: RuleSpec = RuleSpec::new(
    "cmm_reference",
    r"\bCMM\s+\d{2}\.\d{2}\.\d{2}\b",
    CollapseWhitespace,
);

pub const PART_NUMBER_SPECS: &[RuleSpec] = &[
    // 17149-1
    RuleSpec::new("d5_d1", r"\b\d{5}-\d\b", Verbatim),
    // BL16600-12
    RuleSpec::new("a2d5_d2", r"\b[A-Z]{2}\d{5}\s*-\s*\d{2}\b", StripWhitespace),
    // 2928-2
    RuleSpec::new("d4_d1", r"\b\d{4}-\d\b", Verbatim),
    // LS210PS300
    RuleSpec::new("a2d3a2d3", r"\b[A-Z]{2}\d{3}[A-Z]{2}\d{3}\b", Verbatim),
    // FINLONTYPEF
    RuleSpec::new("a11", r"\b[A-Z]{11}\b", Verbatim),
    RuleSpec::new("all_mpn", r"\bALL\s+MP/N\b", Fixed(ALL_MPN)),
    // 60081492E, 60081491 E
    RuleSpec::new("d6a", r"\b\d{6}\s*[A-Z]\b", StripWhitespace),
    // 579045
    RuleSpec::new("d6", r"\b\d{6}\b", Verbatim),
    // 1606 - 1
    RuleSpec::new("d4_d1_spaced", r"\b\d{4}\s*-\s*\d\b", StripWhitespace),
    // 158210-1
    RuleSpec::new("d6_d1", r"\b\d{6}-\d\b", StripWhitespace),
    // 704A33-633-09
    RuleSpec::new(
        "d3ad2_d1to3_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d{1,3}\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 350A31-3020-20
    RuleSpec::new(
        "d3ad2_d4_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d{4}\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 350A33-2Q04-05
    RuleSpec::new(
        "d3ad2_d1ad2_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d[A-Z]\d{2}\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 355A11-0020-1
    RuleSpec::new(
        "d3ad2_d4_d1to2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d{4}\s*-\s*\d{1,2}\b",
        StripWhitespace,
    ),
    // LB4-1231-1
    RuleSpec::new("a2d1to2_d4_d1to2", r"\b[A-Z]{2}\d{1,2}-\d{4}-\d{1,2}\b", Verbatim),
    // LB6-1231-3-1
    RuleSpec::new(
        "a2d1to2_d4_d1to2_d1to2",
        r"\b[A-Z]{2}\d{1,2}-\d{4}-\d{1,2}\s*-\s*\d{1,2}\b",
        Verbatim,
    ),
    // LB4 - 1231 - 1
    RuleSpec::new(
        "a2d1_d4_d1_spaced",
        r"\b[A-Z]{2}\d\s*-\s*\d{4}\s*-\s*\d\b",
        StripWhitespace,
    ),
    // LS210PS30
    RuleSpec::new("a2d3a2d2", r"\b[A-Z]{2}\d{3}[A-Z]{2}\d{2}\b", StripWhitespace),
    // Y51BB10843S1M73
    RuleSpec::new(
        "ad2a2d5ad1ad2",
        r"\b[A-Z]\d{2}[A-Z]{2}\d{5}[A-Z]\d[A-Z]\d{2}\b",
        Verbatim,
    ),
    // INA36132A
    RuleSpec::new("a3d5a", r"\b[A-Z]{3}\d{5}[A-Z]\b", StripWhitespace),
    // 350A33-1535-00
    RuleSpec::new(
        "d3ad2_d1to4_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d{1,4}\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 350A33-1 526-00
    RuleSpec::new(
        "d3ad2_d1_d3_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d\s*\d{3}\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 355A12-51 03-00
    RuleSpec::new(
        "d3ad2_d2_d2_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d{2}\s*\d{2}\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 355A1 2-003 1-01
    RuleSpec::new(
        "d3ad1_d1_d3_d1_d2",
        r"\b\d{3}[A-Z]\d\s*\d\s*-\s*\d{3}\s*\d\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
    // 350A31-191 7-00
    RuleSpec::new(
        "d3ad2_d1to3_d1_d2",
        r"\b\d{3}[A-Z]\d{2}\s*-\s*\d{1,3}\s+\d\s*-\s*\d{2}\b",
        StripWhitespace,
    ),
];

/// Known-good part numbers for the part-number layouts.
pub const PART_NUMBER_SEEDS: &[&str] = &[
    "BL16600-12",
    "355A1 2-003 1-01",
    "355A12-51 03-00",
    "350A33-1 526-00",
    "355A11-0020-01",
    "350A33-1 535-00",
    "350A75-1027-20",
    "2928-2",
    "LS210PS30",
    "FINLONTYPEFO",
    "Y51BB10843S1M73",
    "INA36132A",
    "60081491 E",
    "60081492E",
    "350A31-3020-20",
    "350A33-2Q04-05",
    "704A33-633-091",
    "81 0-41 8A",
    "563-073",
    "579045",
    "158171A",
    "158210-1",
    "709628-100",
    "56995-0101",
    "3205562",
    "451400003",
    "LB4-1231-1",
    "LB6-1231-3-1",
    "1606-1",
    "78825",
    "17149-1",
    "1214",
    "P94B12-207",
    "SL846-XOL",
    "EE0033",
    "EE0033A",
    "20CF4D",
    "Y-1265-1 2-1",
    "JE2-1 978-3",
    "JE2-1978-3NG",
    "ELT90A2560 102001",
];

pub const MET_SEED: &str = "MET 21.51.10.601";
pub const CMM_SEED: &str = "CMM 25.69.87";

pub static ATA_RULES: Lazy<RuleCascade> =
    Lazy::new(|| RuleCascade::compile(ATA_SPECS).expect("valid ATA rules"));
pub static TASK_NUMBER_RULES: Lazy<RuleCascade> =
    Lazy::new(|| RuleCascade::compile(TASK_NUMBER_SPECS).expect("valid task-number rules"));
pub static LIMIT_RULES: Lazy<RuleCascade> =
    Lazy::new(|| RuleCascade::compile(LIMIT_SPECS).expect("valid limit rules"));
pub static PART_NUMBER_RULES: Lazy<RuleCascade> =
    Lazy::new(|| RuleCascade::compile(PART_NUMBER_SPECS).expect("valid part-number rules"));

#[cfg(test)]
mod tests {
    use super::{ATA_RULES, LIMIT_RULES, PART_NUMBER_RULES, TASK_NUMBER_RULES};

    #[test]
    fn all_rule_tables_compile() {
        assert_eq!(ATA_RULES.len(), 2);
        assert_eq!(TASK_NUMBER_RULES.len(), 1);
        assert_eq!(LIMIT_RULES.len(), 5);
        assert!(PART_NUMBER_RULES.len() >= 25);
    }

    #[test]
    fn part_number_shapes_normalize() {
        let cases = [
            ("BL16600 - 12", "BL16600-12"),
            ("579045", "579045"),
            ("LB4-1231-1", "LB4-1231-1"),
            ("350A31-3020-20", "350A31-3020-20"),
            ("350A33-2Q04-05", "350A33-2Q04-05"),
            ("350A33-1 526-00", "350A33-1526-00"),
            ("Y51BB10843S1M73", "Y51BB10843S1M73"),
            ("INA36132A", "INA36132A"),
        ];
        for (raw, expected) in cases {
            let hit = PART_NUMBER_RULES
                .first_match_at_start(raw)
                .unwrap_or_else(|| panic!("no rule for {raw}"));
            assert_eq!(hit.value, expected, "rule {} on {raw}", hit.rule);
        }
    }
}
