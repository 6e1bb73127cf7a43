//! Declarative per-layout extraction profiles.
//!
//! # Responsibility
//! - Decide which field extractors run for a [`Layout`].
//! - Hold the layout's documentation rules, description stops and seeds.
//!
//! # Invariants
//! - Profiles are built once per process and never mutated.
//! - One engine serves every layout; layouts differ only through profiles.

use crate::extract::rule::{RuleCascade, RuleSpec};
use crate::extract::rules::{CMM_REFERENCE, CMM_SEED, MET_REFERENCE, MET_SEED, PART_NUMBER_SEEDS};
use crate::model::layout::Layout;
use once_cell::sync::Lazy;
use regex::Regex;

/// Stops shared by every layout: part-number list marker, six-digit token,
/// three-digit+letter token and hour tokens.
const BASE_DESCRIPTION_STOPS: &str = r"ALL\s+MP/N|\d{6}|\d{3}[A-Z]|\b\d+\s*[MF]H";

/// How documentation references shape the output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentationMode {
    /// Layout has no documentation column.
    None,
    /// One output row per distinct reference.
    Distinct,
    /// All distinct references space-joined into one cell.
    Joined,
}

#[derive(Debug)]
pub struct LayoutProfile {
    layout: Layout,
    documentation_mode: DocumentationMode,
    documentation_rules: RuleCascade,
    description_stops: Regex,
    part_number_seeds: &'static [&'static str],
    documentation_seeds: &'static [&'static str],
}

impl LayoutProfile {
    fn build(layout: Layout) -> Self {
        let documentation_specs: &[RuleSpec] = match layout {
            Layout::Tddm => &[CMM_REFERENCE, MET_REFERENCE],
            Layout::Tddim | Layout::Tdmplmd => &[MET_REFERENCE],
            Layout::Tdmplm => &[],
        };
        let documentation_seeds: &'static [&'static str] = match layout {
            Layout::Tddm => &[MET_SEED, CMM_SEED],
            Layout::Tddim | Layout::Tdmplmd => &[MET_SEED],
            Layout::Tdmplm => &[],
        };
        let extra_stops = match layout {
            Layout::Tddm => r"|\bMET|\bCMM",
            Layout::Tddim => r"|\bMET",
            Layout::Tdmplm => r"|\bTSM|\bTSI",
            Layout::Tdmplmd => r"|\bTSM|\bTSI|\bMET",
        };
        let documentation_mode = match layout {
            Layout::Tddm => DocumentationMode::Distinct,
            Layout::Tddim | Layout::Tdmplmd => DocumentationMode::Joined,
            Layout::Tdmplm => DocumentationMode::None,
        };
        let part_number_seeds: &'static [&'static str] = if layout.has_part_numbers() {
            PART_NUMBER_SEEDS
        } else {
            &[]
        };

        Self {
            layout,
            documentation_mode,
            documentation_rules: RuleCascade::compile(documentation_specs)
                .expect("valid documentation rules"),
            description_stops: Regex::new(&format!("{BASE_DESCRIPTION_STOPS}{extra_stops}"))
                .expect("valid description stop regex"),
            part_number_seeds,
            documentation_seeds,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn has_part_numbers(&self) -> bool {
        self.layout.has_part_numbers()
    }

    pub fn has_limit(&self) -> bool {
        self.layout.has_limit()
    }

    pub fn documentation_mode(&self) -> DocumentationMode {
        self.documentation_mode
    }

    /// Label+code shapes recognized as documentation references.
    pub fn documentation_rules(&self) -> &RuleCascade {
        &self.documentation_rules
    }

    /// Markers that end the primary description span.
    pub fn description_stops(&self) -> &Regex {
        &self.description_stops
    }

    pub fn part_number_seeds(&self) -> &'static [&'static str] {
        self.part_number_seeds
    }

    pub fn documentation_seeds(&self) -> &'static [&'static str] {
        self.documentation_seeds
    }
}

static PROFILES: Lazy<[LayoutProfile; 4]> = Lazy::new(|| Layout::ALL.map(LayoutProfile::build));

/// Shared profile for `layout`.
pub fn profile(layout: Layout) -> &'static LayoutProfile {
    let index = match layout {
        Layout::Tddm => 0,
        Layout::Tddim => 1,
        Layout::Tdmplm => 2,
        Layout::Tdmplmd => 3,
    };
    &PROFILES[index]
}
