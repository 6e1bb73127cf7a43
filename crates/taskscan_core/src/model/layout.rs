//! Output layouts and their column sets.
//!
//! # Responsibility
//! - Name the four supported output layouts.
//! - Fix the display column order of each layout.
//!
//! # Invariants
//! - Column order returned by [`Layout::columns`] is the export order.
//! - `Limit` and `Interval` read the same record field; a layout carries at
//!   most one of them.

use crate::model::record::TaskRecord;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Output layout selecting the active field subset and rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Task + Description + Documentation + Margin.
    Tddm,
    /// Task + Description + Documentation + Interval + Margin.
    Tddim,
    /// Task + Description + PartNumber + Limit + Margin.
    Tdmplm,
    /// Task + Description + PartNumber + Limit + Documentation + Margin.
    #[default]
    Tdmplmd,
}

const TDDM_COLUMNS: &[Column] = &[
    Column::Ata,
    Column::TaskNumber,
    Column::Description,
    Column::Documentation,
    Column::Margin,
    Column::Reference,
];

const TDDIM_COLUMNS: &[Column] = &[
    Column::Ata,
    Column::TaskNumber,
    Column::Description,
    Column::Documentation,
    Column::Interval,
    Column::Margin,
    Column::Reference,
];

const TDMPLM_COLUMNS: &[Column] = &[
    Column::Ata,
    Column::TaskNumber,
    Column::Description,
    Column::PartNumber,
    Column::ReferenceNumber,
    Column::Limit,
    Column::Margin,
    Column::Reference,
];

const TDMPLMD_COLUMNS: &[Column] = &[
    Column::Ata,
    Column::TaskNumber,
    Column::Description,
    Column::PartNumber,
    Column::ReferenceNumber,
    Column::Limit,
    Column::Margin,
    Column::Documentation,
    Column::Reference,
];

impl Layout {
    /// All layouts in menu order.
    pub const ALL: [Layout; 4] = [Self::Tddm, Self::Tddim, Self::Tdmplm, Self::Tdmplmd];

    /// Stable short name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tddm => "tddm",
            Self::Tddim => "tddim",
            Self::Tdmplm => "tdmplm",
            Self::Tdmplmd => "tdmplmd",
        }
    }

    /// Human-readable title, e.g. `Task/Description/Documentation/Margin`.
    pub fn title(self) -> &'static str {
        match self {
            Self::Tddm => "Task/Description/Documentation/Margin",
            Self::Tddim => "Task/Description/Documentation/Interval/Margin",
            Self::Tdmplm => "Task/Description/MP/N/PN/Limit/Margin",
            Self::Tdmplmd => "Task/Description/MP/N/PN/Limit/Margin/Documentation",
        }
    }

    /// Display columns in export order.
    pub fn columns(self) -> &'static [Column] {
        match self {
            Self::Tddm => TDDM_COLUMNS,
            Self::Tddim => TDDIM_COLUMNS,
            Self::Tdmplm => TDMPLM_COLUMNS,
            Self::Tdmplmd => TDMPLMD_COLUMNS,
        }
    }

    /// Header row for this layout.
    pub fn headers(self) -> Vec<&'static str> {
        self.columns().iter().map(|column| column.display_name()).collect()
    }

    pub fn has_column(self, column: Column) -> bool {
        self.columns().contains(&column)
    }

    /// Whether the part-number / reference-number extractor runs.
    pub fn has_part_numbers(self) -> bool {
        self.has_column(Column::PartNumber)
    }

    /// Whether a limit or interval column is present.
    pub fn has_limit(self) -> bool {
        self.has_column(Column::Limit) || self.has_column(Column::Interval)
    }

    pub fn has_documentation(self) -> bool {
        self.has_column(Column::Documentation)
    }

    /// Projects a record onto this layout's cells, in column order.
    pub fn row_values(self, record: &TaskRecord) -> Vec<&str> {
        self.columns()
            .iter()
            .map(|column| column.value(record))
            .collect()
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout name that matches none of the supported layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLayout(pub String);

impl Display for UnknownLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown layout `{}`; expected tddm|tddim|tdmplm|tdmplmd",
            self.0
        )
    }
}

impl Error for UnknownLayout {}

impl FromStr for Layout {
    type Err = UnknownLayout;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|layout| layout.name() == normalized)
            .ok_or_else(|| UnknownLayout(value.to_string()))
    }
}

/// Display column of an output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Ata,
    TaskNumber,
    Description,
    /// Manufacturer part number, shown as `MP/N`.
    PartNumber,
    /// Paired reference number, shown as `PN`.
    ReferenceNumber,
    Limit,
    /// Same field as `Limit`, under the interval-layout heading.
    Interval,
    Margin,
    Documentation,
    /// Verbatim context span.
    Reference,
}

const ALL_COLUMNS: &[Column] = &[
    Column::Ata,
    Column::TaskNumber,
    Column::Description,
    Column::PartNumber,
    Column::ReferenceNumber,
    Column::Limit,
    Column::Interval,
    Column::Margin,
    Column::Documentation,
    Column::Reference,
];

impl Column {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ata => "ATA",
            Self::TaskNumber => "Task Number",
            Self::Description => "Description",
            Self::PartNumber => "MP/N",
            Self::ReferenceNumber => "PN",
            Self::Limit => "Limit",
            Self::Interval => "Interval",
            Self::Margin => "Margin",
            Self::Documentation => "Documentation",
            Self::Reference => "Reference",
        }
    }

    /// Resolves an exact display heading back to its column.
    pub fn from_display_name(name: &str) -> Option<Self> {
        ALL_COLUMNS
            .iter()
            .copied()
            .find(|column| column.display_name() == name)
    }

    pub fn value(self, record: &TaskRecord) -> &str {
        match self {
            Self::Ata => &record.ata,
            Self::TaskNumber => &record.task_number,
            Self::Description => &record.description,
            Self::PartNumber => &record.part_number,
            Self::ReferenceNumber => &record.reference_number,
            Self::Limit | Self::Interval => &record.limit,
            Self::Margin => &record.margin,
            Self::Documentation => &record.documentation,
            Self::Reference => &record.reference,
        }
    }

    pub fn value_mut(self, record: &mut TaskRecord) -> &mut String {
        match self {
            Self::Ata => &mut record.ata,
            Self::TaskNumber => &mut record.task_number,
            Self::Description => &mut record.description,
            Self::PartNumber => &mut record.part_number,
            Self::ReferenceNumber => &mut record.reference_number,
            Self::Limit | Self::Interval => &mut record.limit,
            Self::Margin => &mut record.margin,
            Self::Documentation => &mut record.documentation,
            Self::Reference => &mut record.reference,
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Layout};

    #[test]
    fn layout_headers_follow_fixed_order() {
        assert_eq!(
            Layout::Tddm.headers(),
            vec!["ATA", "Task Number", "Description", "Documentation", "Margin", "Reference"]
        );
        assert_eq!(
            Layout::Tdmplmd.headers(),
            vec![
                "ATA",
                "Task Number",
                "Description",
                "MP/N",
                "PN",
                "Limit",
                "Margin",
                "Documentation",
                "Reference"
            ]
        );
    }

    #[test]
    fn layout_parses_case_insensitively() {
        assert_eq!(" TDDIM ".parse::<Layout>().unwrap(), Layout::Tddim);
        let err = "tdx".parse::<Layout>().unwrap_err();
        assert!(err.to_string().contains("tdx"));
    }

    #[test]
    fn layout_capabilities_match_columns() {
        assert!(!Layout::Tddm.has_part_numbers());
        assert!(!Layout::Tddm.has_limit());
        assert!(Layout::Tddim.has_limit());
        assert!(Layout::Tdmplm.has_part_numbers());
        assert!(!Layout::Tdmplm.has_documentation());
        assert!(Layout::Tdmplmd.has_documentation());
    }

    #[test]
    fn display_names_round_trip() {
        for layout in Layout::ALL {
            for column in layout.columns() {
                assert_eq!(
                    Column::from_display_name(column.display_name()),
                    Some(*column)
                );
            }
        }
        assert_eq!(Column::from_display_name("Type of LIR"), None);
    }
}
