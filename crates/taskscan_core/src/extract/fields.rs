//! Field extractors.
//!
//! # Responsibility
//! - Map one context span to each semantic field of a task record.
//!
//! # Invariants
//! - Every extractor is total: absence resolves to an empty string, `"-"`
//!   or a placeholder collection, never an error.
//! - Only the part-number and documentation extractors touch the registry.

use crate::extract::profile::LayoutProfile;
use crate::extract::registry::{CanonicalRegistry, FieldKind};
use crate::extract::rules::{
    ALL_MPN, ALL_MPN_PATTERN, ATA_RULES, LIMIT_RULES, PART_NUMBER_RULES, TASK_NUMBER_PATTERN,
    TASK_NUMBER_RULES,
};
use crate::model::record::PLACEHOLDER;
use once_cell::sync::Lazy;
use regex::Regex;

static TASK_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(TASK_NUMBER_PATTERN).expect("valid task number regex"));
static ALL_MPN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(ALL_MPN_PATTERN).expect("valid part-number list regex"));
static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9A-Z-]+(?:\s+[A-Z])?)\s*\(([^)]+)\)").expect("valid part-number pair regex")
});
static PARENTHESIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthesized regex"));
static LEADING_DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*").expect("valid leading dash regex"));
static FALLBACK_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bALL\s+MP/N\b|\b\d{6}\b|\b\d{3}[A-Z]").expect("valid fallback code regex")
});
static FALLBACK_LIMIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+\s*[MF]H\b|\bTSM\b|\bTSI\b").expect("valid fallback limit regex")
});

/// Manufacturer part number and its paired reference number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartNumberPair {
    pub part_number: String,
    pub reference_number: String,
}

impl PartNumberPair {
    pub fn new(part_number: impl Into<String>, reference_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            reference_number: reference_number.into(),
        }
    }

    /// `("-", "-")`, used when nothing was found.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER, PLACEHOLDER)
    }

    /// `("ALL MP/N", "-")`: the task applies to every listed part.
    pub fn all_listed() -> Self {
        Self::new(ALL_MPN, PLACEHOLDER)
    }
}

/// `DD-DD` chapter code, or empty.
pub fn extract_ata(text: &str) -> String {
    ATA_RULES
        .first_match(text)
        .map(|hit| hit.value)
        .unwrap_or_default()
}

/// Verbatim six-group task code, or empty.
pub fn extract_task_number(text: &str) -> String {
    TASK_NUMBER_RULES
        .first_match(text)
        .map(|hit| hit.value)
        .unwrap_or_default()
}

/// Free-text description, or `"-"`.
///
/// The primary span runs from the end of the task code to the first stop of
/// the layout (or the end of `text`); newlines inside it are whitespace. When
/// that span cleans to nothing, the first line of `text` free of codes and
/// limit tokens is used instead.
pub fn extract_description(text: &str, profile: &LayoutProfile) -> String {
    if let Some(description) = primary_description(text, profile) {
        return description;
    }

    text.split('\n')
        .filter(|line| !TASK_NUMBER_RE.is_match(line))
        .filter(|line| !FALLBACK_CODE_RE.is_match(line))
        .filter(|line| !FALLBACK_LIMIT_RE.is_match(line))
        .map(clean_description)
        .find(|line| !line.is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn primary_description(text: &str, profile: &LayoutProfile) -> Option<String> {
    let task = TASK_NUMBER_RE.find(text)?;
    let body = text[task.end()..].trim_start();
    let start = text.len() - body.len();
    let end = profile
        .description_stops()
        .find_at(text, start)
        .map_or(text.len(), |stop| stop.start());

    let description = clean_description(&text[start..end]);
    (!description.is_empty()).then_some(description)
}

fn clean_description(raw: &str) -> String {
    let without_asides = PARENTHESIZED_RE.replace_all(raw, "");
    let collapsed = without_asides.split_whitespace().collect::<Vec<_>>().join(" ");
    LEADING_DASH_RE.replace(&collapsed, "").trim().to_string()
}

/// Part-number / reference-number pairs found in `text`.
///
/// Never empty: the `ALL MP/N` marker short-circuits to
/// [`PartNumberPair::all_listed`], and no hit at all yields
/// [`PartNumberPair::placeholder`].
pub fn extract_part_numbers(text: &str, registry: &mut CanonicalRegistry) -> Vec<PartNumberPair> {
    if ALL_MPN_RE.is_match(text) {
        return vec![PartNumberPair::all_listed()];
    }

    let pairs = PAIR_RE
        .captures_iter(text)
        .map(|caps| {
            let candidate = caps.get(1).map_or("", |m| m.as_str()).trim();
            let reference = caps.get(2).map_or("", |m| m.as_str()).trim();
            let normalized = PART_NUMBER_RULES
                .first_match_at_start(candidate)
                .map_or_else(|| candidate.to_string(), |hit| hit.value);
            let reference_number = if reference.is_empty() {
                PLACEHOLDER
            } else {
                reference
            };
            PartNumberPair::new(
                registry.fold(FieldKind::PartNumber, &normalized),
                reference_number,
            )
        })
        .collect::<Vec<_>>();
    if !pairs.is_empty() {
        return pairs;
    }

    let mut hits: Vec<String> = Vec::new();
    for rule in PART_NUMBER_RULES.rules() {
        for hit in rule.find_all(text, true) {
            let canonical = registry.fold(FieldKind::PartNumber, &hit.value);
            if !hits.contains(&canonical) {
                hits.push(canonical);
            }
        }
    }

    if hits.is_empty() {
        return vec![PartNumberPair::placeholder()];
    }
    hits.into_iter()
        .map(|part_number| PartNumberPair::new(part_number, PLACEHOLDER))
        .collect()
}

/// Canonical documentation references in order of appearance, repeats
/// included.
pub fn extract_documentation(
    text: &str,
    profile: &LayoutProfile,
    registry: &mut CanonicalRegistry,
) -> Vec<String> {
    let mut hits = profile
        .documentation_rules()
        .rules()
        .iter()
        .flat_map(|rule| rule.find_all(text, false))
        .collect::<Vec<_>>();
    hits.sort_by_key(|hit| hit.start);

    hits.into_iter()
        .map(|hit| registry.fold(FieldKind::Documentation, &hit.value))
        .collect()
}

/// Time limit or interval, e.g. `60 M` or `600 FH, 1200 FH`; `"-"` if none.
pub fn extract_limit(text: &str) -> String {
    LIMIT_RULES
        .first_match(text)
        .map_or_else(|| PLACEHOLDER.to_string(), |hit| hit.value)
}
