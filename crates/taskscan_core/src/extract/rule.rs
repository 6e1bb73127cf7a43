//! Ordered pattern rules and their canonicalizers.
//!
//! # Responsibility
//! - Pair a regex matcher with the function that normalizes its match.
//! - Evaluate rule lists in fixed priority order.
//!
//! # Invariants
//! - The first rule that matches wins; there is no scoring between rules.
//! - Every rule compiles into a case-sensitive and a case-insensitive
//!   matcher from the same pattern text.

use regex::{Captures, Regex, RegexBuilder};

/// Static declaration of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: &'static str,
    pub pattern: &'static str,
    pub canonicalizer: Canonicalizer,
}

impl RuleSpec {
    pub const fn new(
        name: &'static str,
        pattern: &'static str,
        canonicalizer: Canonicalizer,
    ) -> Self {
        Self {
            name,
            pattern,
            canonicalizer,
        }
    }
}

/// Maps a raw match to its normalized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonicalizer {
    /// Whole match, unchanged.
    Verbatim,
    /// Whole match with every whitespace run removed.
    StripWhitespace,
    /// Whole match with whitespace runs collapsed to one space.
    CollapseWhitespace,
    /// A fixed replacement string.
    Fixed(&'static str),
    /// Capture groups joined by the separator.
    JoinGroups(&'static str),
    /// `"<group 1> <unit>"`.
    Duration(&'static str),
    /// `"<group 1> <unit>, <group 2> <unit>"`.
    DurationPair(&'static str),
}

impl Canonicalizer {
    pub fn apply(self, caps: &Captures<'_>) -> String {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        match self {
            Self::Verbatim => whole.to_string(),
            Self::StripWhitespace => whole.split_whitespace().collect(),
            Self::CollapseWhitespace => whole.split_whitespace().collect::<Vec<_>>().join(" "),
            Self::Fixed(value) => value.to_string(),
            Self::JoinGroups(separator) => caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(separator),
            Self::Duration(unit) => format!("{} {unit}", group(caps, 1)),
            Self::DurationPair(unit) => {
                format!("{} {unit}, {} {unit}", group(caps, 1), group(caps, 2))
            }
        }
    }
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// A rule hit: the raw span it matched and the canonical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: &'static str,
    pub start: usize,
    /// Verbatim matched text.
    pub raw: String,
    pub value: String,
}

/// Compiled rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: &'static str,
    exact_case: Regex,
    any_case: Regex,
    canonicalizer: Canonicalizer,
}

impl PatternRule {
    pub fn compile(spec: &RuleSpec) -> Result<Self, regex::Error> {
        Ok(Self {
            name: spec.name,
            exact_case: Regex::new(spec.pattern)?,
            any_case: RegexBuilder::new(spec.pattern)
                .case_insensitive(true)
                .build()?,
            canonicalizer: spec.canonicalizer,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First match anywhere in `text`.
    pub fn find(&self, text: &str) -> Option<RuleMatch> {
        self.exact_case
            .captures(text)
            .map(|caps| self.to_match(&caps))
    }

    /// Match that begins at the first byte of `candidate`.
    ///
    /// The match may end before `candidate` does; only the matched prefix is
    /// canonicalized.
    pub fn find_at_start(&self, candidate: &str) -> Option<RuleMatch> {
        self.exact_case
            .captures(candidate)
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
            .map(|caps| self.to_match(&caps))
    }

    /// Every non-overlapping match, optionally ignoring case.
    pub fn find_all(&self, text: &str, ignore_case: bool) -> Vec<RuleMatch> {
        let matcher = if ignore_case {
            &self.any_case
        } else {
            &self.exact_case
        };
        matcher
            .captures_iter(text)
            .map(|caps| self.to_match(&caps))
            .collect()
    }

    fn to_match(&self, caps: &Captures<'_>) -> RuleMatch {
        let (start, raw) = caps
            .get(0)
            .map_or((0, ""), |m| (m.start(), m.as_str()));
        RuleMatch {
            rule: self.name,
            start,
            raw: raw.to_string(),
            value: self.canonicalizer.apply(caps),
        }
    }
}

/// Rules evaluated in declaration order.
#[derive(Debug, Clone)]
pub struct RuleCascade {
    rules: Vec<PatternRule>,
}

impl RuleCascade {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, regex::Error> {
        let rules = specs
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule with a match anywhere in `text`.
    pub fn first_match(&self, text: &str) -> Option<RuleMatch> {
        self.rules.iter().find_map(|rule| rule.find(text))
    }

    /// First rule whose match begins at the start of `candidate`.
    pub fn first_match_at_start(&self, candidate: &str) -> Option<RuleMatch> {
        self.rules
            .iter()
            .find_map(|rule| rule.find_at_start(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::{Canonicalizer, PatternRule, RuleCascade, RuleSpec};

    #[test]
    fn canonicalizers_normalize_whitespace() {
        let rule = PatternRule::compile(&RuleSpec::new(
            "spaced",
            r"\b[A-Z]{2}\d{5}\s*-\s*\d{2}\b",
            Canonicalizer::StripWhitespace,
        ))
        .unwrap();
        let hit = rule.find("see BL16600 - 12 here").unwrap();
        assert_eq!(hit.raw, "BL16600 - 12");
        assert_eq!(hit.value, "BL16600-12");

        let collapse = PatternRule::compile(&RuleSpec::new(
            "doc",
            r"\bMET\s+\d{2}\.\d{2}",
            Canonicalizer::CollapseWhitespace,
        ))
        .unwrap();
        assert_eq!(collapse.find("MET   21.51").unwrap().value, "MET 21.51");
    }

    #[test]
    fn duration_canonicalizers_format_groups() {
        let pair = PatternRule::compile(&RuleSpec::new(
            "pair",
            r"(\d+)\s*FH\s*,\s*(\d+)\s*FH",
            Canonicalizer::DurationPair("FH"),
        ))
        .unwrap();
        assert_eq!(pair.find("600FH ,1200 FH").unwrap().value, "600 FH, 1200 FH");

        let join = PatternRule::compile(&RuleSpec::new(
            "ata",
            r"(\d{2})/(\d{2})",
            Canonicalizer::JoinGroups("-"),
        ))
        .unwrap();
        assert_eq!(join.find("21/51").unwrap().value, "21-51");
    }

    #[test]
    fn find_at_start_rejects_inner_matches() {
        let rule = PatternRule::compile(&RuleSpec::new(
            "six",
            r"\b\d{6}\b",
            Canonicalizer::Verbatim,
        ))
        .unwrap();
        assert!(rule.find_at_start("X 579045").is_none());
        assert_eq!(rule.find_at_start("579045 A").unwrap().value, "579045");
    }

    #[test]
    fn cascade_uses_declaration_order() {
        let cascade = RuleCascade::compile(&[
            RuleSpec::new("fixed", r"ALL\s+MP/N", Canonicalizer::Fixed("ALL MP/N")),
            RuleSpec::new("digits", r"\d+", Canonicalizer::Verbatim),
        ])
        .unwrap();
        let hit = cascade.first_match("12 ALL  MP/N").unwrap();
        assert_eq!(hit.rule, "fixed");
        assert_eq!(hit.value, "ALL MP/N");
    }

    #[test]
    fn find_all_can_ignore_case() {
        let rule = PatternRule::compile(&RuleSpec::new(
            "letters",
            r"\b[A-Z]{3}\d{2}\b",
            Canonicalizer::Verbatim,
        ))
        .unwrap();
        assert!(rule.find_all("abc12 ABC34", false).len() == 1);
        let hits = rule.find_all("abc12 ABC34", true);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].value, "abc12");
    }
}
