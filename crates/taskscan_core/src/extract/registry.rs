//! Run-scoped canonical value registry.
//!
//! # Responsibility
//! - Hold accepted canonical strings per field kind, in insertion order.
//! - Fold noisy raw values into an existing canonical entry when similar.
//!
//! # Invariants
//! - Entries are only ever appended; nothing is removed during a run.
//! - A raw value folded into an existing entry is never added on its own.
//! - One registry belongs to one extraction run and is dropped with it.

use log::debug;

/// Field kinds that carry a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    PartNumber,
    Documentation,
}

impl FieldKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::PartNumber => "part_number",
            Self::Documentation => "documentation",
        }
    }
}

/// Append-only canonical sets, one per [`FieldKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRegistry {
    part_numbers: Vec<String>,
    documentation: Vec<String>,
}

impl CanonicalRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with curated known-good values.
    ///
    /// Seeds are trimmed and kept verbatim otherwise; blank seeds and exact
    /// duplicates are skipped. Seeds are not folded into each other.
    pub fn seeded<P, D>(part_numbers: P, documentation: D) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let mut registry = Self::new();
        for seed in part_numbers {
            registry.insert_seed(FieldKind::PartNumber, seed.as_ref());
        }
        for seed in documentation {
            registry.insert_seed(FieldKind::Documentation, seed.as_ref());
        }
        registry
    }

    /// Canonical entries of `kind` in insertion order.
    pub fn entries(&self, kind: FieldKind) -> &[String] {
        match kind {
            FieldKind::PartNumber => &self.part_numbers,
            FieldKind::Documentation => &self.documentation,
        }
    }

    pub fn len(&self, kind: FieldKind) -> usize {
        self.entries(kind).len()
    }

    pub fn contains(&self, kind: FieldKind, value: &str) -> bool {
        self.entries(kind).iter().any(|entry| entry == value)
    }

    /// Maps `raw` to its canonical form, learning it when it is new.
    ///
    /// Exact entries win first, then the first similar entry in insertion
    /// order. Otherwise `raw` itself becomes a new entry.
    pub fn fold(&mut self, kind: FieldKind, raw: &str) -> String {
        if self.contains(kind, raw) {
            return raw.to_string();
        }

        if let Some(existing) = self
            .entries(kind)
            .iter()
            .find(|entry| is_similar(raw, entry))
        {
            return existing.clone();
        }

        debug!(
            "event=registry_add module=extract kind={} size={}",
            kind.as_str(),
            self.len(kind) + 1
        );
        self.entries_mut(kind).push(raw.to_string());
        raw.to_string()
    }

    fn insert_seed(&mut self, kind: FieldKind, seed: &str) {
        let seed = seed.trim();
        if seed.is_empty() || self.contains(kind, seed) {
            return;
        }
        self.entries_mut(kind).push(seed.to_string());
    }

    fn entries_mut(&mut self, kind: FieldKind) -> &mut Vec<String> {
        match kind {
            FieldKind::PartNumber => &mut self.part_numbers,
            FieldKind::Documentation => &mut self.documentation,
        }
    }
}

/// Similarity predicate used by [`CanonicalRegistry::fold`].
///
/// Whitespace-free forms that are equal are similar. Otherwise both are split
/// on `-`; segment counts must match and every segment pair must be equal or
/// equal once trailing zeros are stripped.
pub fn is_similar(left: &str, right: &str) -> bool {
    let left: String = left.split_whitespace().collect();
    let right: String = right.split_whitespace().collect();
    if left == right {
        return true;
    }

    let left_parts = left.split('-').collect::<Vec<_>>();
    let right_parts = right.split('-').collect::<Vec<_>>();
    if left_parts.len() != right_parts.len() {
        return false;
    }

    left_parts
        .iter()
        .zip(&right_parts)
        .all(|(l, r)| l == r || l.trim_end_matches('0') == r.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::{is_similar, CanonicalRegistry, FieldKind};

    #[test]
    fn similarity_accept_reject_table() {
        let cases = [
            ("579045", "579045", true),
            ("BL16600 -12", "BL16600-12", true),
            ("1606-1", "1606-10", true),
            ("350A33-1526-00", "350A33-1 526-00", true),
            ("1606-1", "16060-10", true),
            ("1606-1", "1607-1", false),
            ("1606-1", "1606-1-1", false),
            ("158210-1", "158210-2", false),
            ("LB4-1231-1", "LB4-1231-10", true),
            ("MET 21.51.10.601", "MET21.51.10.601", true),
            ("MET 21.51.10.601", "MET 21.51.10.602", false),
        ];
        for (left, right, expected) in cases {
            assert_eq!(
                is_similar(left, right),
                expected,
                "similar({left:?}, {right:?})"
            );
        }
    }

    #[test]
    fn fold_returns_existing_entry_for_noisy_variant() {
        let mut registry = CanonicalRegistry::seeded(["350A33-1 526-00"], Vec::<&str>::new());
        let canonical = registry.fold(FieldKind::PartNumber, "350A33-1526-00");
        assert_eq!(canonical, "350A33-1 526-00");
        assert_eq!(registry.len(FieldKind::PartNumber), 1);
    }

    #[test]
    fn fold_learns_new_values_in_order() {
        let mut registry = CanonicalRegistry::new();
        assert_eq!(registry.fold(FieldKind::PartNumber, "2928-2"), "2928-2");
        assert_eq!(registry.fold(FieldKind::PartNumber, "17149-1"), "17149-1");
        assert_eq!(
            registry.entries(FieldKind::PartNumber),
            &["2928-2".to_string(), "17149-1".to_string()]
        );
        assert_eq!(registry.len(FieldKind::Documentation), 0);
    }

    #[test]
    fn fold_is_idempotent() {
        let mut registry = CanonicalRegistry::seeded(["1606-1"], ["MET 21.51.10.601"]);
        for raw in ["1606-10", "1606 -1", "579045", "LS210PS30"] {
            let once = registry.fold(FieldKind::PartNumber, raw);
            let twice = registry.fold(FieldKind::PartNumber, &once);
            assert_eq!(once, twice);
        }
        let doc = registry.fold(FieldKind::Documentation, "MET21.51.10.601");
        assert_eq!(registry.fold(FieldKind::Documentation, &doc), doc);
    }

    #[test]
    fn fold_is_order_sensitive() {
        let mut first = CanonicalRegistry::new();
        first.fold(FieldKind::PartNumber, "1606-1");
        assert_eq!(first.fold(FieldKind::PartNumber, "1606-10"), "1606-1");

        let mut second = CanonicalRegistry::new();
        second.fold(FieldKind::PartNumber, "1606-10");
        assert_eq!(second.fold(FieldKind::PartNumber, "1606-1"), "1606-10");
    }

    #[test]
    fn seeds_are_trimmed_and_deduplicated() {
        let registry =
            CanonicalRegistry::seeded(["LS210PS30", " LS210PS30 ", ""], ["CMM 25.69.87"]);
        assert_eq!(registry.entries(FieldKind::PartNumber), &["LS210PS30".to_string()]);
        assert!(registry.contains(FieldKind::Documentation, "CMM 25.69.87"));
    }
}
