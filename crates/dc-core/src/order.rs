//! Canonical, suffix-ignoring output order
//!
//! Domains are ordered by their registrable label chain, outermost label
//! first, with the public suffix compared only after that chain. Related
//! hosts such as `mail.example.com` and `mail.example.co.uk` therefore end up
//! next to each other in the output.

use std::cmp::Ordering;

use crate::psl::SuffixTable;
use crate::types::Domain;

/// Number of prefix levels that take part in the comparison.
pub const SORT_KEY_LEVELS: usize = 3;

/// Comparison key for one domain.
///
/// Field order is the comparison order: padded prefix levels, then suffix,
/// then the total label count.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    pub levels: [String; SORT_KEY_LEVELS],
    pub suffix: String,
    pub label_count: usize,
}

impl SortKey {
    /// Build the key for `domain` using `table` to find its suffix.
    ///
    /// Prefix labels are reversed so the registrable label comes first, then
    /// right-padded with empty strings. Levels deeper than
    /// [`SORT_KEY_LEVELS`] are ignored by the key only.
    pub fn new(table: &SuffixTable, domain: &str) -> Self {
        let labels: Vec<&str> = domain.trim().split('.').collect();
        if labels.iter().all(|l| l.is_empty()) {
            return Self {
                levels: Default::default(),
                suffix: String::new(),
                label_count: 0,
            };
        }

        let split = table.split(&labels);
        let mut levels: [String; SORT_KEY_LEVELS] = Default::default();
        for (slot, label) in levels.iter_mut().zip(split.prefix.iter().rev()) {
            *slot = (*label).to_string();
        }

        Self {
            levels,
            suffix: split.suffix,
            label_count: labels.len(),
        }
    }
}

/// Compare two domains in canonical order.
pub fn compare_domains(table: &SuffixTable, a: &str, b: &str) -> Ordering {
    SortKey::new(table, a).cmp(&SortKey::new(table, b))
}

/// Sort `domains` in canonical order. Equal keys fall back to the full
/// domain string so the result never depends on input order.
pub fn sort_canonical(table: &SuffixTable, domains: &mut [Domain]) {
    domains.sort_by_cached_key(|d| (SortKey::new(table, d.as_str()), d.clone()));
}
