//! Public suffix table and longest-match suffix splitting
//!
//! This is a fixed, hand-maintained table rather than the full Public Suffix
//! List. A table is an ordinary value: build it once and pass it to whatever
//! needs to split domains.
//!
//! # Examples
//!
//! ```
//! use dc_core::psl::SuffixTable;
//!
//! let table = SuffixTable::builtin();
//! let split = table.split(&["mail", "example", "com", "cn"]);
//! assert_eq!(split.prefix, ["mail", "example"]);
//! assert_eq!(split.suffix, "com.cn");
//! ```

use std::collections::HashSet;

/// Longest suffix, in labels, that is ever looked up.
pub const MAX_SUFFIX_LABELS: usize = 4;

// =============================================================================
// Built-in Suffixes
// =============================================================================

/// Generic and country-code suffixes plus the common multi-level ones.
pub const BUILTIN_SUFFIXES: &[&str] = &[
    // Generic
    "com", "org", "net", "edu", "gov", "mil", "int", "biz", "info", "name", "pro", "coop",
    "aero", "museum", "idv", "xyz", "top", "site", "online", "club", "shop", "app", "io",
    "dev", "art", "inc", "vip", "store", "tech", "blog", "wiki", "link", "live", "news",
    "run", "fun", "cloud", "one", "world", "group", "life", "today", "agency", "company",
    "center", "team", "email", "solutions", "network", "systems", "media", "digital",
    "works", "design", "finance", "plus", "studio",
    // Country and region
    "cn", "us", "uk", "jp", "de", "fr", "ru", "au", "ca", "br", "it", "es", "nl", "se", "ch",
    "no", "fi", "be", "at", "dk", "pl", "hk", "tw", "kr", "in", "sg", "cz", "il", "ie", "tr",
    "za", "mx", "cl", "ar", "nz", "gr", "hu", "pt", "ro", "bg", "sk", "si", "lt", "lv", "ee",
    "hr", "rs", "ua", "by", "kz", "ge", "md", "ba", "al", "me", "is", "lu", "li", "mt", "cy",
    "mc", "sm", "ad", "va",
    // China
    "com.cn", "net.cn", "gov.cn", "org.cn", "edu.cn", "ac.cn", "bj.cn", "sh.cn", "tj.cn",
    "cq.cn", "he.cn", "nm.cn", "ln.cn", "jl.cn", "hl.cn", "js.cn", "zj.cn", "ah.cn", "fj.cn",
    "jx.cn", "sd.cn", "ha.cn", "hb.cn", "hn.cn", "gd.cn", "gx.cn", "hi.cn", "sc.cn", "gz.cn",
    "yn.cn", "xz.cn", "sn.cn", "gs.cn", "qh.cn", "nx.cn", "xj.cn",
    // Commonwealth and others
    "co.uk", "org.uk", "gov.uk", "ac.uk", "sch.uk",
    "com.au", "net.au", "org.au", "edu.au", "gov.au", "asn.au", "id.au",
    "co.jp", "ne.jp", "or.jp", "go.jp", "ac.jp", "ed.jp", "gr.jp", "lg.jp",
    "com.hk", "net.hk", "org.hk", "idv.hk", "gov.hk", "edu.hk",
    "co.nz", "ac.nz", "geek.nz", "maori.nz", "net.nz", "org.nz", "school.nz", "govt.nz",
    // IDN
    "xn--fiqs8s", "xn--fiqz9s", "xn--55qx5d", "xn--io0a7i",
];

// =============================================================================
// Suffix Table
// =============================================================================

/// Set of known public suffixes, stored lower-case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixTable {
    entries: HashSet<String>,
}

/// Result of splitting a label sequence at its public suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixSplit<'a> {
    /// Labels left of the suffix, most specific first.
    pub prefix: &'a [&'a str],
    /// The matched suffix, lower-case and dot-joined.
    pub suffix: String,
}

impl SuffixTable {
    /// Create an empty table. Every split then falls back to the last label.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of [`BUILTIN_SUFFIXES`].
    pub fn builtin() -> Self {
        BUILTIN_SUFFIXES.iter().copied().collect()
    }

    /// Parse a PSL-style text file: one suffix per line.
    ///
    /// Blank lines and `//` comments are ignored. Wildcard (`*.`) and
    /// exception (`!`) rules are skipped.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        let mut skipped = 0usize;

        for raw_line in text.lines() {
            let line = raw_line.split_whitespace().next().unwrap_or("");
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if line.starts_with('!') || line.contains('*') {
                skipped += 1;
                continue;
            }
            table.insert(line);
        }

        log::debug!(
            "Parsed suffix table: {} entries, {} wildcard/exception rules skipped",
            table.len(),
            skipped
        );
        table
    }

    pub fn insert(&mut self, suffix: &str) {
        let suffix = suffix.trim().trim_matches('.');
        if !suffix.is_empty() {
            self.entries.insert(suffix.to_lowercase());
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, suffix: &str) -> bool {
        if suffix.bytes().any(|b| b.is_ascii_uppercase()) {
            self.entries.contains(&suffix.to_ascii_lowercase())
        } else {
            self.entries.contains(suffix)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split `labels` into (registrable prefix, suffix).
    ///
    /// Tries the trailing 4, 3, 2 and 1 labels in that order and takes the
    /// first one present in the table, so `com.cn` wins over `cn`. With no
    /// match the last label is taken as the suffix. A single label yields an
    /// empty prefix and the label itself as suffix.
    pub fn split<'a>(&self, labels: &'a [&'a str]) -> SuffixSplit<'a> {
        let n = labels.len();
        for i in (1..=MAX_SUFFIX_LABELS.min(n)).rev() {
            let candidate = labels[n - i..].join(".");
            if self.contains(&candidate) {
                return SuffixSplit {
                    prefix: &labels[..n - i],
                    suffix: candidate.to_lowercase(),
                };
            }
        }

        match labels.split_last() {
            Some((last, rest)) => SuffixSplit {
                prefix: rest,
                suffix: last.to_lowercase(),
            },
            None => SuffixSplit {
                prefix: labels,
                suffix: String::new(),
            },
        }
    }

    /// Registrable domain (suffix plus one label), if the host has one.
    pub fn registrable_domain(&self, host: &str) -> Option<String> {
        let labels: Vec<&str> = host.split('.').collect();
        let split = self.split(&labels);
        let owner = split.prefix.last()?;
        Some(format!("{}.{}", owner.to_lowercase(), split.suffix))
    }
}

impl<'s> FromIterator<&'s str> for SuffixTable {
    fn from_iter<I: IntoIterator<Item = &'s str>>(iter: I) -> Self {
        let mut table = Self::new();
        for suffix in iter {
            table.insert(suffix);
        }
        table
    }
}

impl FromIterator<String> for SuffixTable {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut table = Self::new();
        for suffix in iter {
            table.insert(&suffix);
        }
        table
    }
}
