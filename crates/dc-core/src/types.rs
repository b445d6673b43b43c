//! Core type definitions for domcanon
//!
//! A [`Domain`] is the unit every stage of the pipeline works on: extraction
//! produces them, reduction drops them and ordering sorts them. Values are
//! immutable once built.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Domain
// =============================================================================

/// Error returned when a string does not satisfy the domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Empty domain")]
    Empty,
    #[error("Empty label in domain: {0}")]
    EmptyLabel(String),
    #[error("Label starts with '-' in domain: {0}")]
    LeadingHyphen(String),
}

/// A lower-case, dot-separated sequence of non-empty labels.
///
/// There are no leading, trailing or doubled dots and no label starts with
/// `-`. Labels are otherwise opaque, so punycode (`xn--...`) passes through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Domain(String);

impl Domain {
    /// Parse and lower-case a domain.
    ///
    /// ```
    /// use dc_core::Domain;
    ///
    /// let d = Domain::parse("Ads.Example.COM").unwrap();
    /// assert_eq!(d.as_str(), "ads.example.com");
    /// assert!(Domain::parse("a..example.com").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.is_empty() {
            return Err(DomainError::Empty);
        }
        if s.split('.').any(str::is_empty) {
            return Err(DomainError::EmptyLabel(s.to_string()));
        }
        if s.split('.').any(|label| label.starts_with('-')) {
            return Err(DomainError::LeadingHyphen(s.to_string()));
        }
        Ok(Self(s.to_lowercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Labels from left (most specific) to right (top-level).
    pub fn labels(&self) -> std::str::Split<'_, char> {
        self.0.split('.')
    }

    pub fn label_count(&self) -> usize {
        self.0.bytes().filter(|&b| b == b'.').count() + 1
    }

    /// True if `self` is a strict, label-aligned subdomain of `other`.
    pub fn is_subdomain_of(&self, other: &Domain) -> bool {
        let (s, o) = (self.as_str(), other.as_str());
        s.len() > o.len() + 1
            && s.ends_with(o)
            && s.as_bytes()[s.len() - o.len() - 1] == b'.'
    }

    /// True if a suffix rule for `self` matches `other`.
    #[inline]
    pub fn covers(&self, other: &Domain) -> bool {
        self == other || other.is_subdomain_of(self)
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Domain {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Rule Flags (source form of an extracted rule)
// =============================================================================

bitflags::bitflags! {
    /// Which rule dialect a domain was extracted from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RuleFlags: u8 {
        /// `DOMAIN,` exact-match rule
        const EXACT = 1 << 0;
        /// `DOMAIN-SUFFIX,` rule
        const SUFFIX = 1 << 1;
        /// `+.` or `*.` wildcard
        const WILDCARD = 1 << 2;
        /// Bare leading `.`
        const LEADING_DOT = 1 << 3;
        /// Plain domain with no dialect prefix
        const BARE = 1 << 4;
        /// Hosts-file line (`0.0.0.0 host`)
        const HOSTS = 1 << 5;
        /// `-` prefixed form (YAML payload list item)
        const LIST_ITEM = 1 << 6;
    }
}

impl RuleFlags {
    /// Short name of the primary form, ignoring `LIST_ITEM`.
    pub fn form_name(&self) -> &'static str {
        let form = *self - Self::LIST_ITEM;
        if form.contains(Self::EXACT) {
            "exact"
        } else if form.contains(Self::SUFFIX) {
            "suffix"
        } else if form.contains(Self::WILDCARD) {
            "wildcard"
        } else if form.contains(Self::LEADING_DOT) {
            "leading-dot"
        } else if form.contains(Self::HOSTS) {
            "hosts"
        } else {
            "bare"
        }
    }
}
