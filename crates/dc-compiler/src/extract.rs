//! Rule extraction: one cleaned line in, at most one domain out.
//!
//! Supported forms, tried in table order:
//!
//! | Form | Example |
//! |------|---------|
//! | Exact rule | `DOMAIN,example.com` |
//! | Suffix rule | `DOMAIN-SUFFIX,example.com,REJECT` |
//! | Wildcard | `+.example.com`, `*.example.com` |
//! | Leading dot | `.example.com` |
//! | List item | `- '+.example.com'` (any of the above behind `-`) |
//! | Hosts file | `0.0.0.0 example.com` |
//! | Bare domain | `example.com`, `||example.com^` |

use std::fmt;
use std::net::IpAddr;

use dc_core::{Domain, RuleFlags};

use crate::config::FilterConfig;
use crate::error::CanonError;
use crate::normalize::{clean_line, hosts_entry, is_comment, is_exception, strip_hosts_comment};

// =============================================================================
// Rule Prefix Table
// =============================================================================

/// A dialect prefix and how many bytes to strip when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulePrefix {
    pub pattern: &'static str,
    pub strip: usize,
    pub flags: RuleFlags,
}

const fn prefix(pattern: &'static str, flags: RuleFlags) -> RulePrefix {
    RulePrefix {
        pattern,
        strip: pattern.len(),
        flags,
    }
}

const LIST_EXACT: RuleFlags = RuleFlags::EXACT.union(RuleFlags::LIST_ITEM);
const LIST_SUFFIX: RuleFlags = RuleFlags::SUFFIX.union(RuleFlags::LIST_ITEM);
const LIST_WILDCARD: RuleFlags = RuleFlags::WILDCARD.union(RuleFlags::LIST_ITEM);
const LIST_LEADING_DOT: RuleFlags = RuleFlags::LEADING_DOT.union(RuleFlags::LIST_ITEM);
const LIST_BARE: RuleFlags = RuleFlags::BARE.union(RuleFlags::LIST_ITEM);

/// Prefixes in priority order; the first match wins. Patterns are lower-case
/// because lines are lower-cased before matching.
pub const RULE_PREFIXES: &[RulePrefix] = &[
    prefix("domain,", RuleFlags::EXACT),
    prefix("domain-suffix,", RuleFlags::SUFFIX),
    prefix("+.", RuleFlags::WILDCARD),
    prefix("*.", RuleFlags::WILDCARD),
    prefix(".", RuleFlags::LEADING_DOT),
    prefix("-domain,", LIST_EXACT),
    prefix("-domain-suffix,", LIST_SUFFIX),
    prefix("-+.", LIST_WILDCARD),
    prefix("-*.", LIST_WILDCARD),
    prefix("-.", LIST_LEADING_DOT),
    // DNS labels never start with '-', so a lone dash is list syntax
    prefix("-", LIST_BARE),
];

/// Strip the first matching dialect prefix. Trailing rule fields after a
/// `,` (policy names, `no-resolve`) are dropped as well.
pub fn strip_rule_prefix(line: &str) -> Option<(&str, RuleFlags)> {
    let rule = RULE_PREFIXES.iter().find(|p| line.starts_with(p.pattern))?;
    let rest = &line[rule.strip..];
    let rest = rest.split(',').next().unwrap_or(rest);
    Some((rest, rule.flags))
}

// =============================================================================
// Extraction Outcome
// =============================================================================

/// Why a line produced no domain. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    Empty,
    Comment,
    Exception,
    DenyKeyword,
    NotDomain,
    Malformed,
    DenyDomain,
    DenySuffix,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Comment => "comment",
            Self::Exception => "exception",
            Self::DenyKeyword => "deny-keyword",
            Self::NotDomain => "not-domain",
            Self::Malformed => "malformed",
            Self::DenyDomain => "deny-domain",
            Self::DenySuffix => "deny-suffix",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRule {
    pub domain: Domain,
    pub flags: RuleFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Rule(ExtractedRule),
    Skipped(SkipReason),
}

// =============================================================================
// Rule Extractor
// =============================================================================

/// Turns raw lines into domains according to a [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    config: FilterConfig,
}

impl RuleExtractor {
    pub fn new(config: FilterConfig) -> Result<Self, CanonError> {
        Ok(Self {
            config: config.normalized()?,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Extract the domain of `raw`, if it has one.
    pub fn extract(&self, raw: &str) -> Option<Domain> {
        match self.classify(raw) {
            LineOutcome::Rule(rule) => Some(rule.domain),
            LineOutcome::Skipped(_) => None,
        }
    }

    /// Extract the domain of `raw` together with its rule form, or say why
    /// there is none.
    pub fn classify(&self, raw: &str) -> LineOutcome {
        let raw = strip_hosts_comment(raw);
        let line = clean_line(raw);
        if line.is_empty() {
            return LineOutcome::Skipped(SkipReason::Empty);
        }
        if is_comment(&line) {
            return LineOutcome::Skipped(SkipReason::Comment);
        }
        if is_exception(&line) {
            return LineOutcome::Skipped(SkipReason::Exception);
        }
        if self.config.matches_keyword(&line) {
            return LineOutcome::Skipped(SkipReason::DenyKeyword);
        }

        let hosts = hosts_entry(raw);
        let (candidate, flags) = if let Some(host) = hosts.as_deref() {
            if host.parse::<IpAddr>().is_ok() {
                return LineOutcome::Skipped(SkipReason::NotDomain);
            }
            (host, RuleFlags::HOSTS)
        } else if let Some((rest, flags)) = strip_rule_prefix(&line) {
            (rest, flags)
        } else if line.contains('.') {
            (line.as_str(), RuleFlags::BARE)
        } else {
            return LineOutcome::Skipped(SkipReason::NotDomain);
        };

        let candidate = candidate.trim_matches('.');
        if candidate.is_empty() || !candidate.contains('.') || candidate.contains('*') {
            return LineOutcome::Skipped(SkipReason::NotDomain);
        }

        let domain = match Domain::parse(candidate) {
            Ok(domain) => domain,
            Err(_) => return LineOutcome::Skipped(SkipReason::Malformed),
        };

        if !self.config.is_allowed(domain.as_str()) {
            if self.config.matches_deny_domain(domain.as_str()) {
                return LineOutcome::Skipped(SkipReason::DenyDomain);
            }
            if self.config.matches_deny_suffix(domain.as_str()) {
                return LineOutcome::Skipped(SkipReason::DenySuffix);
            }
        }

        LineOutcome::Rule(ExtractedRule { domain, flags })
    }
}
