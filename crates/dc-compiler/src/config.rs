//! Filter tables and built-in presets.
//!
//! The tables are plain string sets. They are lower-cased when a
//! [`RuleExtractor`](crate::extract::RuleExtractor) or
//! [`LineFilter`](crate::filter::LineFilter) is built from them, and all
//! matching is done on lower-case text.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use dc_core::SuffixTable;
use serde::{Deserialize, Serialize};

use crate::error::CanonError;

// =============================================================================
// Filter Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Substring match anywhere in the cleaned line rejects it.
    pub deny_keywords: BTreeSet<String>,
    /// Candidate ending with one of these is rejected.
    pub deny_suffixes: BTreeSet<String>,
    /// Candidate equal to, or a subdomain of, one of these is rejected.
    pub deny_domains: BTreeSet<String>,
    /// Candidate equal to or ending with one of these bypasses the deny
    /// suffix and deny domain checks.
    pub allow: BTreeSet<String>,
}

impl FilterConfig {
    /// Lower-case and trim every entry.
    ///
    /// An empty keyword would reject every line and an empty suffix every
    /// domain, so both are refused.
    pub fn normalized(self) -> Result<Self, CanonError> {
        Ok(Self {
            deny_keywords: normalize_set(self.deny_keywords, "deny_keywords")?,
            deny_suffixes: normalize_set(self.deny_suffixes, "deny_suffixes")?,
            deny_domains: normalize_set(self.deny_domains, "deny_domains")?,
            allow: normalize_set(self.allow, "allow")?,
        })
    }

    pub fn matches_keyword(&self, line: &str) -> bool {
        self.deny_keywords.iter().any(|k| line.contains(k.as_str()))
    }

    pub fn matches_deny_suffix(&self, domain: &str) -> bool {
        self.deny_suffixes.iter().any(|s| domain.ends_with(s.as_str()))
    }

    pub fn matches_deny_domain(&self, domain: &str) -> bool {
        self.deny_domains.iter().any(|d| is_same_or_subdomain(domain, d))
    }

    pub fn is_allowed(&self, domain: &str) -> bool {
        self.allow.iter().any(|a| domain.ends_with(a.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.deny_keywords.is_empty()
            && self.deny_suffixes.is_empty()
            && self.deny_domains.is_empty()
            && self.allow.is_empty()
    }
}

fn normalize_set(set: BTreeSet<String>, field: &str) -> Result<BTreeSet<String>, CanonError> {
    let mut out = BTreeSet::new();
    for entry in set {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() {
            return Err(CanonError::Config(format!("empty entry in {}", field)));
        }
        out.insert(entry);
    }
    Ok(out)
}

fn is_same_or_subdomain(domain: &str, parent: &str) -> bool {
    domain == parent
        || (domain.len() > parent.len()
            && domain.ends_with(parent)
            && domain.as_bytes()[domain.len() - parent.len() - 1] == b'.')
}

// =============================================================================
// Presets
// =============================================================================

/// Keywords shared by every preset: non-domain rule types and list syntax.
const BASE_DENY_KEYWORDS: &[&str] = &[
    "payload:", "rules:", "regexp", "ip-cidr,", "domain-keyword,", "process-name,",
    "ip-suffix,", "geoip,", "geosite,", "#", "!", "/", "【", "】", "[", "]", "$",
];

/// Country-code suffixes dropped from ad lists.
const AD_DENY_SUFFIXES: &[&str] = &[
    // Asia
    ".jp", ".kr", ".in", ".id", ".th", ".sg", ".my", ".ph", ".vn",
    ".pk", ".bd", ".lk", ".np", ".mn", ".uz", ".kz", ".kg", ".bt", ".mv", ".mm",
    // Europe
    ".uk", ".de", ".fr", ".it", ".es", ".ru", ".nl", ".be", ".ch", ".at", ".pl",
    ".cz", ".se", ".no", ".fi", ".dk", ".gr", ".pt", ".ie", ".hu", ".ro", ".bg",
    ".sk", ".si", ".lt", ".lv", ".ee", ".is", ".md", ".ua", ".by", ".am", ".ge",
    // Americas
    ".us", ".ca", ".mx", ".br", ".ar", ".cl", ".co", ".pe", ".ve", ".uy", ".py",
    ".bo", ".ec", ".cr", ".pa", ".do", ".gt", ".sv", ".hn", ".ni", ".jm", ".cu",
    // Africa
    ".za", ".eg", ".ng", ".ke", ".gh", ".tz", ".ug", ".dz", ".ma", ".tn", ".ly",
    ".ci", ".sn", ".zm", ".zw", ".ao", ".mz", ".bw", ".na", ".rw", ".mw", ".sd",
    // Oceania
    ".au", ".nz", ".fj", ".pg", ".sb", ".vu", ".nc", ".pf", ".ws", ".to", ".ki",
    ".tv", ".nr", ".as",
    // Middle East
    ".sa", ".ae", ".ir", ".il", ".iq", ".tr", ".sy", ".jo", ".lb", ".om", ".qa",
    ".ye", ".kw", ".bh",
];

/// Services routed elsewhere and therefore dropped from proxy lists.
const PROXY_DENY_KEYWORDS: &[&str] = &[
    "1drv", "1e100", "abema", "appledaily", "avtb", "beetalk", "blogspot", "dlercloud",
    "dropbox", "facebook", "fbcdn", "gmail", "google", "instagram", "onedrive", "paypal",
    "porn", "sci-hub", "skydrive", "spotify", "telegram", "ttvnw", "twitter", "uk-live",
    "whatsapp", "youtube", "bilibili.com",
];

const PROXY_DENY_SUFFIXES: &[&str] = &["jsdelivr.net", "jsdelivr.com", "outlook.com", "gh-proxy.com"];

/// Built-in filter tables for the common list kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Generic rule list: syntax keywords only.
    #[default]
    Plain,
    /// Ad-block list: syntax keywords plus a country-suffix deny table.
    Ad,
    /// Proxy list: syntax and service keywords plus a CDN deny table.
    Proxy,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Ad => "ad",
            Self::Proxy => "proxy",
        }
    }

    pub fn filter_config(&self) -> FilterConfig {
        let mut keywords = set_of(BASE_DENY_KEYWORDS);
        let deny_suffixes = match self {
            Self::Plain => BTreeSet::new(),
            Self::Ad => set_of(AD_DENY_SUFFIXES),
            Self::Proxy => {
                keywords.extend(set_of(PROXY_DENY_KEYWORDS));
                set_of(PROXY_DENY_SUFFIXES)
            }
        };

        FilterConfig {
            deny_keywords: keywords,
            deny_suffixes,
            ..FilterConfig::default()
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CanonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "ad" => Ok(Self::Ad),
            "proxy" => Ok(Self::Proxy),
            other => Err(CanonError::Config(format!("unknown preset: {}", other))),
        }
    }
}

fn set_of(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Canon Config (config file)
// =============================================================================

/// Run configuration as read from a JSON file.
///
/// ```json
/// { "preset": "ad", "filter": { "allow": ["keep.example.jp"] }, "suffixes": ["com", "co.uk"] }
/// ```
///
/// An explicit `filter` replaces the preset's tables; explicit `suffixes`
/// replace the built-in suffix table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonConfig {
    pub preset: Preset,
    pub filter: Option<FilterConfig>,
    pub suffixes: Option<Vec<String>>,
}

impl CanonConfig {
    pub fn from_json(text: &str) -> Result<Self, CanonError> {
        let config: Self = serde_json::from_str(text)?;
        if let Some(suffixes) = &config.suffixes {
            if let Some(bad) = suffixes
                .iter()
                .find(|s| s.trim().is_empty() || s.contains(char::is_whitespace) || s.contains('*'))
            {
                return Err(CanonError::Config(format!("invalid suffix entry: {:?}", bad)));
            }
        }
        Ok(config)
    }

    pub fn filter_config(&self) -> FilterConfig {
        match &self.filter {
            Some(filter) => filter.clone(),
            None => self.preset.filter_config(),
        }
    }

    pub fn suffix_table(&self) -> SuffixTable {
        match &self.suffixes {
            Some(suffixes) => suffixes.iter().map(String::as_str).collect(),
            None => SuffixTable::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_lowercases() {
        let config = FilterConfig {
            deny_keywords: set_of(&["IP-CIDR,"]),
            allow: set_of(&[" Keep.Example.COM "]),
            ..FilterConfig::default()
        }
        .normalized()
        .unwrap();
        assert!(config.deny_keywords.contains("ip-cidr,"));
        assert!(config.allow.contains("keep.example.com"));
    }

    #[test]
    fn test_normalized_rejects_empty_entry() {
        let config = FilterConfig {
            deny_keywords: set_of(&["  "]),
            ..FilterConfig::default()
        };
        assert!(matches!(config.normalized(), Err(CanonError::Config(_))));
    }

    #[test]
    fn test_deny_domain_is_label_aligned() {
        let config = FilterConfig {
            deny_domains: set_of(&["example.com"]),
            ..FilterConfig::default()
        };
        assert!(config.matches_deny_domain("example.com"));
        assert!(config.matches_deny_domain("ads.example.com"));
        assert!(!config.matches_deny_domain("notexample.com"));
    }

    #[test]
    fn test_preset_tables() {
        let plain = Preset::Plain.filter_config();
        assert_eq!(plain.deny_keywords, set_of(BASE_DENY_KEYWORDS));
        assert!(plain.deny_suffixes.is_empty());
        assert!(!plain.matches_keyword("*.cdn.example.net"));

        let ad = Preset::Ad.filter_config();
        assert!(ad.matches_deny_suffix("ads.example.jp"));
        assert!(!ad.matches_deny_suffix("ads.example.com"));

        let proxy = Preset::Proxy.filter_config();
        assert!(proxy.matches_keyword("www.youtube.com"));
        assert!(proxy.matches_deny_suffix("cdn.jsdelivr.net"));
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("AD".parse::<Preset>().unwrap(), Preset::Ad);
        assert_eq!("proxy".parse::<Preset>().unwrap().to_string(), "proxy");
        assert!("surge".parse::<Preset>().is_err());
    }

    #[test]
    fn test_canon_config_from_json() {
        let config = CanonConfig::from_json(
            r#"{ "preset": "ad", "suffixes": ["com", "co.uk"] }"#,
        )
        .unwrap();
        assert_eq!(config.preset, Preset::Ad);
        assert_eq!(config.filter_config(), Preset::Ad.filter_config());
        let table = config.suffix_table();
        assert_eq!(table.len(), 2);
        assert!(table.contains("co.uk"));
    }

    #[test]
    fn test_canon_config_explicit_filter_replaces_preset() {
        let config = CanonConfig::from_json(
            r#"{ "preset": "proxy", "filter": { "deny_keywords": ["tracker"] } }"#,
        )
        .unwrap();
        let filter = config.filter_config();
        assert_eq!(filter.deny_keywords, set_of(&["tracker"]));
        assert!(filter.deny_suffixes.is_empty());
        assert_eq!(config.suffix_table(), SuffixTable::builtin());
    }

    #[test]
    fn test_canon_config_rejects_bad_input() {
        assert!(matches!(CanonConfig::from_json("{ nope"), Err(CanonError::Json(_))));
        assert!(matches!(
            CanonConfig::from_json(r#"{ "suffixes": ["*.ck"] }"#),
            Err(CanonError::Config(_))
        ));
        assert!(matches!(
            CanonConfig::from_json(r#"{ "unknown": 1 }"#),
            Err(CanonError::Json(_))
        ));
    }
}
