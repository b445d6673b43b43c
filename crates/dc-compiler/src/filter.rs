//! Line filter for lists that are already one domain per line.
//!
//! No rule syntax is parsed here: each trimmed line is kept or dropped as a
//! whole, and allow-listed domains missing from the result are appended.

use std::collections::HashSet;

use crate::config::FilterConfig;
use crate::error::CanonError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub lines: Vec<String>,
    pub dropped: usize,
    pub added: usize,
}

#[derive(Debug, Clone)]
pub struct LineFilter {
    config: FilterConfig,
}

impl LineFilter {
    pub fn new(config: FilterConfig) -> Result<Self, CanonError> {
        Ok(Self {
            config: config.normalized()?,
        })
    }

    /// Drop blank, duplicate and denied lines, then append missing allow
    /// entries in sorted order.
    pub fn filter_lines<I, S>(&self, lines: I) -> FilterOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = FilterOutcome::default();
        let mut seen: HashSet<String> = HashSet::new();

        for raw in lines {
            let line = raw.as_ref().trim();
            if line.is_empty() || seen.contains(line) {
                continue;
            }
            let lower = line.to_lowercase();
            if self.config.matches_deny_domain(&lower)
                || self.config.matches_keyword(&lower)
                || self.config.matches_deny_suffix(&lower)
            {
                out.dropped += 1;
                continue;
            }
            seen.insert(line.to_string());
            out.lines.push(line.to_string());
        }

        // BTreeSet iteration keeps the appended block sorted
        for allowed in &self.config.allow {
            if !seen.contains(allowed.as_str()) {
                out.lines.push(allowed.clone());
                out.added += 1;
            }
        }

        log::debug!(
            "Filtered lines: {} kept, {} dropped, {} added from allow list",
            out.lines.len() - out.added,
            out.dropped,
            out.added
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    #[test]
    fn test_filter_drops_denied_lines() {
        let filter = LineFilter::new(Preset::Ad.filter_config()).unwrap();
        let out = filter.filter_lines(["ads.example.com", "ads.example.jp", "", "ads.example.com"]);
        assert_eq!(out.lines, ["ads.example.com"]);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.added, 0);
    }

    #[test]
    fn test_filter_deny_domains_and_keywords() {
        let mut config = FilterConfig::default();
        config.deny_domains.insert("example.com".to_string());
        config.deny_keywords.insert("bilibili".to_string());
        let filter = LineFilter::new(config).unwrap();
        let out = filter.filter_lines(vec![
            "a.example.com".to_string(),
            "notexample.com".to_string(),
            "www.BiliBili.com".to_string(),
        ]);
        assert_eq!(out.lines, ["notexample.com"]);
        assert_eq!(out.dropped, 2);
    }

    #[test]
    fn test_filter_appends_missing_allow_entries_sorted() {
        let mut config = FilterConfig::default();
        config.allow.insert("z.example.com".to_string());
        config.allow.insert("a.example.com".to_string());
        config.allow.insert("keep.example.org".to_string());
        let filter = LineFilter::new(config).unwrap();
        let out = filter.filter_lines(["keep.example.org", "other.net"]);
        assert_eq!(out.lines, ["keep.example.org", "other.net", "a.example.com", "z.example.com"]);
        assert_eq!(out.added, 2);
    }

    #[test]
    fn test_filter_preserves_case_of_kept_lines() {
        let filter = LineFilter::new(FilterConfig::default()).unwrap();
        let out = filter.filter_lines(["  Mixed.Example.COM  "]);
        assert_eq!(out.lines, ["Mixed.Example.COM"]);
    }
}
