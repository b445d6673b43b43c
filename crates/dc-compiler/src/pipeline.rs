//! End-to-end canonicalization: extract, reduce, sort.
//!
//! Extraction works chunk by chunk and chunks can be processed on separate
//! threads, each producing its own [`ExtractedChunk`]. Reduction and sorting
//! need the complete set, so they only run in [`Canonicalizer::finish`] after
//! every chunk has been merged.

use std::collections::{BTreeMap, HashSet};

use dc_core::{reduce_domains, sort_canonical, Domain, SuffixTable};
use serde::Serialize;

use crate::config::FilterConfig;
use crate::error::CanonError;
use crate::extract::{LineOutcome, RuleExtractor};

/// Counters collected over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonStats {
    /// Lines read.
    pub lines: usize,
    /// Lines that yielded a domain, duplicates included.
    pub accepted: usize,
    /// Skipped lines per reason.
    pub skipped: BTreeMap<&'static str, usize>,
    /// Accepted lines per rule form.
    pub forms: BTreeMap<&'static str, usize>,
    /// Distinct domains after extraction.
    pub unique: usize,
    /// Domains dropped as redundant.
    pub removed: usize,
    /// Domains in the output.
    pub retained: usize,
}

impl CanonStats {
    pub fn merge(&mut self, other: &CanonStats) {
        self.lines += other.lines;
        self.accepted += other.accepted;
        for (reason, count) in &other.skipped {
            *self.skipped.entry(*reason).or_default() += count;
        }
        for (form, count) in &other.forms {
            *self.forms.entry(*form).or_default() += count;
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Domains extracted from one chunk of input.
#[derive(Debug, Clone, Default)]
pub struct ExtractedChunk {
    pub domains: HashSet<Domain>,
    pub stats: CanonStats,
}

impl ExtractedChunk {
    pub fn merge(&mut self, other: ExtractedChunk) {
        self.stats.merge(&other.stats);
        if self.domains.len() < other.domains.len() {
            let mut larger = other.domains;
            larger.extend(self.domains.drain());
            self.domains = larger;
        } else {
            self.domains.extend(other.domains);
        }
    }
}

/// Final output of a run.
#[derive(Debug, Clone)]
pub struct Canonical {
    pub domains: Vec<Domain>,
    pub stats: CanonStats,
}

impl Canonical {
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// One domain per line with a single trailing newline.
    pub fn render(&self) -> String {
        let capacity = self.domains.iter().map(|d| d.as_str().len() + 1).sum();
        let mut out = String::with_capacity(capacity);
        for domain in &self.domains {
            out.push_str(domain.as_str());
            out.push('\n');
        }
        out
    }
}

/// Owns the extractor and suffix table of a run.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    extractor: RuleExtractor,
    suffixes: SuffixTable,
}

impl Canonicalizer {
    pub fn new(filter: FilterConfig, suffixes: SuffixTable) -> Result<Self, CanonError> {
        if suffixes.is_empty() {
            log::warn!("Suffix table is empty; every split falls back to the last label");
        }
        let extractor = RuleExtractor::new(filter)?;
        if extractor.config().is_empty() {
            log::debug!("No filter tables configured; every domain-shaped line is accepted");
        }
        Ok(Self { extractor, suffixes })
    }

    /// Extract every line of one chunk.
    pub fn extract_chunk<I, S>(&self, lines: I) -> ExtractedChunk
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut chunk = ExtractedChunk::default();

        for line in lines {
            let line = line.as_ref();
            chunk.stats.lines += 1;
            match self.extractor.classify(line) {
                LineOutcome::Rule(rule) => {
                    chunk.stats.accepted += 1;
                    *chunk.stats.forms.entry(rule.flags.form_name()).or_default() += 1;
                    chunk.domains.insert(rule.domain);
                }
                LineOutcome::Skipped(reason) => {
                    log::trace!("skip ({}): {}", reason, line);
                    *chunk.stats.skipped.entry(reason.as_str()).or_default() += 1;
                }
            }
        }

        chunk
    }

    /// Reduce (unless `reduce` is false) and sort the merged extraction.
    pub fn finish(&self, chunk: ExtractedChunk, reduce: bool) -> Result<Canonical, CanonError> {
        let ExtractedChunk { domains, mut stats } = chunk;
        stats.unique = domains.len();
        if domains.is_empty() {
            return Err(CanonError::EmptyInput);
        }

        let mut domains: Vec<Domain> = if reduce {
            let (kept, reduce_stats) = reduce_domains(domains);
            stats.removed = reduce_stats.removed;
            kept
        } else {
            domains.into_iter().collect()
        };
        sort_canonical(&self.suffixes, &mut domains);
        stats.retained = domains.len();

        log::debug!(
            "Canonicalized {} lines: {} unique, {} redundant, {} retained",
            stats.lines,
            stats.unique,
            stats.removed,
            stats.retained
        );

        Ok(Canonical { domains, stats })
    }

    /// Run the whole pipeline over in-memory text.
    pub fn canonicalize_text(&self, text: &str, reduce: bool) -> Result<Canonical, CanonError> {
        self.finish(self.extract_chunk(text.lines()), reduce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    const CLASH_LIST: &str = "\
payload:
  # Ads
  - '+.example.com'
  - '+.a.example.com'
  - 'DOMAIN,b.a.example.com'
  - 'DOMAIN-SUFFIX,Other.org'
  - '+.tracker.example.jp'
  - 'IP-CIDR,10.0.0.0/8'
  - '@@keep.example.net'
  - 'mail.example.co.uk'
  - 'z.example.net'
  - 'a.example.net'
";

    fn canonicalizer(preset: Preset) -> Canonicalizer {
        Canonicalizer::new(preset.filter_config(), SuffixTable::builtin()).unwrap()
    }

    fn output(c: &Canonical) -> Vec<&str> {
        c.domains.iter().map(|d| d.as_str()).collect()
    }

    #[test]
    fn test_full_pipeline() {
        let canon = canonicalizer(Preset::Ad);
        let result = canon.canonicalize_text(CLASH_LIST, true).unwrap();
        assert_eq!(
            output(&result),
            ["example.com", "a.example.net", "z.example.net", "other.org"]
        );
        assert_eq!(result.stats.lines, 12);
        assert_eq!(result.stats.accepted, 6);
        assert_eq!(result.stats.unique, 6);
        assert_eq!(result.stats.removed, 2);
        assert_eq!(result.stats.retained, 4);
        assert_eq!(result.stats.skipped["deny-suffix"], 2);
        assert_eq!(result.stats.skipped["deny-keyword"], 2);
        assert_eq!(result.stats.skipped["comment"], 1);
        assert_eq!(result.stats.skipped["exception"], 1);
        assert_eq!(result.stats.forms["wildcard"], 2);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let canon = canonicalizer(Preset::Ad);
        let once = canon.canonicalize_text(CLASH_LIST, true).unwrap().render();
        let twice = canon.canonicalize_text(&once, true).unwrap().render();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dash_prefixed_labels_stay_idempotent() {
        let canon = Canonicalizer::new(FilterConfig::default(), SuffixTable::builtin()).unwrap();
        let once = canon
            .canonicalize_text("- -ads.example.com
- ok.example.com
", true)
            .unwrap();
        assert_eq!(output(&once), ["ok.example.com"]);
        assert_eq!(once.stats.skipped["malformed"], 1);
        let twice = canon.canonicalize_text(&once.render(), true).unwrap();
        assert_eq!(once.render(), twice.render());
    }

    #[test]
    fn test_default_preset_keeps_wildcards() {
        let canon = canonicalizer(Preset::default());
        let result = canon
            .canonicalize_text("*.cdn.example.net
-*.ads.example.org
", true)
            .unwrap();
        assert_eq!(output(&result), ["ads.example.org", "cdn.example.net"]);
        assert_eq!(result.stats.forms["wildcard"], 2);
    }

    #[test]
    fn test_hosts_lines_with_comments() {
        let canon = canonicalizer(Preset::Ad);
        let chunk = canon.extract_chunk(["0.0.0.0 ads.example.com # tracker", "0.0.0.0 ads.example.org"]);
        assert_eq!(chunk.domains.len(), 2);
        assert_eq!(chunk.stats.skipped_total(), 0);
        assert_eq!(chunk.stats.forms["hosts"], 2);
    }

    #[test]
    fn test_keep_subdomains() {
        let canon = canonicalizer(Preset::Ad);
        let result = canon
            .canonicalize_text("a.example.com\nexample.com\nexample.com\n", false)
            .unwrap();
        assert_eq!(output(&result), ["example.com", "a.example.com"]);
        assert_eq!(result.stats.removed, 0);
    }

    #[test]
    fn test_empty_input_is_reported() {
        let canon = canonicalizer(Preset::Ad);
        assert!(matches!(
            canon.canonicalize_text("# only comments\n\n!\n", true),
            Err(CanonError::EmptyInput)
        ));
        assert!(matches!(canon.canonicalize_text("", true), Err(CanonError::EmptyInput)));
    }

    #[test]
    fn test_chunks_merge_like_whole_input() {
        let canon = canonicalizer(Preset::Ad);
        let lines: Vec<&str> = CLASH_LIST.lines().collect();
        let mut merged = ExtractedChunk::default();
        for part in lines.chunks(3) {
            merged.merge(canon.extract_chunk(part));
        }
        let chunked = canon.finish(merged, true).unwrap();
        let whole = canon.canonicalize_text(CLASH_LIST, true).unwrap();
        assert_eq!(chunked.domains, whole.domains);
        assert_eq!(chunked.stats, whole.stats);
    }

    #[test]
    fn test_render() {
        let canon = canonicalizer(Preset::Plain);
        let result = canon.canonicalize_text("b.org\na.org\n", true).unwrap();
        assert_eq!(result.render(), "a.org\nb.org\n");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_custom_suffix_table_changes_grouping() {
        let canon = Canonicalizer::new(FilterConfig::default(), SuffixTable::new()).unwrap();
        let result = canon
            .canonicalize_text("b.example.co.uk\na.example.com\n", true)
            .unwrap();
        // Without a table, "co" is taken as the registrable label of the first.
        assert_eq!(output(&result), ["b.example.co.uk", "a.example.com"]);
    }
}
