//! Line cleaning ahead of rule extraction.

use std::net::IpAddr;

/// Rule-syntax noise removed from every line (quotes and adblock anchors).
pub const NOISE_CHARS: &[char] = &['"', '\'', '|', '^'];

/// Strip whitespace and [`NOISE_CHARS`] and lower-case the rest.
///
/// Never fails; an empty result means the line carries no domain.
pub fn clean_line(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !NOISE_CHARS.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Comment syntax of the supported list formats (YAML, ABP, INI-style headers).
pub fn is_comment(cleaned: &str) -> bool {
    cleaned.starts_with('#')
        || cleaned.starts_with('!')
        || cleaned.starts_with('[')
        || cleaned.starts_with("//")
}

/// Exception (allow) rules are never turned into domains.
pub fn is_exception(cleaned: &str) -> bool {
    cleaned.contains("@@")
}

fn starts_with_address(raw: &str) -> bool {
    raw.split_whitespace()
        .next()
        .map_or(false, |first| first.parse::<IpAddr>().is_ok())
}

/// Drop a trailing `# ...` comment from a hosts-file line. Other lines are
/// returned unchanged.
pub fn strip_hosts_comment(raw: &str) -> &str {
    if !starts_with_address(raw) {
        return raw;
    }
    match raw.find('#') {
        Some(pos) => &raw[..pos],
        None => raw,
    }
}

/// Cleaned host field of a hosts-file line such as `0.0.0.0 ads.example.com`.
pub fn hosts_entry(raw: &str) -> Option<String> {
    if !starts_with_address(raw) {
        return None;
    }
    raw.split_whitespace().nth(1).map(clean_line)
}
