use std::sync::OnceLock;

use regex::Regex;

fn external_url() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"))
}

fn query_string() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"\?.*").expect("invalid query string regex"))
}

/// Whether a stream path is already an absolute web URL that needs no resolution.
///
/// Templates mix CDN links with stream URIs, so `http://` and `https://` references are
/// handed back untouched instead of being looked up on disk.
pub fn is_external_url(value: &str) -> bool {
  external_url().is_match(value)
}

/// Drop everything from the first `?` onwards.
pub fn strip_query(value: &str) -> String {
  query_string().replace(value, "").into_owned()
}
