/// Right-trim slashes from a base URL and append exactly one.
pub fn normalize_base_url(base_url: &str) -> String {
  format!("{}/", base_url.trim_end_matches('/'))
}

/// Shape a removal prefix so it always ends on a directory boundary.
///
/// An empty prefix stays empty, which turns stripping into a no-op.
pub fn normalize_remove_prefix(prefix: &str) -> String {
  if prefix.is_empty() {
    return String::new();
  }
  format!("{}/", prefix.trim_end_matches(['/', '\\']))
}

/// Remove `prefix` from the front of `value`, or return `value` unchanged.
///
/// This is a plain string test: `assets2/app.js` loses an `assets` prefix too, so
/// callers pass prefixes ending in `/`.
pub fn strip_prefix_or_self<'a>(value: &'a str, prefix: &str) -> &'a str {
  value.strip_prefix(prefix).unwrap_or(value)
}
