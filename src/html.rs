//! Small HTML helpers for emitting asset tags.

use std::borrow::Cow;

const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Escape a value for use inside a double-quoted attribute.
///
/// Borrows when nothing needs escaping, which is the common case for asset URLs.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
  if !value.contains(ESCAPE_CHARS) {
    return Cow::Borrowed(value);
  }

  let mut escaped = String::with_capacity(value.len() + 8);
  for c in value.chars() {
    match c {
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '&' => escaped.push_str("&amp;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      other => escaped.push(other),
    }
  }
  Cow::Owned(escaped)
}

/// Render `name="value"` with the value escaped.
pub fn attr(name: &str, value: &str) -> String {
  format!("{name}=\"{}\"", escape_attr(value))
}
