/// Collapse `.` and `..` segments and unify separators in a path or stream URI.
///
/// Returns `None` when a `..` segment would climb above the start of the path, which is
/// what keeps request paths from escaping a locator root. A `scheme://` prefix is kept
/// aside and re-attached; a leading or trailing `/` survives normalisation.
pub fn normalize_uri(uri: &str) -> Option<String> {
  let (scheme, path) = match uri.find("://") {
    Some(index) => uri.split_at(index + 3),
    None => ("", uri),
  };

  let path = path.replace('\\', "/");
  let absolute = path.starts_with('/');
  let trailing = path.len() > 1 && path.ends_with('/');

  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => continue,
      ".." => {
        segments.pop()?;
      }
      other => segments.push(other),
    }
  }

  let mut normalized = String::with_capacity(uri.len());
  normalized.push_str(scheme);
  if absolute {
    normalized.push('/');
  }
  normalized.push_str(&segments.join("/"));
  if trailing && !segments.is_empty() {
    normalized.push('/');
  }

  Some(normalized)
}
