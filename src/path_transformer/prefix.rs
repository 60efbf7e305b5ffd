use super::PathTransformer;
use crate::asset_paths::strip_prefix_or_self;
use crate::error::{AssetError, Result};

/// Ordered table of `path prefix <-> url prefix` pairs.
///
/// Both sides are kept unique so every rewrite can be undone. Matching is a literal
/// string-prefix test in registration order; prefixes should end in `/` when they are
/// meant to cover whole directories.
#[derive(Debug, Clone, Default)]
pub struct PrefixTransformer {
  definitions: Vec<(String, String)>,
}

impl PrefixTransformer {
  /// Create an empty transformer.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a reversible prefix pair.
  ///
  /// Fails when either prefix already appears on its side of another pair.
  pub fn define(&mut self, path_prefix: impl Into<String>, url_prefix: impl Into<String>) -> Result<()> {
    let path_prefix = path_prefix.into();
    let url_prefix = url_prefix.into();

    if self.definitions.iter().any(|(path, _)| *path == path_prefix) {
      return Err(AssetError::InvalidArgument(format!(
        "irreversible prefix transformation detected: path prefix '{path_prefix}' already has a transformation definition"
      )));
    }
    if self.definitions.iter().any(|(_, url)| *url == url_prefix) {
      return Err(AssetError::InvalidArgument(format!(
        "irreversible prefix transformation detected: URL prefix '{url_prefix}' already has a transformation definition"
      )));
    }

    self.definitions.push((path_prefix, url_prefix));
    Ok(())
  }

  /// Registered pairs in matching order.
  pub fn definitions(&self) -> &[(String, String)] {
    &self.definitions
  }

  fn transformation(&self, subject: &str, from_path: bool) -> Result<&(String, String)> {
    self
      .definitions
      .iter()
      .find(|(path, url)| {
        let prefix = if from_path { path } else { url };
        subject.starts_with(prefix.as_str())
      })
      .ok_or_else(|| AssetError::NoTransformation {
        subject: subject.to_string(),
      })
  }
}

impl PathTransformer for PrefixTransformer {
  fn path_to_url(&self, relative_path: &str) -> Result<String> {
    let (path, url) = self.transformation(relative_path, true)?;
    Ok(format!("{url}{}", strip_prefix_or_self(relative_path, path)))
  }

  fn url_to_path(&self, relative_url: &str) -> Result<String> {
    let (path, url) = self.transformation(relative_url, false)?;
    Ok(format!("{path}{}", strip_prefix_or_self(relative_url, url)))
  }
}
