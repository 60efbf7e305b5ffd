use super::AssetUrlBuilder;
use crate::asset_paths::normalize_base_url;
use crate::error::Result;

/// Builds URLs for fingerprinted build output.
///
/// No filesystem check happens: the build that wrote the compiled manifest already
/// produced the files.
#[derive(Debug, Clone)]
pub struct CompiledUrlBuilder {
  base_url: String,
}

impl CompiledUrlBuilder {
  /// Create a builder prefixing every path with `base_url`.
  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: normalize_base_url(base_url),
    }
  }
}

impl AssetUrlBuilder for CompiledUrlBuilder {
  fn asset_url(&self, path: &str, _declared_in: Option<&str>) -> Result<String> {
    Ok(format!("{}{}", self.base_url, path))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn concatenates_without_checking_existence() {
    let builder = CompiledUrlBuilder::new("https://cdn.example.com/dist");
    assert_eq!(
      builder.asset_url("test-930fa5c1ee.js", None).unwrap(),
      "https://cdn.example.com/dist/test-930fa5c1ee.js"
    );
  }
}
