use std::sync::Arc;

use tracing::debug;

use super::AssetUrlBuilder;
use crate::asset_paths::{normalize_base_url, normalize_remove_prefix, strip_prefix_or_self};
use crate::error::{AssetError, Result};
use crate::locator::ResourceLocator;

/// Builds URLs for raw assets by checking that the file exists in a locator root.
///
/// The URL is made of the base URL plus the root-relative path the locator found, so the
/// root that satisfied the lookup shows up in the URL unless `remove_prefix` strips it.
#[derive(Clone)]
pub struct LocatorUrlBuilder {
  locator: Arc<dyn ResourceLocator>,
  base_url: String,
  remove_prefix: String,
  scheme: String,
}

impl LocatorUrlBuilder {
  /// Default stream scheme assets are looked up under.
  pub const DEFAULT_SCHEME: &'static str = "assets";

  /// Create a builder.
  ///
  /// `base_url` is right-trimmed and given a single trailing slash; a non-empty
  /// `remove_prefix` is shaped to end with one slash.
  pub fn new(
    locator: Arc<dyn ResourceLocator>,
    base_url: &str,
    remove_prefix: &str,
    scheme: &str,
  ) -> Self {
    Self {
      locator,
      base_url: normalize_base_url(base_url),
      remove_prefix: normalize_remove_prefix(remove_prefix),
      scheme: scheme.to_string(),
    }
  }

  /// Builder using [`Self::DEFAULT_SCHEME`] with no prefix removal.
  pub fn with_defaults(locator: Arc<dyn ResourceLocator>, base_url: &str) -> Self {
    Self::new(locator, base_url, "", Self::DEFAULT_SCHEME)
  }

  /// Normalised base URL.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}

impl AssetUrlBuilder for LocatorUrlBuilder {
  fn asset_url(&self, path: &str, declared_in: Option<&str>) -> Result<String> {
    let uri = format!("{}://{}", self.scheme, path);
    let relative = self
      .locator
      .resolve_relative(&uri)
      .ok_or_else(|| AssetError::AssetNotFound {
        path: path.to_string(),
        declared_in: declared_in.map(str::to_string),
      })?;

    if !self.remove_prefix.is_empty() {
      debug!(prefix = %self.remove_prefix, relative = %relative, "stripping prefix from asset path");
    }
    let relative = strip_prefix_or_self(&relative, &self.remove_prefix);

    Ok(format!("{}{}", self.base_url, relative))
  }
}
