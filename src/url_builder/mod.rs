//! Turning bundle-relative asset paths into absolute URLs.

mod compiled;
mod locator;

pub use compiled::CompiledUrlBuilder;
pub use locator::LocatorUrlBuilder;

use crate::error::Result;

/// Produces the public URL of one asset.
pub trait AssetUrlBuilder: Send + Sync {
  /// URL for `path`; `declared_in` names the manifest entry for error messages.
  fn asset_url(&self, path: &str, declared_in: Option<&str>) -> Result<String>;
}
