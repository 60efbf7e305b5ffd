//! Reversible rewriting between locator-relative paths and public URL paths.

mod prefix;

pub use prefix::PrefixTransformer;

use crate::error::Result;

/// Two-way mapping between relative file paths and relative URLs.
///
/// `url_to_path(path_to_url(p))` must give back `p` for every path the transformer accepts.
pub trait PathTransformer: Send + Sync {
  /// Turn a locator-relative path into a relative URL.
  fn path_to_url(&self, relative_path: &str) -> Result<String>;

  /// Turn a relative URL back into the locator-relative path it came from.
  fn url_to_path(&self, relative_url: &str) -> Result<String>;
}
