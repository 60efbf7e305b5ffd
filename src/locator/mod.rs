//! Layered virtual filesystem mapping `scheme://path` stream URIs onto real directories.
//!
//! One scheme can be backed by several roots. Roots registered first take precedence, so
//! a site's own `assets` directory can shadow the same file shipped by a plugin further
//! down the list.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::asset_paths::normalize_uri;

/// A stream URI resolved to a concrete file or directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
  /// Normalised stream URI, e.g. `assets://vendor/lib.js`.
  pub uri: String,
  /// Filesystem path of the match, joined onto the locator base.
  pub path: PathBuf,
  /// Path relative to the locator base, `/`-separated, naming the root that matched.
  pub relative: String,
}

/// Capability to resolve stream URIs to files.
///
/// Implementations must be safe to share between request threads once configured.
pub trait ResourceLocator: Send + Sync {
  /// Resolve `scheme://path` to the first existing match, if any.
  fn find(&self, uri: &str) -> Option<Resource>;

  /// Map a base-relative path back onto the stream it belongs to.
  ///
  /// Used by reverse lookups when URLs are derived from relative paths. Locators that
  /// cannot answer this return `None`.
  fn find_by_relative(&self, _scheme: &str, _relative: &str) -> Option<Resource> {
    None
  }

  /// Absolute filesystem path for a stream URI.
  fn resolve(&self, uri: &str) -> Option<PathBuf> {
    self.find(uri).map(|resource| resource.path)
  }

  /// Root-relative path for a stream URI.
  fn resolve_relative(&self, uri: &str) -> Option<String> {
    self.find(uri).map(|resource| resource.relative)
  }
}

#[derive(Debug, Clone)]
struct Mount {
  prefix: String,
  roots: Vec<String>,
}

impl Mount {
  /// Remainder of `path` below this mount's prefix, if the prefix covers it.
  fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
    if self.prefix.is_empty() {
      return Some(path);
    }
    match path.strip_prefix(self.prefix.as_str()) {
      Some("") => Some(""),
      Some(rest) => rest.strip_prefix('/'),
      None => None,
    }
  }
}

/// Filesystem-backed [`ResourceLocator`] with prefix mounts per scheme.
#[derive(Debug, Clone)]
pub struct UniformLocator {
  base: PathBuf,
  schemes: BTreeMap<String, Vec<Mount>>,
}

impl UniformLocator {
  /// Create a locator whose roots are relative to `base`.
  pub fn new(base: impl Into<PathBuf>) -> Self {
    Self {
      base: base.into(),
      schemes: BTreeMap::new(),
    }
  }

  /// Directory that all roots are relative to.
  pub fn base(&self) -> &Path {
    &self.base
  }

  /// Register one root for `scheme://prefix`.
  ///
  /// Roots added earlier win over roots added later under the same prefix.
  pub fn add_path(&mut self, scheme: &str, prefix: &str, root: impl AsRef<str>) -> &mut Self {
    let prefix = prefix.trim_matches('/').to_string();
    let root = clean_root(root.as_ref());
    let mounts = self.schemes.entry(scheme.to_string()).or_default();

    match mounts.iter_mut().find(|mount| mount.prefix == prefix) {
      Some(mount) => mount.roots.push(root),
      None => {
        mounts.push(Mount {
          prefix,
          roots: vec![root],
        });
        mounts.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
      }
    }

    self
  }

  /// Register several roots for `scheme://prefix`, in precedence order.
  pub fn add_paths<I, S>(&mut self, scheme: &str, prefix: &str, roots: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for root in roots {
      self.add_path(scheme, prefix, root);
    }
    self
  }

  /// Whether any root is registered for `scheme`.
  pub fn is_scheme(&self, scheme: &str) -> bool {
    self.schemes.contains_key(scheme)
  }

  fn resource(&self, scheme: &str, path: &str, relative: String) -> Resource {
    Resource {
      uri: format!("{scheme}://{path}"),
      path: self.base.join(&relative),
      relative,
    }
  }
}

impl ResourceLocator for UniformLocator {
  fn find(&self, uri: &str) -> Option<Resource> {
    let (scheme, path) = uri.split_once("://")?;
    let Some(mounts) = self.schemes.get(scheme) else {
      debug!(uri, "no roots registered for scheme");
      return None;
    };

    let Some(path) = normalize_uri(path) else {
      debug!(uri, "stream path escapes its root");
      return None;
    };
    let path = path.trim_start_matches('/');

    for mount in mounts {
      let Some(rest) = mount.remainder(path) else {
        continue;
      };
      for root in &mount.roots {
        let relative = join_relative(root, rest);
        if self.base.join(&relative).exists() {
          debug!(uri, relative = %relative, "resolved stream uri");
          return Some(self.resource(scheme, path, relative));
        }
      }
    }

    debug!(uri, "stream uri not found in any root");
    None
  }

  fn find_by_relative(&self, scheme: &str, relative: &str) -> Option<Resource> {
    let mounts = self.schemes.get(scheme)?;
    let relative = normalize_uri(relative)?;
    let relative = relative.trim_start_matches('/');

    for mount in mounts {
      for root in &mount.roots {
        let rest = if root.is_empty() {
          Some(relative)
        } else {
          match relative.strip_prefix(root.as_str()) {
            Some("") => Some(""),
            Some(rest) => rest.strip_prefix('/'),
            None => None,
          }
        };
        let Some(rest) = rest else {
          continue;
        };
        if !self.base.join(relative).exists() {
          continue;
        }
        let path = join_relative(&mount.prefix, rest);
        return Some(self.resource(scheme, &path, relative.to_string()));
      }
    }

    None
  }
}

fn clean_root(root: &str) -> String {
  root.replace('\\', "/").trim_matches('/').to_string()
}

fn join_relative(left: &str, right: &str) -> String {
  match (left.is_empty(), right.is_empty()) {
    (true, _) => right.to_string(),
    (false, true) => left.to_string(),
    (false, false) => format!("{left}/{right}"),
  }
}
