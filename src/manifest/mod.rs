//! Parsers for gulp-bundle-assets manifests and the bundle index they produce.
//!
//! Two manifest shapes exist. The raw `bundle.config.json` lists source files per bundle
//! under a top-level `bundle` key; the compiled `bundle.result.json` maps each bundle name
//! straight to its single fingerprinted output. Both are read into [`GulpBundles`], a
//! name-indexed list of paths per asset type, and are exposed to the facade through the
//! [`AssetBundles`] trait.

mod compiled;
mod document;
mod one_or_many;
mod raw;

use std::collections::BTreeMap;

pub use compiled::GulpCompiledBundles;
pub use document::{ManifestKind, bundle_definitions, json_type_name, read_manifest};
pub use one_or_many::OneOrMany;
pub use raw::GulpRawBundles;

use crate::error::{AssetError, AssetKind, Result};

/// A source of bundle definitions the facade can aggregate.
pub trait AssetBundles: Send + Sync {
  /// Stylesheet paths of `name`, or [`AssetError::BundleNotFound`].
  fn css_bundle_assets(&self, name: &str) -> Result<&[String]>;

  /// Script paths of `name`, or [`AssetError::BundleNotFound`].
  fn js_bundle_assets(&self, name: &str) -> Result<&[String]>;
}

/// Bundle index shared by both manifest shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GulpBundles {
  css_bundles: BTreeMap<String, Vec<String>>,
  js_bundles: BTreeMap<String, Vec<String>>,
}

impl GulpBundles {
  /// Stylesheet lists keyed by bundle name.
  pub fn css_bundles(&self) -> &BTreeMap<String, Vec<String>> {
    &self.css_bundles
  }

  /// Script lists keyed by bundle name.
  pub fn js_bundles(&self) -> &BTreeMap<String, Vec<String>> {
    &self.js_bundles
  }

  /// Every bundle name defined for either asset type, sorted and deduplicated.
  pub fn bundle_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self
      .css_bundles
      .keys()
      .chain(self.js_bundles.keys())
      .map(String::as_str)
      .collect();
    names.sort_unstable();
    names.dedup();
    names
  }

  fn bundles_mut(&mut self, kind: AssetKind) -> &mut BTreeMap<String, Vec<String>> {
    match kind {
      AssetKind::Css => &mut self.css_bundles,
      AssetKind::Js => &mut self.js_bundles,
    }
  }
}

impl AssetBundles for GulpBundles {
  fn css_bundle_assets(&self, name: &str) -> Result<&[String]> {
    lookup(&self.css_bundles, AssetKind::Css, name)
  }

  fn js_bundle_assets(&self, name: &str) -> Result<&[String]> {
    lookup(&self.js_bundles, AssetKind::Js, name)
  }
}

fn lookup<'a>(
  bundles: &'a BTreeMap<String, Vec<String>>,
  kind: AssetKind,
  name: &str,
) -> Result<&'a [String]> {
  bundles
    .get(name)
    .map(Vec::as_slice)
    .ok_or_else(|| AssetError::BundleNotFound {
      kind,
      name: name.to_string(),
    })
}

/// Field names used by both manifest shapes, paired with the list they feed.
pub(crate) const ASSET_FIELDS: [(&str, AssetKind); 2] =
  [("styles", AssetKind::Css), ("scripts", AssetKind::Js)];
