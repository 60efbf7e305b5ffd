use std::ops::Deref;
use std::path::Path;

use tracing::info;

use super::{ASSET_FIELDS, AssetBundles, GulpBundles, ManifestKind, bundle_definitions, json_type_name, read_manifest};
use crate::error::{AssetError, Result};

/// Bundles read from a compiled `bundle.result.json`.
///
/// Every bundle maps to at most one fingerprinted file per asset type, so `styles` and
/// `scripts` must be plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GulpCompiledBundles {
  bundles: GulpBundles,
}

impl GulpCompiledBundles {
  /// Parse the manifest at `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let document = read_manifest(path)?;
    let mut bundles = GulpBundles::default();

    for (name, definition) in bundle_definitions(&document, ManifestKind::Compiled, path)? {
      for (field, kind) in ASSET_FIELDS {
        let Some(value) = definition.get(field).filter(|value| !value.is_null()) else {
          continue;
        };
        let Some(file) = value.as_str() else {
          return Err(AssetError::InvalidBundlesFile {
            path: path.to_path_buf(),
            bundle: name.to_string(),
            field,
            expected: "a string",
            actual: json_type_name(value),
          });
        };
        bundles
          .bundles_mut(kind)
          .entry(name.to_string())
          .or_default()
          .push(file.to_string());
      }
    }

    info!(
      path = %path.display(),
      js = bundles.js_bundles().len(),
      css = bundles.css_bundles().len(),
      "loaded compiled asset bundles"
    );
    Ok(Self { bundles })
  }
}

impl Deref for GulpCompiledBundles {
  type Target = GulpBundles;

  fn deref(&self) -> &Self::Target {
    &self.bundles
  }
}

impl AssetBundles for GulpCompiledBundles {
  fn css_bundle_assets(&self, name: &str) -> Result<&[String]> {
    self.bundles.css_bundle_assets(name)
  }

  fn js_bundle_assets(&self, name: &str) -> Result<&[String]> {
    self.bundles.js_bundle_assets(name)
  }
}
