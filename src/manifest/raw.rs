use std::ops::Deref;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::{ASSET_FIELDS, AssetBundles, GulpBundles, ManifestKind, OneOrMany, bundle_definitions, read_manifest};
use crate::error::{AssetError, Result};

/// Bundles read from a raw `bundle.config.json`.
///
/// Each `styles`/`scripts` field may be one path or a list of paths; a field set to
/// `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GulpRawBundles {
  bundles: GulpBundles,
}

impl GulpRawBundles {
  /// Parse the manifest at `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let document = read_manifest(path)?;
    let mut bundles = GulpBundles::default();

    for (name, definition) in bundle_definitions(&document, ManifestKind::Raw, path)? {
      for (field, kind) in ASSET_FIELDS {
        let Some(value) = definition.get(field).filter(|value| !value.is_null()) else {
          continue;
        };
        let paths = standardise(value).map_err(|actual| AssetError::InvalidBundlesFile {
          path: path.to_path_buf(),
          bundle: name.to_string(),
          field,
          expected: "a string or an array of strings",
          actual,
        })?;
        bundles.bundles_mut(kind).insert(name.to_string(), paths);
      }
    }

    info!(
      path = %path.display(),
      js = bundles.js_bundles().len(),
      css = bundles.css_bundles().len(),
      "loaded raw asset bundles"
    );
    Ok(Self { bundles })
  }
}

fn standardise(value: &Value) -> std::result::Result<Vec<String>, &'static str> {
  OneOrMany::try_from(value).map(OneOrMany::into_vec)
}

impl Deref for GulpRawBundles {
  type Target = GulpBundles;

  fn deref(&self) -> &Self::Target {
    &self.bundles
  }
}

impl AssetBundles for GulpRawBundles {
  fn css_bundle_assets(&self, name: &str) -> Result<&[String]> {
    self.bundles.css_bundle_assets(name)
  }

  fn js_bundle_assets(&self, name: &str) -> Result<&[String]> {
    self.bundles.js_bundle_assets(name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::Fixture;

  #[test]
  fn parses_lists_and_single_strings() {
    let fixture = Fixture::new();
    let bundles = GulpRawBundles::load(fixture.path("bundle.config.json")).unwrap();

    assert_eq!(bundles.js_bundle_assets("test").unwrap(), [
      "vendor/bootstrap/js/bootstrap.js".to_string(),
      "vendor/bootstrap/js/npm.js".to_string(),
    ]);
    assert_eq!(bundles.css_bundle_assets("test").unwrap(), [
      "vendor/bootstrap/css/bootstrap.css".to_string()
    ]);
  }

  #[test]
  fn bundle_without_styles_has_no_css_entry() {
    let fixture = Fixture::new();
    let bundles = GulpRawBundles::load(fixture.path("bundle.config.json")).unwrap();

    assert!(bundles.js_bundle_assets("js/hawks").is_ok());
    assert!(bundles.css_bundle_assets("js/hawks").unwrap_err().is_out_of_range());
  }

  #[test]
  fn manifest_without_bundle_key_yields_nothing() {
    let fixture = Fixture::new();
    let path = fixture.write("empty.json", r#"{ "copy": [] }"#);

    let bundles = GulpRawBundles::load(path).unwrap();
    assert!(bundles.bundle_names().is_empty());
  }

  #[test]
  fn null_fields_are_skipped() {
    let fixture = Fixture::new();
    let path = fixture.write(
      "nulls.json",
      r#"{ "bundle": { "x": { "scripts": null, "styles": "x.css" } } }"#,
    );

    let bundles = GulpRawBundles::load(path).unwrap();
    assert!(bundles.js_bundle_assets("x").is_err());
    assert_eq!(bundles.css_bundle_assets("x").unwrap().len(), 1);
  }

  #[test]
  fn rejects_numbers_with_bundle_and_file() {
    let fixture = Fixture::new();
    let path = fixture.write("bad.json", r#"{ "bundle": { "broken": { "styles": 42 } } }"#);

    let err = GulpRawBundles::load(&path).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, AssetError::InvalidBundlesFile { field: "styles", actual: "number", .. }));
    assert!(message.contains("broken"));
    assert!(message.contains("bad.json"));
  }

  #[test]
  fn rejects_non_string_list_items() {
    let fixture = Fixture::new();
    let path = fixture.write("bad.json", r#"{ "bundle": { "broken": { "scripts": ["a.js", {}] } } }"#);

    assert!(matches!(
      GulpRawBundles::load(path),
      Err(AssetError::InvalidBundlesFile { field: "scripts", actual: "object", .. })
    ));
  }

  #[test]
  fn missing_manifest_is_not_found() {
    let fixture = Fixture::new();
    let err = GulpRawBundles::load(fixture.path("absent.json")).unwrap_err();
    assert!(err.is_not_found());
  }
}
