//! Rendering-side registry of named bundles built from one or more manifests.
//!
//! Manifests are loaded in order. When a later manifest defines a bundle that already
//! exists, the newcomer's `options.sprinkle.onCollision` decides what happens, which lets
//! a theme replace, extend or leave alone a bundle shipped by a plugin loaded earlier.

mod manager;
mod options;

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

pub use manager::AssetManager;
pub use options::{ScriptOptions, StyleOptions};

use crate::error::{AssetError, AssetKind, Result};
use crate::manifest::{ManifestKind, bundle_definitions, json_type_name, read_manifest};
use crate::models::{Asset, AssetBundle};
use crate::url_builder::AssetUrlBuilder;

/// What to do when a manifest redefines an existing bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
  /// Discard the existing bundle and start over.
  #[default]
  Replace,
  /// Append to the existing bundle.
  Merge,
  /// Keep the existing bundle and drop the new definition.
  Ignore,
  /// Fail the load.
  Error,
}

impl FromStr for CollisionPolicy {
  type Err = ();

  fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
    match value {
      "replace" => Ok(Self::Replace),
      "merge" => Ok(Self::Merge),
      "ignore" => Ok(Self::Ignore),
      "error" => Ok(Self::Error),
      _ => Err(()),
    }
  }
}

impl CollisionPolicy {
  /// Policy declared by a bundle definition, defaulting to [`CollisionPolicy::Replace`].
  pub fn from_definition(bundle: &str, definition: &Map<String, Value>) -> Result<Self> {
    let rule = definition
      .get("options")
      .and_then(|options| options.get("sprinkle"))
      .and_then(|sprinkle| sprinkle.get("onCollision"));

    match rule {
      None | Some(Value::Null) => Ok(Self::default()),
      Some(Value::String(value)) => value.parse::<Self>().map_err(|()| AssetError::InvalidCollisionRule {
        bundle: bundle.to_string(),
        value: value.clone(),
      }),
      Some(other) => Err(AssetError::InvalidCollisionRule {
        bundle: bundle.to_string(),
        value: other.to_string(),
      }),
    }
  }
}

/// Registry of bundles, rendered through one URL builder.
#[derive(Clone)]
pub struct AssetBundleSchema {
  bundles: BTreeMap<String, AssetBundle>,
  url_builder: Arc<dyn AssetUrlBuilder>,
}

impl AssetBundleSchema {
  /// Create an empty schema.
  pub fn new(url_builder: Arc<dyn AssetUrlBuilder>) -> Self {
    Self {
      bundles: BTreeMap::new(),
      url_builder,
    }
  }

  /// Bundle called `name`.
  pub fn get(&self, name: &str) -> Result<&AssetBundle> {
    self.bundles.get(name).ok_or_else(|| AssetError::UndefinedBundle {
      name: name.to_string(),
    })
  }

  /// Loaded bundle names, sorted.
  pub fn bundle_names(&self) -> impl Iterator<Item = &str> {
    self.bundles.keys().map(String::as_str)
  }

  /// URL builder used for rendering.
  pub fn url_builder(&self) -> &Arc<dyn AssetUrlBuilder> {
    &self.url_builder
  }

  /// Load a raw `bundle.config.json`.
  pub fn load_raw_schema_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
    self.load_schema_file(path.as_ref(), ManifestKind::Raw)
  }

  /// Load a compiled `bundle.result.json`.
  pub fn load_compiled_schema_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
    self.load_schema_file(path.as_ref(), ManifestKind::Compiled)
  }

  /// Changes are staged and only committed once the whole document is accepted.
  fn load_schema_file(&mut self, path: &Path, kind: ManifestKind) -> Result<()> {
    let document = read_manifest(path)?;
    let mut staged = self.bundles.clone();

    for (name, definition) in bundle_definitions(&document, kind, path)? {
      if staged.contains_key(name) {
        match CollisionPolicy::from_definition(name, definition)? {
          CollisionPolicy::Replace => {
            debug!(bundle = name, path = %path.display(), "replacing bundle");
            staged.remove(name);
          }
          CollisionPolicy::Merge => {
            debug!(bundle = name, path = %path.display(), "merging into bundle");
          }
          CollisionPolicy::Ignore => {
            warn!(bundle = name, path = %path.display(), "ignoring redefinition of bundle");
            continue;
          }
          CollisionPolicy::Error => {
            return Err(AssetError::BundleCollision {
              bundle: name.to_string(),
            });
          }
        }
      }

      let declared_in = format!("{} [{}]", path.display(), name);
      let bundle = staged.entry(name.to_string())
        .or_insert_with(|| AssetBundle::new(name));

      for (field, asset_kind) in [("scripts", AssetKind::Js), ("styles", AssetKind::Css)] {
        let Some(value) = definition.get(field) else {
          continue;
        };
        for asset_path in entry_paths(value).map_err(|actual| AssetError::InvalidBundlesFile {
          path: path.to_path_buf(),
          bundle: name.to_string(),
          field,
          expected: "a string or an object with a string src, alone or in a list",
          actual,
        })? {
          let asset = Asset::new(asset_path, declared_in.as_str());
          match asset_kind {
            AssetKind::Js => bundle.add_js_asset(asset),
            AssetKind::Css => bundle.add_css_asset(asset),
          }
        }
      }
    }

    self.bundles = staged;
    Ok(())
  }

  /// `<script>` tags for bundle `name`.
  pub fn render_scripts(&self, name: &str, options: &ScriptOptions) -> Result<String> {
    self.get(name)?.render_scripts(self.url_builder.as_ref(), options)
  }

  /// Stylesheet `<link>` tags for bundle `name`.
  pub fn render_styles(&self, name: &str, options: &StyleOptions) -> Result<String> {
    self.get(name)?.render_styles(self.url_builder.as_ref(), options)
  }
}

/// Paths named by a `scripts`/`styles` field.
///
/// Entries are strings or `{ "src": ... }` objects, alone or in a list; `null` holds none.
fn entry_paths(value: &Value) -> std::result::Result<Vec<&str>, &'static str> {
  match value {
    Value::Null => Ok(Vec::new()),
    Value::Array(items) => items.iter().map(entry_path).collect(),
    single => entry_path(single).map(|path| vec![path]),
  }
}

fn entry_path(value: &Value) -> std::result::Result<&str, &'static str> {
  match value {
    Value::String(path) => Ok(path.as_str()),
    Value::Object(entry) => match entry.get("src") {
      Some(Value::String(path)) => Ok(path.as_str()),
      Some(other) => Err(json_type_name(other)),
      None => Err("an object without src"),
    },
    other => Err(json_type_name(other)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::Fixture;
  use crate::url_builder::{CompiledUrlBuilder, LocatorUrlBuilder};

  fn schema() -> AssetBundleSchema {
    AssetBundleSchema::new(Arc::new(CompiledUrlBuilder::new("/assets/")))
  }

  fn js_paths(schema: &AssetBundleSchema, name: &str) -> Vec<String> {
    schema
      .get(name)
      .unwrap()
      .js_assets()
      .iter()
      .map(|asset| asset.path().to_string())
      .collect()
  }

  #[test]
  fn loads_raw_manifest_with_declaration_sources() {
    let fixture = Fixture::new();
    let mut schema = schema();
    schema.load_raw_schema_file(fixture.path("bundle.config.json")).unwrap();

    let bundle = schema.get("test").unwrap();
    assert_eq!(bundle.js_assets().len(), 2);
    assert_eq!(bundle.css_assets().len(), 1);
    assert!(bundle.js_assets()[0].declared_in().ends_with("bundle.config.json [test]"));
  }

  #[test]
  fn missing_bundle_is_out_of_range() {
    let err = schema().get("nope").unwrap_err();
    assert!(matches!(err, AssetError::UndefinedBundle { .. }));
    assert!(err.is_out_of_range());
  }

  #[test]
  fn accepts_src_objects_alone_or_in_lists() {
    let fixture = Fixture::new();
    let path = fixture.write(
      "objects.json",
      r#"{ "bundle": { "x": { "scripts": [{ "src": "a.js" }, "b.js"], "styles": { "src": "/c.css" } } } }"#,
    );
    let mut schema = schema();
    schema.load_raw_schema_file(path).unwrap();

    assert_eq!(js_paths(&schema, "x"), vec!["a.js", "b.js"]);
    assert_eq!(schema.get("x").unwrap().css_assets()[0].path(), "c.css");
  }

  #[test]
  fn rejects_unsupported_entries() {
    let fixture = Fixture::new();
    let path = fixture.write("bad.json", r#"{ "bundle": { "x": { "scripts": [1] } } }"#);

    let err = schema().load_raw_schema_file(path).unwrap_err();
    assert!(matches!(err, AssetError::InvalidBundlesFile { field: "scripts", actual: "number", .. }));
  }

  #[test]
  fn reloading_replaces_by_default() {
    let fixture = Fixture::new();
    let mut schema = schema();
    schema.load_raw_schema_file(fixture.path("bundle.config.json")).unwrap();
    schema.load_raw_schema_file(fixture.path("bundle.config.json")).unwrap();

    assert_eq!(js_paths(&schema, "test").len(), 2);
  }

  #[test]
  fn collision_policies_apply_to_the_newcomer() {
    let fixture = Fixture::new();
    let first = fixture.write("first.json", r#"{ "bundle": { "x": { "scripts": "one.js" } } }"#);
    let merge = fixture.write(
      "merge.json",
      r#"{ "bundle": { "x": { "scripts": "two.js", "options": { "sprinkle": { "onCollision": "merge" } } } } }"#,
    );
    let ignore = fixture.write(
      "ignore.json",
      r#"{ "bundle": { "x": { "scripts": "three.js", "options": { "sprinkle": { "onCollision": "ignore" } } } } }"#,
    );
    let replace = fixture.write("replace.json", r#"{ "bundle": { "x": { "scripts": "four.js" } } }"#);

    let mut schema = schema();
    schema.load_raw_schema_file(&first).unwrap();
    schema.load_raw_schema_file(&merge).unwrap();
    assert_eq!(js_paths(&schema, "x"), vec!["one.js", "two.js"]);

    schema.load_raw_schema_file(&ignore).unwrap();
    assert_eq!(js_paths(&schema, "x"), vec!["one.js", "two.js"]);

    schema.load_raw_schema_file(&replace).unwrap();
    assert_eq!(js_paths(&schema, "x"), vec!["four.js"]);
  }

  #[test]
  fn error_policy_and_unknown_rules_fail() {
    let fixture = Fixture::new();
    let first = fixture.write("first.json", r#"{ "bundle": { "x": { "scripts": "one.js" } } }"#);
    let error = fixture.write(
      "error.json",
      r#"{ "bundle": { "x": { "options": { "sprinkle": { "onCollision": "error" } } } } }"#,
    );
    let unknown = fixture.write(
      "unknown.json",
      r#"{ "bundle": { "x": { "options": { "sprinkle": { "onCollision": "explode" } } } } }"#,
    );

    let mut schema = schema();
    schema.load_raw_schema_file(&first).unwrap();
    assert!(matches!(
      schema.load_raw_schema_file(&error),
      Err(AssetError::BundleCollision { .. })
    ));
    match schema.load_raw_schema_file(&unknown) {
      Err(AssetError::InvalidCollisionRule { bundle, value }) => {
        assert_eq!(bundle, "x");
        assert_eq!(value, "explode");
      }
      other => panic!("unexpected result: {other:?}"),
    }
  }

  #[test]
  fn failed_replace_keeps_existing_bundle() {
    let fixture = Fixture::new();
    let first = fixture.write("first.json", r#"{ "bundle": { "x": { "scripts": "one.js" } } }"#);
    let broken = fixture.write("broken.json", r#"{ "bundle": { "x": { "scripts": ["two.js", 1] } } }"#);

    let mut schema = schema();
    schema.load_raw_schema_file(&first).unwrap();
    assert!(schema.load_raw_schema_file(&broken).is_err());

    assert_eq!(js_paths(&schema, "x"), vec!["one.js"]);
  }

  #[test]
  fn collision_midway_commits_nothing() {
    let fixture = Fixture::new();
    let first = fixture.write("first.json", r#"{ "bundle": { "b": { "scripts": "b.js" } } }"#);
    let colliding = fixture.write(
      "colliding.json",
      r#"{ "bundle": { "a": { "scripts": "a.js" }, "b": { "scripts": "other.js", "options": { "sprinkle": { "onCollision": "error" } } } } }"#,
    );

    let mut schema = schema();
    schema.load_raw_schema_file(&first).unwrap();
    assert!(matches!(
      schema.load_raw_schema_file(&colliding),
      Err(AssetError::BundleCollision { .. })
    ));

    assert_eq!(schema.bundle_names().collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(js_paths(&schema, "b"), vec!["b.js"]);
  }

  #[test]
  fn compiled_manifest_renders_fingerprinted_urls() {
    let fixture = Fixture::new();
    let mut schema = schema();
    schema.load_compiled_schema_file(fixture.path("bundle.result.json")).unwrap();

    assert_eq!(
      schema.render_scripts("test", &ScriptOptions::default()).unwrap(),
      "<script src=\"/assets/test-930fa5c1ee.js\"></script>"
    );
  }

  #[test]
  fn rendering_reports_missing_asset_source() {
    let fixture = Fixture::new();
    let path = fixture.write("missing.json", r#"{ "bundle": { "x": { "scripts": "vendor/gone.js" } } }"#);
    let builder = LocatorUrlBuilder::with_defaults(Arc::new(fixture.locator()), "/assets-raw/");
    let mut schema = AssetBundleSchema::new(Arc::new(builder));
    schema.load_raw_schema_file(path).unwrap();

    match schema.render_scripts("x", &ScriptOptions::default()) {
      Err(AssetError::AssetNotFound { declared_in, .. }) => {
        assert!(declared_in.unwrap().ends_with("missing.json [x]"));
      }
      other => panic!("unexpected result: {other:?}"),
    }
  }
}
