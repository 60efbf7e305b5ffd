use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{AssetError, Result};

/// Manifest shape being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
  /// `bundle.config.json`: bundle definitions nested under a `bundle` key.
  Raw,
  /// `bundle.result.json`: bundle definitions at the top level.
  Compiled,
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<Value> {
  let content = fs::read_to_string(path).map_err(|source| AssetError::ManifestNotFound {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&content).map_err(|source| AssetError::Json {
    path: path.to_path_buf(),
    source,
  })
}

/// Bundle name and definition object pairs, in document order.
///
/// A raw manifest without a `bundle` key (or with `"bundle": null`) has no bundles. Every
/// definition must be a JSON object.
pub fn bundle_definitions<'a>(
  document: &'a Value,
  kind: ManifestKind,
  path: &Path,
) -> Result<Vec<(&'a str, &'a Map<String, Value>)>> {
  let container = match kind {
    ManifestKind::Raw => match document.get("bundle") {
      None | Some(Value::Null) => return Ok(Vec::new()),
      Some(bundles) => bundles,
    },
    ManifestKind::Compiled => document,
  };

  let Some(bundles) = container.as_object() else {
    return Err(AssetError::InvalidBundlesFile {
      path: path.to_path_buf(),
      bundle: match kind {
        ManifestKind::Raw => "bundle".into(),
        ManifestKind::Compiled => "<root>".into(),
      },
      field: "bundle list",
      expected: "an object",
      actual: json_type_name(container),
    });
  };

  bundles
    .iter()
    .map(|(name, definition)| match definition.as_object() {
      Some(definition) => Ok((name.as_str(), definition)),
      None => Err(AssetError::InvalidBundlesFile {
        path: path.to_path_buf(),
        bundle: name.clone(),
        field: "definition",
        expected: "an object",
        actual: json_type_name(definition),
      }),
    })
    .collect()
}

/// JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
