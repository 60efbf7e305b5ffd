use std::sync::Arc;

use super::{AssetBundleSchema, ScriptOptions, StyleOptions};
use crate::asset_paths::{is_external_url, normalize_base_url};
use crate::assets::StreamPath;
use crate::error::{AssetError, Result};
use crate::locator::ResourceLocator;

/// Template helper rendering bundles from an [`AssetBundleSchema`].
///
/// Unlike the [`Assets`](crate::assets::Assets) facade, URLs for loose assets keep the
/// root-relative path the locator found, which is what a raw dev server mounted over the
/// whole project expects.
pub struct AssetManager {
  locator: Arc<dyn ResourceLocator>,
  base_url: String,
  schema: AssetBundleSchema,
}

impl AssetManager {
  /// Create a manager over a loaded schema.
  pub fn new(locator: Arc<dyn ResourceLocator>, base_url: &str, schema: AssetBundleSchema) -> Self {
    Self {
      locator,
      base_url: normalize_base_url(base_url),
      schema,
    }
  }

  /// Schema the manager renders from.
  pub fn schema(&self) -> &AssetBundleSchema {
    &self.schema
  }

  /// Replace the schema, e.g. after reloading manifests.
  pub fn set_schema(&mut self, schema: AssetBundleSchema) {
    self.schema = schema;
  }

  /// `<script>` tags for `bundle`.
  pub fn js(&self, bundle: &str, options: &ScriptOptions) -> Result<String> {
    self.schema.render_scripts(bundle, options)
  }

  /// Stylesheet `<link>` tags for `bundle`.
  pub fn css(&self, bundle: &str, options: &StyleOptions) -> Result<String> {
    self.schema.render_styles(bundle, options)
  }

  /// URL for a stream path; `http(s)` URLs pass through.
  pub fn url(&self, stream_path: impl Into<StreamPath>) -> Result<String> {
    let uri = stream_path.into().into_uri()?;
    if is_external_url(&uri) {
      return Ok(uri);
    }

    let Some((scheme, path)) = uri.split_once("://") else {
      return Err(AssetError::InvalidStreamPath(uri));
    };
    let stream = format!("{}://{}", scheme.to_lowercase(), path);

    let relative = self
      .locator
      .resolve_relative(&stream)
      .ok_or(AssetError::AssetNotFound {
        path: stream,
        declared_in: None,
      })?;
    Ok(format!("{}{}", self.base_url, relative))
  }
}
