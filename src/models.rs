//! Bundle records held by the rendering schema.

use crate::error::Result;
use crate::html::attr;
use crate::schema::{ScriptOptions, StyleOptions};
use crate::url_builder::AssetUrlBuilder;

/// One asset reference taken from a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
  path: String,
  declared_in: String,
}

impl Asset {
  /// Create an asset, dropping leading slashes from `path`.
  ///
  /// `declared_in` is a diagnostic label such as `bundle.config.json [js/main]`.
  pub fn new(path: &str, declared_in: impl Into<String>) -> Self {
    Self {
      path: path.trim_start_matches(['/', '\\']).to_string(),
      declared_in: declared_in.into(),
    }
  }

  /// Path relative to the asset roots.
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Manifest file and bundle that declared this asset.
  pub fn declared_in(&self) -> &str {
    &self.declared_in
  }

  /// Resolve this asset's URL through `builder`.
  pub fn url(&self, builder: &dyn AssetUrlBuilder) -> Result<String> {
    builder.asset_url(&self.path, Some(&self.declared_in))
  }
}

/// Named, ordered set of stylesheets and scripts.
///
/// Order matters: tags are emitted, and therefore loaded, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle {
  name: String,
  css_assets: Vec<Asset>,
  js_assets: Vec<Asset>,
}

impl AssetBundle {
  /// Create an empty bundle.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  /// Bundle name.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Stylesheets in insertion order.
  pub fn css_assets(&self) -> &[Asset] {
    &self.css_assets
  }

  /// Scripts in insertion order.
  pub fn js_assets(&self) -> &[Asset] {
    &self.js_assets
  }

  /// Append a stylesheet.
  pub fn add_css_asset(&mut self, asset: Asset) {
    self.css_assets.push(asset);
  }

  /// Append a script.
  pub fn add_js_asset(&mut self, asset: Asset) {
    self.js_assets.push(asset);
  }

  /// One `<script>` tag per script, newline separated.
  pub fn render_scripts(&self, builder: &dyn AssetUrlBuilder, options: &ScriptOptions) -> Result<String> {
    let tags = self
      .js_assets
      .iter()
      .map(|asset| Ok(script_tag(&asset.url(builder)?, options)))
      .collect::<Result<Vec<_>>>()?;
    Ok(tags.join("\n"))
  }

  /// One `<link>` tag per stylesheet, newline separated.
  pub fn render_styles(&self, builder: &dyn AssetUrlBuilder, options: &StyleOptions) -> Result<String> {
    let tags = self
      .css_assets
      .iter()
      .map(|asset| Ok(style_tag(&asset.url(builder)?, options)))
      .collect::<Result<Vec<_>>>()?;
    Ok(tags.join("\n"))
  }
}

fn script_tag(url: &str, options: &ScriptOptions) -> String {
  let mut attributes = vec![attr("src", url)];
  if options.async_load {
    attributes.push("async".into());
  }
  if options.defer {
    attributes.push("defer".into());
  }
  if let Some(id) = &options.id {
    attributes.push(attr("id", id));
  }
  if let Some(script_type) = &options.script_type {
    attributes.push(attr("type", script_type));
  }
  format!("<script {}></script>", attributes.join(" "))
}

fn style_tag(url: &str, options: &StyleOptions) -> String {
  let mut attributes = vec![
    attr("rel", options.rel.as_deref().unwrap_or("stylesheet")),
    attr("type", options.style_type.as_deref().unwrap_or("text/css")),
    attr("href", url),
  ];
  if let Some(id) = &options.id {
    attributes.push(attr("id", id));
  }
  if let Some(media) = &options.media {
    attributes.push(attr("media", media));
  }
  format!("<link {}>", attributes.join(" "))
}
