//! Helpers exposed to page templates: bundle tags and single asset URLs.

use crate::assets::{Assets, StreamPath};
use crate::error::Result;
use crate::html::escape_attr;

/// Ordered HTML attributes. A `None` value renders as a bare word such as `async`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
  entries: Vec<(String, Option<String>)>,
}

impl Attributes {
  /// No attributes.
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a value-less attribute.
  pub fn flag(mut self, name: impl Into<String>) -> Self {
    self.insert(name.into(), None);
    self
  }

  /// Add or replace `name="value"`.
  pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.insert(name.into(), Some(value.into()));
    self
  }

  fn insert(&mut self, name: String, value: Option<String>) {
    match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
      Some(entry) => entry.1 = value,
      None => self.entries.push((name, value)),
    }
  }

  /// `self` with `overrides` applied on top, keeping first-seen order.
  fn merged(&self, overrides: &Attributes) -> Attributes {
    let mut merged = self.clone();
    for (name, value) in &overrides.entries {
      merged.insert(name.clone(), value.clone());
    }
    merged
  }

  fn render(&self) -> String {
    self
      .entries
      .iter()
      .map(|(name, value)| match value {
        Some(value) => format!("{name}=\"{}\"", escape_attr(value)),
        None => name.clone(),
      })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Template plugin over an [`Assets`] facade.
pub struct AssetsTemplate<'a> {
  assets: &'a Assets,
}

impl<'a> AssetsTemplate<'a> {
  /// Bundle used by [`Self::js`] callers that have no preference.
  pub const DEFAULT_JS_BUNDLE: &'static str = "js/main";
  /// Bundle used by [`Self::css`] callers that have no preference.
  pub const DEFAULT_CSS_BUNDLE: &'static str = "css/main";

  /// Wrap a facade.
  pub fn new(assets: &'a Assets) -> Self {
    Self { assets }
  }

  /// One `<script>` per asset in `bundle`, concatenated.
  pub fn js(&self, bundle: &str, attributes: &Attributes) -> Result<String> {
    let tags = self
      .assets
      .js_bundle_assets(bundle)?
      .into_iter()
      .map(|url| {
        let attributes = Attributes::new().set("src", url).merged(attributes);
        format!("<script {}></script>", attributes.render())
      })
      .collect();
    Ok(tags)
  }

  /// One stylesheet `<link />` per asset in `bundle`, concatenated.
  ///
  /// `rel="stylesheet"` and `type="text/css"` are defaults that `attributes` may replace.
  pub fn css(&self, bundle: &str, attributes: &Attributes) -> Result<String> {
    let defaults = Attributes::new().set("rel", "stylesheet").set("type", "text/css");
    let tags = self
      .assets
      .css_bundle_assets(bundle)?
      .into_iter()
      .map(|url| {
        let attributes = Attributes::new()
          .set("href", url)
          .merged(&defaults)
          .merged(attributes);
        format!("<link {} />", attributes.render())
      })
      .collect();
    Ok(tags)
  }

  /// URL for a stream path such as `assets://images/logo.png` or `("assets", "images/logo.png")`.
  pub fn url(&self, stream_path: impl Into<StreamPath>) -> Result<String> {
    self.assets.absolute_url(stream_path)
  }
}
