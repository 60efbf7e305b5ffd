//! The facade templates and the dev server talk to.
//!
//! [`Assets`] owns the public URL policy (stream scheme, base URL, optional path
//! transformer) and aggregates any number of bundle sources. Forward lookups turn stream
//! URIs and bundle names into browser URLs; reverse lookups turn an incoming request path
//! back into the file it names, refusing anything outside the locator roots.

use std::path::PathBuf;
use std::sync::Arc;

use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::asset_paths::{is_external_url, normalize_base_url, normalize_uri, strip_prefix_or_self, strip_query};
use crate::error::{AssetError, AssetKind, Result};
use crate::locator::{Resource, ResourceLocator};
use crate::manifest::AssetBundles;
use crate::path_transformer::PathTransformer;
use crate::url_builder::AssetUrlBuilder;

/// A stream reference in either `scheme://path` or `[scheme, path]` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPath {
  /// `assets://vendor/lib.js`, or an `http(s)://` URL passed through untouched.
  Uri(String),
  /// `["assets", "vendor/lib.js"]`; any other length is rejected.
  Parts(Vec<String>),
}

impl StreamPath {
  /// Collapse into a single `scheme://path` string.
  pub fn into_uri(self) -> Result<String> {
    match self {
      Self::Uri(uri) => Ok(uri),
      Self::Parts(parts) => match <[String; 2]>::try_from(parts) {
        Ok([scheme, path]) => Ok(format!("{scheme}://{path}")),
        Err(parts) => Err(AssetError::InvalidStreamPath(format!(
          "expected [scheme, path] but got {} part(s)",
          parts.len()
        ))),
      },
    }
  }
}

impl From<&str> for StreamPath {
  fn from(uri: &str) -> Self {
    Self::Uri(uri.to_string())
  }
}

impl From<String> for StreamPath {
  fn from(uri: String) -> Self {
    Self::Uri(uri)
  }
}

impl From<(&str, &str)> for StreamPath {
  fn from((scheme, path): (&str, &str)) -> Self {
    Self::Parts(vec![scheme.to_string(), path.to_string()])
  }
}

impl From<Vec<String>> for StreamPath {
  fn from(parts: Vec<String>) -> Self {
    Self::Parts(parts)
  }
}

impl From<&[&str]> for StreamPath {
  fn from(parts: &[&str]) -> Self {
    Self::Parts(parts.iter().map(|part| part.to_string()).collect())
  }
}

/// Bundle aggregation and URL resolution over a resource locator.
pub struct Assets {
  locator: Arc<dyn ResourceLocator>,
  locator_scheme: String,
  base_url: String,
  transformer: Option<Arc<dyn PathTransformer>>,
  asset_bundles: Vec<Box<dyn AssetBundles>>,
}

impl Assets {
  /// Create a facade resolving `scheme://` URIs through `locator`.
  ///
  /// Fails when `scheme` or `base_url` is empty.
  pub fn new(locator: Arc<dyn ResourceLocator>, scheme: &str, base_url: &str) -> Result<Self> {
    let mut assets = Self {
      locator,
      locator_scheme: String::new(),
      base_url: String::new(),
      transformer: None,
      asset_bundles: Vec::new(),
    };
    assets.set_locator_scheme(scheme)?;
    assets.set_base_url(base_url)?;
    Ok(assets)
  }

  /// Derive URLs from locator-relative paths through `transformer`.
  pub fn with_path_transformer(mut self, transformer: Arc<dyn PathTransformer>) -> Self {
    self.transformer = Some(transformer);
    self
  }

  /// Register another bundle source. Sources are consulted in registration order.
  pub fn add_asset_bundles(&mut self, bundles: impl AssetBundles + 'static) {
    self.asset_bundles.push(Box::new(bundles));
  }

  /// Drop every registered bundle source.
  pub fn reset_asset_bundles(&mut self) {
    self.asset_bundles.clear();
  }

  /// Registered bundle sources.
  pub fn asset_bundles(&self) -> &[Box<dyn AssetBundles>] {
    &self.asset_bundles
  }

  /// Base URL, always ending in `/`.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Set the base URL; trailing slashes collapse into one.
  pub fn set_base_url(&mut self, base_url: &str) -> Result<&mut Self> {
    if base_url.is_empty() {
      return Err(AssetError::InvalidArgument("base URL must not be an empty string".into()));
    }
    self.base_url = normalize_base_url(base_url);
    Ok(self)
  }

  /// Locator scheme including the `://` separator, e.g. `assets://`.
  pub fn locator_scheme(&self) -> String {
    format!("{}://", self.locator_scheme)
  }

  /// Set the locator scheme. A trailing `://` is accepted and dropped.
  pub fn set_locator_scheme(&mut self, scheme: &str) -> Result<&mut Self> {
    let scheme = scheme.strip_suffix("://").unwrap_or(scheme);
    if scheme.is_empty() {
      return Err(AssetError::InvalidArgument("locator scheme must not be an empty string".into()));
    }
    self.locator_scheme = scheme.to_string();
    Ok(self)
  }

  /// URLs of every script in bundle `name`, across all sources.
  pub fn js_bundle_assets(&self, name: &str) -> Result<Vec<String>> {
    self.bundle_assets(AssetKind::Js, name)
  }

  /// URLs of every stylesheet in bundle `name`, across all sources.
  pub fn css_bundle_assets(&self, name: &str) -> Result<Vec<String>> {
    self.bundle_assets(AssetKind::Css, name)
  }

  fn bundle_assets(&self, kind: AssetKind, name: &str) -> Result<Vec<String>> {
    let mut defined = false;
    let mut paths = Vec::new();

    for source in &self.asset_bundles {
      let found = match kind {
        AssetKind::Css => source.css_bundle_assets(name),
        AssetKind::Js => source.js_bundle_assets(name),
      };
      match found {
        Ok(found) => {
          defined = true;
          paths.extend(found.iter().cloned());
        }
        Err(err) if err.is_out_of_range() => continue,
        Err(err) => return Err(err),
      }
    }

    if !defined {
      return Err(AssetError::BundleNotFound {
        kind,
        name: name.to_string(),
      });
    }

    let scheme = self.locator_scheme();
    paths
      .iter()
      .map(|path| self.absolute_url(format!("{scheme}{path}")))
      .collect()
  }

  /// Browser URL for a stream path.
  ///
  /// The file must exist in one of the locator roots. `http(s)://` URLs are returned
  /// as given.
  pub fn absolute_url(&self, stream_path: impl Into<StreamPath>) -> Result<String> {
    let uri = stream_path.into().into_uri()?;
    if is_external_url(&uri) {
      return Ok(uri);
    }

    let resource = self.locator.find(&uri).ok_or_else(|| AssetError::AssetNotFound {
      path: uri.clone(),
      declared_in: None,
    })?;

    let relative_url = match &self.transformer {
      Some(transformer) => transformer.path_to_url(&resource.relative)?,
      None => strip_prefix_or_self(&uri, &self.locator_scheme()).to_string(),
    };
    Ok(format!("{}{}", self.base_url, relative_url))
  }

  /// Stream URI for a request path, or `None` when nothing safe matches.
  pub fn url_path_to_stream_uri(&self, url_path: &str) -> Option<String> {
    self.locate_url_path(url_path).map(|resource| resource.uri)
  }

  /// Canonical file path for a request path, or `None` when it is missing, not a regular
  /// file, or outside the locator roots.
  pub fn url_path_to_absolute_path(&self, url_path: &str) -> Option<PathBuf> {
    let resource = self.locate_url_path(url_path)?;
    let path = resource.path.canonicalize().ok()?;
    path.is_file().then_some(path)
  }

  fn locate_url_path(&self, url_path: &str) -> Option<Resource> {
    let path = strip_query(url_path);
    let decoded = percent_decode_str(&path).decode_utf8().ok()?;
    let Some(normalized) = normalize_uri(&decoded) else {
      debug!(url_path, "rejected request path escaping the asset root");
      return None;
    };
    let relative = strip_prefix_or_self(&normalized, &self.base_url).trim_start_matches('/');

    match &self.transformer {
      Some(transformer) => {
        let path = transformer.url_to_path(relative).ok()?;
        self.locator.find_by_relative(&self.locator_scheme, &path)
      }
      None => self.locator.find(&format!("{}{}", self.locator_scheme(), relative)),
    }
  }
}

/// Renders schema assets with the facade's URL policy, so tagged URLs resolve back through
/// [`Assets::url_path_to_absolute_path`].
impl AssetUrlBuilder for Assets {
  fn asset_url(&self, path: &str, declared_in: Option<&str>) -> Result<String> {
    self
      .absolute_url((self.locator_scheme.as_str(), path))
      .map_err(|err| match err {
        AssetError::AssetNotFound { .. } => AssetError::AssetNotFound {
          path: path.to_string(),
          declared_in: declared_in.map(str::to_string),
        },
        other => other,
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixtures::Fixture;
  use crate::manifest::{GulpCompiledBundles, GulpRawBundles};
  use crate::path_transformer::PrefixTransformer;

  fn assets(fixture: &Fixture) -> Assets {
    Assets::new(Arc::new(fixture.locator()), "assets", "https://cdn.example.com").unwrap()
  }

  #[test]
  fn resolves_stream_uri_and_pair() {
    let fixture = Fixture::new();
    let assets = assets(&fixture);

    assert_eq!(
      assets.absolute_url("assets://vendor/bootstrap/js/npm.js").unwrap(),
      "https://cdn.example.com/vendor/bootstrap/js/npm.js"
    );
    assert_eq!(
      assets.absolute_url(("assets", "js/hawks.js")).unwrap(),
      "https://cdn.example.com/js/hawks.js"
    );
  }

  #[test]
  fn rejects_pairs_of_wrong_length() {
    let fixture = Fixture::new();
    let parts: &[&str] = &["assets", "js", "hawks.js"];
    assert!(matches!(
      assets(&fixture).absolute_url(parts),
      Err(AssetError::InvalidStreamPath(_))
    ));
  }

  #[test]
  fn missing_asset_is_not_found() {
    let fixture = Fixture::new();
    let err = assets(&fixture).absolute_url("assets://vendor/missing.js").unwrap_err();
    assert!(err.is_not_found());
  }

  #[test]
  fn external_urls_pass_through() {
    let fixture = Fixture::new();
    assert_eq!(
      assets(&fixture).absolute_url("https://code.jquery.com/jquery.js").unwrap(),
      "https://code.jquery.com/jquery.js"
    );
  }

  #[test]
  fn validates_configuration() {
    let fixture = Fixture::new();
    let locator: Arc<dyn ResourceLocator> = Arc::new(fixture.locator());
    assert!(Assets::new(locator.clone(), "", "/").is_err());
    assert!(Assets::new(locator.clone(), "assets", "").is_err());

    let mut assets = Assets::new(locator, "theme://", "/a///").unwrap();
    assert_eq!(assets.locator_scheme(), "theme://");
    assert_eq!(assets.base_url(), "/a/");
    assets.set_base_url("/b").unwrap().set_locator_scheme("assets").unwrap();
    assert_eq!(assets.base_url(), "/b/");
    assert_eq!(assets.locator_scheme(), "assets://");
  }

  #[test]
  fn merges_bundles_across_sources_in_order() {
    let fixture = Fixture::new();
    let extra = fixture.write(
      "extra.config.json",
      r#"{ "bundle": { "test": { "scripts": "js/hawks.js" } } }"#,
    );
    let mut assets = assets(&fixture);
    assets.add_asset_bundles(GulpRawBundles::load(fixture.path("bundle.config.json")).unwrap());
    assets.add_asset_bundles(GulpRawBundles::load(extra).unwrap());

    assert_eq!(assets.js_bundle_assets("test").unwrap(), vec![
      "https://cdn.example.com/vendor/bootstrap/js/bootstrap.js".to_string(),
      "https://cdn.example.com/vendor/bootstrap/js/npm.js".to_string(),
      "https://cdn.example.com/js/hawks.js".to_string(),
    ]);
    assert_eq!(assets.css_bundle_assets("test").unwrap().len(), 1);
  }

  #[test]
  fn bundle_missing_everywhere_is_out_of_range() {
    let fixture = Fixture::new();
    let mut assets = assets(&fixture);
    assets.add_asset_bundles(GulpCompiledBundles::load(fixture.path("bundle.result.json")).unwrap());

    let err = assets.js_bundle_assets("owls").unwrap_err();
    assert!(matches!(err, AssetError::BundleNotFound { kind: AssetKind::Js, .. }));

    assets.reset_asset_bundles();
    assert!(assets.asset_bundles().is_empty());
    assert!(assets.js_bundle_assets("test").is_err());
  }

  #[test]
  fn empty_but_defined_bundle_yields_no_urls() {
    let fixture = Fixture::new();
    let path = fixture.write("empty.json", r#"{ "bundle": { "blank": { "scripts": [] } } }"#);
    let mut assets = assets(&fixture);
    assets.add_asset_bundles(GulpRawBundles::load(path).unwrap());

    assert!(assets.js_bundle_assets("blank").unwrap().is_empty());
  }

  #[test]
  fn reverse_lookup_strips_base_url_and_query() {
    let fixture = Fixture::new();
    let assets = assets(&fixture);

    assert_eq!(
      assets
        .url_path_to_stream_uri("https://cdn.example.com/js/hawks.js?v=2")
        .as_deref(),
      Some("assets://js/hawks.js")
    );
    assert_eq!(
      assets.url_path_to_absolute_path("allowed.txt"),
      Some(fixture.path("sprinkles/owls/assets/allowed.txt").canonicalize().unwrap())
    );
  }

  #[test]
  fn encoded_question_mark_is_part_of_the_file_name() {
    let fixture = Fixture::new();
    let file = fixture.write("sprinkles/owls/assets/what?.txt", "what?.txt");
    let assets = assets(&fixture);

    assert_eq!(
      assets.url_path_to_absolute_path("/what%3F.txt?v=1"),
      Some(file.canonicalize().unwrap())
    );
    assert_eq!(assets.url_path_to_absolute_path("/what?.txt"), None);
  }

  #[test]
  fn renders_schema_urls_that_resolve_back() {
    let fixture = Fixture::new();
    let assets = Assets::new(Arc::new(fixture.locator()), "assets", "/assets").unwrap();

    let url = assets.asset_url("js/hawks.js", Some("b.json [x]")).unwrap();
    assert_eq!(url, "/assets/js/hawks.js");
    assert_eq!(
      assets.url_path_to_absolute_path(&url),
      Some(fixture.path("sprinkles/hawks/assets/js/hawks.js").canonicalize().unwrap())
    );

    match assets.asset_url("vendor/gone.js", Some("b.json [x]")) {
      Err(AssetError::AssetNotFound { path, declared_in }) => {
        assert_eq!(path, "vendor/gone.js");
        assert_eq!(declared_in.as_deref(), Some("b.json [x]"));
      }
      other => panic!("unexpected result: {other:?}"),
    }
  }

  #[test]
  fn reverse_lookup_refuses_traversal() {
    let fixture = Fixture::new();
    let assets = assets(&fixture);

    assert_eq!(assets.url_path_to_absolute_path("forbidden.txt"), None);
    assert_eq!(assets.url_path_to_absolute_path("../../../forbidden.txt"), None);
    assert_eq!(assets.url_path_to_absolute_path("%2e%2e/%2e%2e/%2e%2e/forbidden.txt"), None);
    assert_eq!(assets.url_path_to_absolute_path("vendor/bootstrap/../../../../forbidden.txt"), None);
  }

  #[test]
  fn directories_are_not_files() {
    let fixture = Fixture::new();
    let assets = assets(&fixture);

    assert!(assets.url_path_to_stream_uri("vendor/bootstrap").is_some());
    assert_eq!(assets.url_path_to_absolute_path("vendor/bootstrap"), None);
  }

  #[test]
  fn transformer_shapes_urls_both_ways() {
    let fixture = Fixture::new();
    let mut transformer = PrefixTransformer::new();
    transformer.define("sprinkles/owls/assets/", "owls/").unwrap();
    transformer.define("sprinkles/hawks/assets/", "hawks/").unwrap();
    let assets = assets(&fixture).with_path_transformer(Arc::new(transformer));

    let url = assets.absolute_url("assets://js/hawks.js").unwrap();
    assert_eq!(url, "https://cdn.example.com/hawks/js/hawks.js");
    assert_eq!(
      assets.url_path_to_stream_uri(&url).as_deref(),
      Some("assets://js/hawks.js")
    );
    assert_eq!(
      assets.url_path_to_absolute_path("hawks/js/hawks.js"),
      Some(fixture.path("sprinkles/hawks/assets/js/hawks.js").canonicalize().unwrap())
    );
    assert_eq!(assets.url_path_to_absolute_path("unmapped/js/hawks.js"), None);
  }
}
