//! Configuration file describing asset roots, manifests and URL policy.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// File name looked up by [`AssetsConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "assets.config.json";

/// Discoverable asset configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
  /// Public URL assets are served from.
  pub base_url: String,
  /// Root-relative prefix stripped from raw bundle URLs.
  ///
  /// Empty renders raw bundles with the same URLs as [`crate::assets::Assets`], which the
  /// dev server can resolve. Set it to publish one root's layout directly below `base_url`.
  pub remove_prefix: String,
  /// Stream scheme assets are located under, without `://`.
  pub locator_scheme: String,
  /// Directory, relative to the config file, that roots are resolved against.
  pub locator_base: String,
  /// Mounts for the scheme, highest precedence first.
  pub roots: Vec<RootConfig>,
  /// Raw `bundle.config.json` manifests, relative to the config file.
  pub raw_manifests: Vec<String>,
  /// Compiled `bundle.result.json` manifests, relative to the config file.
  pub compiled_manifests: Vec<String>,
  /// Reversible `path -> url` prefix rewrites, in matching order.
  pub prefix_transforms: Vec<PrefixTransformConfig>,
  /// Development server settings.
  pub serve: ServeConfig,
}

impl Default for AssetsConfig {
  fn default() -> Self {
    Self {
      base_url: "/assets/".into(),
      remove_prefix: String::new(),
      locator_scheme: "assets".into(),
      locator_base: ".".into(),
      roots: vec![RootConfig {
        prefix: String::new(),
        paths: vec!["assets".into()],
      }],
      raw_manifests: Vec::new(),
      compiled_manifests: Vec::new(),
      prefix_transforms: Vec::new(),
      serve: ServeConfig::default(),
    }
  }
}

/// One mount: a stream prefix backed by ordered directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RootConfig {
  /// Stream path prefix the directories are mounted at; empty for the whole scheme.
  #[serde(default)]
  pub prefix: String,
  /// Directories relative to `locator_base`, first match wins.
  pub paths: Vec<String>,
}

/// One prefix rewrite pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefixTransformConfig {
  /// Prefix of locator-relative paths.
  pub path: String,
  /// Prefix of the public URL path replacing it.
  pub url: String,
}

/// Dev server bind address and URL mount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
  /// Socket address to bind.
  pub address: String,
  /// URL path prefix requests must start with.
  pub mount: String,
}

impl Default for ServeConfig {
  fn default() -> Self {
    Self {
      address: "127.0.0.1:8080".into(),
      mount: "/assets-raw/".into(),
    }
  }
}

impl AssetsConfig {
  /// Load `assets.config.json` from `dir`, falling back to defaults when the file is missing
  /// or unreadable.
  pub fn discover(dir: &Path) -> Self {
    Self::from_path(&dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file, if it parses.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Read configuration from a specific JSON file, reporting why it failed.
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("config not found at {}", path.display()))?;
    serde_json::from_str(&content)
      .with_context(|| format!("failed to parse config {}", path.display()))
  }
}
