//! Wiring a configuration file into ready-to-use facades.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::assets::Assets;
use crate::config::AssetsConfig;
use crate::locator::{ResourceLocator, UniformLocator};
use crate::manifest::{GulpCompiledBundles, GulpRawBundles};
use crate::path_transformer::PrefixTransformer;
use crate::schema::{AssetBundleSchema, AssetManager};
use crate::url_builder::{AssetUrlBuilder, CompiledUrlBuilder, LocatorUrlBuilder};

/// Builds locators, facades and schemas from an [`AssetsConfig`].
///
/// Every relative path in the configuration is resolved against `root_dir`, normally the
/// directory holding the config file.
pub struct AssetsBuilder<'a> {
  config: &'a AssetsConfig,
  root_dir: PathBuf,
}

impl<'a> AssetsBuilder<'a> {
  /// Create a builder for `config`.
  pub fn new(config: &'a AssetsConfig, root_dir: impl Into<PathBuf>) -> Self {
    Self {
      config,
      root_dir: root_dir.into(),
    }
  }

  /// Directory configuration paths are relative to.
  pub fn root_dir(&self) -> &Path {
    &self.root_dir
  }

  /// Locator with every configured mount registered.
  pub fn locator(&self) -> UniformLocator {
    let mut locator = UniformLocator::new(self.root_dir.join(&self.config.locator_base));
    for root in &self.config.roots {
      locator.add_paths(&self.config.locator_scheme, &root.prefix, &root.paths);
    }
    locator
  }

  /// Prefix transformer, when any rewrite pairs are configured.
  pub fn transformer(&self) -> Result<Option<PrefixTransformer>> {
    if self.config.prefix_transforms.is_empty() {
      return Ok(None);
    }

    let mut transformer = PrefixTransformer::new();
    for pair in &self.config.prefix_transforms {
      transformer
        .define(pair.path.as_str(), pair.url.as_str())
        .with_context(|| format!("invalid prefix transform '{}' -> '{}'", pair.path, pair.url))?;
    }
    Ok(Some(transformer))
  }

  /// Facade carrying the configured URL policy, with no bundle sources yet.
  fn url_policy(&self) -> Result<Assets> {
    let locator: Arc<dyn ResourceLocator> = Arc::new(self.locator());
    let mut assets = Assets::new(locator, &self.config.locator_scheme, &self.config.base_url)
      .context("invalid asset URL configuration")?;

    if let Some(transformer) = self.transformer()? {
      assets = assets.with_path_transformer(Arc::new(transformer));
    }
    Ok(assets)
  }

  /// Facade with the configured manifests registered, raw ones first.
  pub fn build(&self) -> Result<Assets> {
    let mut assets = self.url_policy()?;

    for manifest in &self.config.raw_manifests {
      let path = self.root_dir.join(manifest);
      debug!(path = %path.display(), "registering raw manifest");
      assets.add_asset_bundles(GulpRawBundles::load(&path)?);
    }
    for manifest in &self.config.compiled_manifests {
      let path = self.root_dir.join(manifest);
      debug!(path = %path.display(), "registering compiled manifest");
      assets.add_asset_bundles(GulpCompiledBundles::load(&path)?);
    }

    Ok(assets)
  }

  /// Rendering schema for the configured manifests.
  ///
  /// Compiled manifests take over when present: their fingerprinted files are addressed
  /// directly below the base URL. Raw manifests are rendered with the facade's URL policy
  /// unless `remove_prefix` asks for the locator's root-relative layout.
  pub fn build_schema(&self) -> Result<AssetBundleSchema> {
    if !self.config.compiled_manifests.is_empty() {
      let builder: Arc<dyn AssetUrlBuilder> = Arc::new(CompiledUrlBuilder::new(&self.config.base_url));
      let mut schema = AssetBundleSchema::new(builder);
      for manifest in &self.config.compiled_manifests {
        schema.load_compiled_schema_file(self.root_dir.join(manifest))?;
      }
      return Ok(schema);
    }

    let builder: Arc<dyn AssetUrlBuilder> = if self.config.remove_prefix.is_empty() {
      Arc::new(self.url_policy()?)
    } else {
      debug!(prefix = %self.config.remove_prefix, "rendering raw bundles root-relative");
      Arc::new(LocatorUrlBuilder::new(
        Arc::new(self.locator()),
        &self.config.base_url,
        &self.config.remove_prefix,
        &self.config.locator_scheme,
      ))
    };
    let mut schema = AssetBundleSchema::new(builder);
    for manifest in &self.config.raw_manifests {
      schema.load_raw_schema_file(self.root_dir.join(manifest))?;
    }
    Ok(schema)
  }

  /// Rendering helper over [`Self::build_schema`].
  pub fn build_manager(&self) -> Result<AssetManager> {
    let schema = self.build_schema()?;
    Ok(AssetManager::new(Arc::new(self.locator()), &self.config.base_url, schema))
  }
}
