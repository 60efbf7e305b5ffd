//! Serving-side counterpart of the facade: request path in, file facts out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::assets::Assets;
use crate::error::{AssetError, Result};
use crate::mime;

/// Resolves one request path at a time and reads the file behind it.
pub struct AssetLoader {
  assets: Arc<Assets>,
  full_path: Option<PathBuf>,
}

impl AssetLoader {
  /// Create a loader over `assets`.
  pub fn new(assets: Arc<Assets>) -> Self {
    Self {
      assets,
      full_path: None,
    }
  }

  /// Resolve `relative_path` and make it the current asset.
  ///
  /// Returns `false`, clearing the current asset, when no regular file matches.
  pub fn load_asset(&mut self, relative_path: &str) -> bool {
    self.full_path = self.assets.url_path_to_absolute_path(relative_path);
    self.full_path.is_some()
  }

  /// Canonical path of the current asset.
  pub fn path(&self) -> Option<&Path> {
    self.full_path.as_deref()
  }

  /// File contents.
  pub fn content(&self) -> Result<Vec<u8>> {
    let path = self.current()?;
    fs::read(path).map_err(|source| io_error(path, source))
  }

  /// File size in bytes.
  pub fn length(&self) -> Result<u64> {
    let path = self.current()?;
    fs::metadata(path)
      .map(|metadata| metadata.len())
      .map_err(|source| io_error(path, source))
  }

  /// MIME type by extension.
  pub fn mime_type(&self) -> Result<&'static str> {
    Ok(mime::from_path(self.current()?))
  }

  /// Modification time.
  pub fn last_modified(&self) -> Result<SystemTime> {
    let path = self.current()?;
    fs::metadata(path)
      .and_then(|metadata| metadata.modified())
      .map_err(|source| io_error(path, source))
  }

  fn current(&self) -> Result<&Path> {
    self.full_path.as_deref().ok_or(AssetError::NotLoaded)
  }
}

fn io_error(path: &Path, source: std::io::Error) -> AssetError {
  AssetError::Io {
    path: path.to_path_buf(),
    source,
  }
}
