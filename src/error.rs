//! Error type shared by every resolution and loading step.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Asset list a bundle lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
  /// Stylesheets rendered as `<link>` tags.
  Css,
  /// Scripts rendered as `<script>` tags.
  Js,
}

impl fmt::Display for AssetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Css => f.write_str("CSS"),
      Self::Js => f.write_str("JS"),
    }
  }
}

/// Errors raised while loading manifests or resolving assets.
#[derive(Debug, Error)]
pub enum AssetError {
  /// A manifest file is missing or unreadable.
  #[error("the schema '{path}' could not be found")]
  ManifestNotFound {
    /// Manifest path that was requested.
    path: PathBuf,
    /// Underlying read failure.
    #[source]
    source: std::io::Error,
  },

  /// No locator root holds the requested asset.
  #[error("the asset '{path}' could not be found{}", declared_suffix(.declared_in))]
  AssetNotFound {
    /// Asset path or stream URI that failed to resolve.
    path: String,
    /// Manifest file and bundle that referenced the asset, when known.
    declared_in: Option<String>,
  },

  /// A manifest is not a valid JSON document.
  #[error("the schema '{path}' does not contain a valid JSON document")]
  Json {
    /// Manifest path.
    path: PathBuf,
    /// Parser error, carrying line and column.
    #[source]
    source: serde_json::Error,
  },

  /// A manifest is valid JSON but a field has the wrong shape.
  #[error("expected {field} property for '{bundle}' to be {expected} but was {actual}. For '{path}'")]
  InvalidBundlesFile {
    /// Manifest path.
    path: PathBuf,
    /// Bundle holding the offending field.
    bundle: String,
    /// Field name, e.g. `styles`.
    field: &'static str,
    /// Accepted JSON type(s).
    expected: &'static str,
    /// JSON type that was found.
    actual: &'static str,
  },

  /// No registered source defines the bundle.
  #[error("{kind} asset bundle '{name}' does not exist")]
  BundleNotFound {
    /// Asset list that was queried.
    kind: AssetKind,
    /// Requested bundle name.
    name: String,
  },

  /// The rendering schema has no bundle with this name.
  #[error("bundle '{name}' not found in loaded bundles")]
  UndefinedBundle {
    /// Requested bundle name.
    name: String,
  },

  /// No prefix transformation pair matched.
  #[error("no prefix transformation pair matched '{subject}'")]
  NoTransformation {
    /// Path or URL that was being transformed.
    subject: String,
  },

  /// A stream path was given in an unsupported shape.
  #[error("invalid stream path given: {0}")]
  InvalidStreamPath(String),

  /// A configuration value or definition was rejected.
  #[error("{0}")]
  InvalidArgument(String),

  /// A bundle with `onCollision: error` was defined twice.
  #[error("the bundle '{bundle}' is already defined")]
  BundleCollision {
    /// Bundle name.
    bundle: String,
  },

  /// `onCollision` holds an unknown value.
  #[error("invalid value '{value}' provided for 'onCollision' key in bundle '{bundle}'")]
  InvalidCollisionRule {
    /// Bundle name.
    bundle: String,
    /// Value found in the manifest.
    value: String,
  },

  /// Reading a served asset failed.
  #[error("I/O error when reading '{path}'")]
  Io {
    /// File that was being read.
    path: PathBuf,
    /// Underlying failure.
    #[source]
    source: std::io::Error,
  },

  /// The asset loader was queried before an asset was loaded.
  #[error("no asset has been loaded")]
  NotLoaded,
}

impl AssetError {
  /// True for missing manifests and unresolvable assets.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::ManifestNotFound { .. } | Self::AssetNotFound { .. })
  }

  /// True for lookup misses that callers may probe for.
  pub fn is_out_of_range(&self) -> bool {
    matches!(
      self,
      Self::BundleNotFound { .. } | Self::UndefinedBundle { .. } | Self::NoTransformation { .. }
    )
  }
}

fn declared_suffix(declared_in: &Option<String>) -> String {
  match declared_in {
    Some(source) => format!(". Referenced in '{source}'."),
    None => String::new(),
  }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AssetError>;
