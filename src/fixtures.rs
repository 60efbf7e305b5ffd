//! Shared on-disk layout for unit tests: two sprinkles layered over one scheme.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

use crate::locator::UniformLocator;

pub(crate) const RAW_MANIFEST: &str = r#"{
  "bundle": {
    "test": {
      "scripts": ["vendor/bootstrap/js/bootstrap.js", "vendor/bootstrap/js/npm.js"],
      "styles": "vendor/bootstrap/css/bootstrap.css"
    },
    "js/hawks": {
      "scripts": "js/hawks.js"
    }
  }
}"#;

pub(crate) const COMPILED_MANIFEST: &str = r#"{
  "test": {
    "scripts": "test-930fa5c1ee.js",
    "styles": "test-930fa5c1ee.css"
  }
}"#;

pub(crate) struct Fixture {
  dir: TempDir,
}

impl Fixture {
  pub(crate) fn new() -> Self {
    let fixture = Self {
      dir: tempdir().unwrap(),
    };

    for file in [
      "sprinkles/owls/assets/vendor/bootstrap/js/bootstrap.js",
      "sprinkles/owls/assets/vendor/bootstrap/js/npm.js",
      "sprinkles/owls/assets/vendor/bootstrap/css/bootstrap.css",
      "sprinkles/owls/assets/allowed.txt",
      "sprinkles/hawks/assets/vendor/bootstrap/js/bootstrap.js",
      "sprinkles/hawks/assets/js/hawks.js",
      "sprinkles/hawks/assets/test-930fa5c1ee.js",
      "sprinkles/hawks/assets/test-930fa5c1ee.css",
      "forbidden.txt",
    ] {
      fixture.write(file, file);
    }
    fixture.write("bundle.config.json", RAW_MANIFEST);
    fixture.write("bundle.result.json", COMPILED_MANIFEST);

    fixture
  }

  pub(crate) fn root(&self) -> &Path {
    self.dir.path()
  }

  pub(crate) fn path(&self, relative: &str) -> PathBuf {
    self.dir.path().join(relative)
  }

  pub(crate) fn write(&self, relative: &str, contents: &str) -> PathBuf {
    let path = self.path(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
  }

  /// `assets://` backed by the owls sprinkle first, hawks second.
  pub(crate) fn locator(&self) -> UniformLocator {
    let mut locator = UniformLocator::new(self.root());
    locator.add_paths("assets", "", ["sprinkles/owls/assets", "sprinkles/hawks/assets"]);
    locator
  }
}
