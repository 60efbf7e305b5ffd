#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod assets;
pub mod builder;
pub mod config;
pub mod error;
pub mod html;
pub mod loader;
pub mod locator;
pub mod logging;
pub mod manifest;
pub mod mime;
pub mod models;
pub mod path_transformer;
pub mod schema;
pub mod serve;
pub mod template;
pub mod url_builder;

#[cfg(test)]
mod fixtures;

pub use assets::{Assets, StreamPath};
pub use builder::AssetsBuilder;
pub use config::AssetsConfig;
pub use error::{AssetError, Result};
pub use loader::AssetLoader;
