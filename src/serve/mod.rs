//! Development asset serving.
//!
//! [`serve_asset`] holds the HTTP contract without tying it to a server: 404 for anything
//! the loader refuses, 304 when `If-Modified-Since` repeats the current `Last-Modified`
//! verbatim, otherwise 200 with the file and no-cache headers. [`DevServer`] puts it
//! behind `tiny_http`.

mod http_date;
mod server;

pub use http_date::format_http_date;
pub use server::{DevServer, strip_mount};

use crate::error::Result;
use crate::loader::AssetLoader;

/// Framework-free HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResponse {
  /// Status code.
  pub status: u16,
  /// Response headers in emission order.
  pub headers: Vec<(&'static str, String)>,
  /// Response body; empty for 304, 404 and HEAD.
  pub body: Vec<u8>,
}

impl AssetResponse {
  pub(crate) fn empty(status: u16) -> Self {
    Self {
      status,
      headers: Vec::new(),
      body: Vec::new(),
    }
  }

  /// First header called `name`, compared case-insensitively.
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(field, _)| field.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.as_str())
  }
}

/// Answer a GET for `url_path`.
pub fn serve_asset(
  loader: &mut AssetLoader,
  url_path: &str,
  if_modified_since: Option<&str>,
) -> Result<AssetResponse> {
  respond(loader, url_path, if_modified_since, true)
}

/// Answer a HEAD for `url_path`: same status and headers as GET, no body.
pub fn serve_asset_head(
  loader: &mut AssetLoader,
  url_path: &str,
  if_modified_since: Option<&str>,
) -> Result<AssetResponse> {
  respond(loader, url_path, if_modified_since, false)
}

fn respond(
  loader: &mut AssetLoader,
  url_path: &str,
  if_modified_since: Option<&str>,
  with_body: bool,
) -> Result<AssetResponse> {
  if !loader.load_asset(url_path) {
    return Ok(AssetResponse::empty(404));
  }

  let last_modified = format_http_date(loader.last_modified()?);
  if if_modified_since == Some(last_modified.as_str()) {
    return Ok(AssetResponse::empty(304));
  }

  let body = if with_body { loader.content()? } else { Vec::new() };
  Ok(AssetResponse {
    status: 200,
    headers: vec![
      ("Content-Type", loader.mime_type()?.to_string()),
      ("Content-Length", loader.length()?.to_string()),
      ("Cache-Control", "no-cache".to_string()),
      ("Last-Modified", last_modified),
    ],
    body,
  })
}
