use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

use super::{AssetResponse, serve_asset, serve_asset_head};
use crate::assets::Assets;
use crate::loader::AssetLoader;

/// Single-threaded development server for raw assets under one URL mount.
pub struct DevServer {
  server: Server,
  loader: AssetLoader,
  mount: String,
}

impl DevServer {
  /// Bind to `address` (e.g. `127.0.0.1:8080`) and serve `assets` below `mount`.
  pub fn bind(address: &str, mount: &str, assets: Arc<Assets>) -> Result<Self> {
    let server = Server::http(address)
      .map_err(|err| anyhow!(err))
      .with_context(|| format!("failed to bind asset server to {address}"))?;

    let mount = format!("/{}/", mount.trim_matches('/')).replace("//", "/");
    info!(address, mount = %mount, "serving assets");

    Ok(Self {
      server,
      loader: AssetLoader::new(assets),
      mount,
    })
  }

  /// Local socket address, useful when bound to port 0.
  pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
    self.server.server_addr().to_ip()
  }

  /// Answer requests until the listener shuts down.
  ///
  /// A failed response is logged and does not stop the server.
  pub fn run(mut self) -> Result<()> {
    loop {
      let request = self.server.recv().context("failed to receive request")?;
      if let Err(err) = self.handle(request) {
        warn!(error = %err, "asset request failed");
      }
    }
  }

  /// Block for one request and answer it.
  pub fn serve_one(&mut self) -> Result<()> {
    let request = self.server.recv().context("failed to receive request")?;
    self.handle(request)
  }

  fn handle(&mut self, request: Request) -> Result<()> {
    let url = request.url().to_string();
    let method = request.method().clone();
    let if_modified_since = request
      .headers()
      .iter()
      .find(|header| header.field.equiv("If-Modified-Since"))
      .map(|header| header.value.to_string());

    let response = match (&method, strip_mount(&self.mount, &url)) {
      (Method::Get, Some(path)) => serve_asset(&mut self.loader, path, if_modified_since.as_deref()),
      (Method::Head, Some(path)) => serve_asset_head(&mut self.loader, path, if_modified_since.as_deref()),
      (Method::Get | Method::Head, None) => Ok(AssetResponse::empty(404)),
      _ => Ok(AssetResponse::empty(405)),
    };

    let response = match response {
      Ok(response) => response,
      Err(err) => {
        warn!(url = %url, error = %err, "failed to serve asset");
        AssetResponse::empty(500)
      }
    };
    debug!(method = %method, url = %url, status = response.status, "asset request");

    request
      .respond(into_tiny(response)?)
      .with_context(|| format!("failed to respond to {url}"))
  }
}

/// Request path below `mount`, or `None` when the request is outside it.
pub fn strip_mount<'a>(mount: &str, url: &'a str) -> Option<&'a str> {
  if mount == "/" {
    return Some(url.trim_start_matches('/'));
  }
  url
    .strip_prefix(mount)
    .or_else(|| url.strip_prefix(mount.trim_end_matches('/')).filter(|rest| rest.starts_with('?')))
}

fn into_tiny(response: AssetResponse) -> Result<Response<std::io::Cursor<Vec<u8>>>> {
  let mut tiny = Response::from_data(response.body).with_status_code(response.status);
  for (field, value) in &response.headers {
    let header = Header::from_bytes(field.as_bytes(), value.as_bytes())
      .map_err(|()| anyhow!("invalid header {field}: {value}"))?;
    tiny.add_header(header);
  }
  Ok(tiny)
}
