//! Extension based MIME lookup for served assets.

use std::path::Path;

/// Fallback for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type for a file path, judged by extension alone.
pub fn from_path(path: &Path) -> &'static str {
  from_extension(path.extension().and_then(|ext| ext.to_str()))
}

/// MIME type for a bare extension, without the leading dot.
pub fn from_extension(ext: Option<&str>) -> &'static str {
  let Some(ext) = ext else {
    return OCTET_STREAM;
  };

  match ext.to_ascii_lowercase().as_str() {
    "css" => "text/css; charset=utf-8",
    "js" | "mjs" => "text/javascript; charset=utf-8",
    "json" | "map" => "application/json",
    "html" | "htm" => "text/html; charset=utf-8",
    "txt" => "text/plain; charset=utf-8",
    "xml" => "application/xml",
    "csv" => "text/csv; charset=utf-8",
    "svg" => "image/svg+xml",
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "avif" => "image/avif",
    "ico" => "image/x-icon",
    "bmp" => "image/bmp",
    "woff" => "font/woff",
    "woff2" => "font/woff2",
    "ttf" => "font/ttf",
    "otf" => "font/otf",
    "eot" => "application/vnd.ms-fontobject",
    "mp3" => "audio/mpeg",
    "wav" => "audio/wav",
    "ogg" => "audio/ogg",
    "mp4" => "video/mp4",
    "webm" => "video/webm",
    "pdf" => "application/pdf",
    "wasm" => "application/wasm",
    "zip" => "application/zip",
    _ => OCTET_STREAM,
  }
}
