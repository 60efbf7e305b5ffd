use serde::Deserialize;

/// Attributes applied to every rendered `<script>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScriptOptions {
  /// Emit a bare `async` attribute.
  #[serde(rename = "async")]
  pub async_load: bool,
  /// Emit a bare `defer` attribute.
  pub defer: bool,
  /// `id` attribute.
  pub id: Option<String>,
  /// `type` attribute, e.g. `module`.
  #[serde(rename = "type")]
  pub script_type: Option<String>,
}

/// Attributes applied to every rendered stylesheet `<link>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
  /// `id` attribute.
  pub id: Option<String>,
  /// `media` attribute.
  pub media: Option<String>,
  /// `rel` attribute, `stylesheet` when unset.
  pub rel: Option<String>,
  /// `type` attribute, `text/css` when unset.
  #[serde(rename = "type")]
  pub style_type: Option<String>,
}
