use serde_json::Value;

use super::json_type_name;

/// A manifest field holding either a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany {
  /// `"styles": "main.css"`
  One(String),
  /// `"styles": ["reset.css", "main.css"]`
  Many(Vec<String>),
}

impl OneOrMany {
  /// Flatten into an ordered list.
  pub fn into_vec(self) -> Vec<String> {
    match self {
      Self::One(value) => vec![value],
      Self::Many(values) => values,
    }
  }
}

impl TryFrom<&Value> for OneOrMany {
  /// JSON type name of the offending value.
  type Error = &'static str;

  fn try_from(value: &Value) -> Result<Self, Self::Error> {
    match value {
      Value::String(single) => Ok(Self::One(single.clone())),
      Value::Array(items) => items
        .iter()
        .map(|item| match item {
          Value::String(path) => Ok(path.clone()),
          other => Err(json_type_name(other)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Self::Many),
      other => Err(json_type_name(other)),
    }
  }
}
