//! Helpers for cleaning up asset paths and URLs before they reach the locator.
//!
//! Request paths arrive from browsers and manifest entries from hand-edited JSON, so the
//! same handful of string rules (prefix stripping, base URL shaping, traversal-safe
//! normalisation) is shared by the facade, the URL builders and the dev server.

mod filters;
mod normalize;
mod url;

pub use filters::{is_external_url, strip_query};
pub use normalize::normalize_uri;
pub use url::{normalize_base_url, normalize_remove_prefix, strip_prefix_or_self};
