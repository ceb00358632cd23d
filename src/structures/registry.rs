use std::collections::BTreeMap;

use serde::Deserialize;

/// One downloadable artifact as declared by the registry: mirror URLs in
/// order of preference, the expected SHA-256 digest (lowercase hex), and the
/// file extension the artifact is saved under before extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceEntry {
  pub urls: Vec<String>,
  pub sha256: String,
  pub file_extension: String,
}

/// Read-only `task -> resource -> entry` mapping, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
  pub(crate) tasks: BTreeMap<String, BTreeMap<String, ResourceEntry>>,
}
