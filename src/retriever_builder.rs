use tracing::warn;

use crate::retriever::Retriever;
use crate::structures::Registry;

/// Assembles a [`Retriever`] from an explicitly supplied registry, so tests
/// and embedders can substitute their own instead of relying on hidden
/// process state.
pub struct RetrieverBuilder {
  registry: Option<Registry>,
}

impl RetrieverBuilder {
  pub fn new() -> Self {
    Self { registry: None }
  }

  pub fn set_registry(mut self, registry: Registry) -> Self {
    self.registry = Some(registry);
    self
  }

  /// Falls back to the bundled registry when none was supplied. An empty
  /// registry is allowed but gets a startup warning, since every resolve
  /// call will fail with an unknown-task error.
  pub fn build(self) -> Retriever {
    let registry = self.registry.unwrap_or_else(Registry::bundled);
    if registry.is_empty() {
      warn!("The resource registry is empty, no resource URLs can be resolved");
    }
    Retriever { registry }
  }
}

impl Default for RetrieverBuilder {
  fn default() -> Self {
    Self::new()
  }
}
