use std::collections::BTreeMap;
use std::path::Path;

use tracing::warn;

use crate::structures::{Error, Registry, ResourceEntry};

/// Trusted registry files shipped inside the binary. Two files on purpose:
/// the resource-level merge between them is production behaviour, not a
/// test-only code path.
const BUNDLED_CONFIGS: [(&str, &str); 2] = [
  ("language_models.json", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/registry/language_models.json"))),
  ("datasets.json", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/registry/datasets.json"))),
];

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry built from the bundled configuration files. A malformed file
  /// downgrades to a warning and a smaller registry, so resolve calls can
  /// still report unknown identifiers cleanly instead of crashing at startup.
  pub fn bundled() -> Self {
    let mut registry = Self::new();
    for (name, text) in BUNDLED_CONFIGS {
      if let Err(error) = registry.merge_json(text) {
        warn!("Could not load bundled registry file '{}', its resource URLs will be unavailable: {}", name, error);
      }
    }
    registry
  }

  /// Loads every `*.json` file of `dir` in name order. Later files add
  /// resources to tasks already defined by earlier ones rather than replacing
  /// them. An unreadable directory yields an empty registry plus a warning.
  pub fn from_dir(dir: &Path) -> Self {
    let mut registry = Self::new();
    let entries = match std::fs::read_dir(dir) {
      Ok(entries) => entries,
      Err(error) => {
        warn!("Could not open '{}', hence no resource URLs are available: {}", dir.display(), error);
        return registry;
      },
    };
    let mut paths: Vec<_> = entries
      .filter_map(|entry| entry.ok())
      .map(|entry| entry.path())
      .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
      .collect();
    paths.sort();
    for path in paths {
      let result = std::fs::read_to_string(&path)
        .map_err(Error::from)
        .and_then(|text| registry.merge_json(&text));
      if let Err(error) = result {
        warn!("Skipping registry file '{}': {}", path.display(), error);
      }
    }
    registry
  }

  pub(crate) fn merge_json(&mut self, text: &str) -> Result<(), Error> {
    let parsed: BTreeMap<String, BTreeMap<String, ResourceEntry>> = serde_json::from_str(text)?;
    for (task, resources) in parsed {
      self.tasks.entry(task).or_default().extend(resources);
    }
    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }

  /// All task names, sorted.
  pub fn task_names(&self) -> Vec<String> {
    self.tasks.keys().cloned().collect()
  }

  /// All resource names of a task, sorted.
  pub fn resource_names(&self, task_name: &str) -> Result<Vec<String>, Error> {
    let resources = self.tasks.get(task_name)
      .ok_or_else(|| Error::UnknownTask(task_name.to_string(), self.task_names()))?;
    Ok(resources.keys().cloned().collect())
  }

  pub(crate) fn entry(&self, task_name: &str, resource_name: &str) -> Result<&ResourceEntry, Error> {
    let resources = self.tasks.get(task_name)
      .ok_or_else(|| Error::UnknownTask(task_name.to_string(), self.task_names()))?;
    resources.get(resource_name)
      .ok_or_else(|| Error::UnknownResource(task_name.to_string(), resource_name.to_string(), resources.keys().cloned().collect()))
  }

  /// Static data-quality check: every sha256 and every URL must be globally
  /// unique, and every entry needs at least one parseable URL. Returns one
  /// message per violation.
  pub fn validate(&self) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen_hashes: BTreeMap<&str, String> = BTreeMap::new();
    let mut seen_urls: BTreeMap<&str, String> = BTreeMap::new();
    for (task, resources) in &self.tasks {
      for (resource, entry) in resources {
        let id = format!("{}/{}", task, resource);
        if entry.urls.is_empty() {
          problems.push(format!("{}: no mirror URLs", id));
        }
        if let Some(other) = seen_hashes.insert(entry.sha256.as_str(), id.clone()) {
          problems.push(format!("{}: sha256 also used by {}", id, other));
        }
        for url in &entry.urls {
          if url::Url::parse(url.trim()).is_err() {
            problems.push(format!("{}: unparseable URL '{}'", id, url));
          }
          if let Some(other) = seen_urls.insert(url.as_str(), id.clone()) {
            problems.push(format!("{}: URL '{}' also used by {}", id, url, other));
          }
        }
      }
    }
    problems
  }
}

#[cfg(test)]
mod tests {
  use crate::structures::{Error, Registry};

  const FIRST: &str = r#"{
    "segmentation": {
      "crf-base": { "urls": ["https://mirror-a.example.org/crf-base.zip"], "sha256": "aa", "file_extension": ".zip" }
    }
  }"#;

  const SECOND: &str = r#"{
    "segmentation": {
      "crf-large": { "urls": ["https://mirror-a.example.org/crf-large.zip"], "sha256": "bb", "file_extension": ".zip" }
    }
  }"#;

  #[test]
  fn merge_adds_resources_to_existing_tasks() {
    let mut registry = Registry::new();
    registry.merge_json(FIRST).unwrap();
    registry.merge_json(SECOND).unwrap();
    assert_eq!(registry.task_names(), vec!["segmentation".to_string()]);
    assert_eq!(registry.resource_names("segmentation").unwrap(), vec!["crf-base".to_string(), "crf-large".to_string()]);
  }

  #[test]
  fn unknown_task_lists_alternatives() {
    let mut registry = Registry::new();
    registry.merge_json(FIRST).unwrap();
    match registry.resource_names("no-such-task") {
      Err(Error::UnknownTask(task, valid)) => {
        assert_eq!(task, "no-such-task");
        assert_eq!(valid, vec!["segmentation".to_string()]);
      },
      other => panic!("expected UnknownTask, got {:?}", other),
    }
  }

  #[test]
  fn validate_reports_shared_hashes_and_urls() {
    let mut registry = Registry::new();
    registry.merge_json(FIRST).unwrap();
    registry.merge_json(r#"{
      "classification": {
        "dup": { "urls": ["https://mirror-a.example.org/crf-base.zip"], "sha256": "aa", "file_extension": ".zip" }
      }
    }"#).unwrap();
    let problems = registry.validate();
    assert_eq!(problems.len(), 2);
  }

  #[test]
  fn unreadable_directory_yields_empty_registry() {
    let registry = Registry::from_dir(std::path::Path::new("/no/such/directory"));
    assert!(registry.is_empty());
  }
}
