use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::functions::{decompress, fetch_file, file_sha256};
use crate::structures::{AttemptFailure, AttemptOutcome, Error, FetchOptions, Registry, ResourceEntry};

/// Resolves `(task, resource)` pairs into local artifacts: registry lookup,
/// per-mirror fetch/verify/decompress loop, filesystem cache.
///
/// Holds the registry by value; construct one through [`crate::RetrieverBuilder`].
pub struct Retriever {
  pub(crate) registry: Registry,
}

impl Retriever {
  /// All task names known to the registry.
  pub fn tasks(&self) -> Vec<String> {
    self.registry.task_names()
  }

  /// All resource names registered under `task_name`.
  pub fn resources(&self, task_name: &str) -> Result<Vec<String>, Error> {
    self.registry.resource_names(task_name)
  }

  /// Fetches a resource into `output_dir`, trying each registered mirror in
  /// declaration order until one yields a verified artifact.
  ///
  /// Returns `Ok(true)` on success (including cache hits), `Ok(false)` when
  /// every mirror failed. Unknown identifiers come back as `Err` before any
  /// filesystem work happens; per-mirror transport and integrity failures
  /// are logged as warnings and do not error the call.
  pub async fn resolve(&self, task_name: &str, resource_name: &str, output_dir: &str, options: &FetchOptions) -> Result<bool, Error> {
    let entry = self.registry.entry(task_name, resource_name)?;

    let output_dir = normalize_output_dir(output_dir);
    tokio::fs::create_dir_all(&output_dir).await?;
    let dest = output_dir.join(format!("{}{}", resource_name, entry.file_extension));

    let client = reqwest::Client::builder()
      .connect_timeout(Duration::from_secs(options.timeout_secs))
      .build()?;

    for url in &entry.urls {
      let url = url.trim();
      match self.attempt(&client, url, &dest, resource_name, entry, options).await? {
        AttemptOutcome::CacheHit => {
          info!("Found '{}' for task '{}' locally, skipping the download", resource_name, task_name);
          return Ok(true);
        },
        AttemptOutcome::Complete => {
          info!("Retrieved '{}' for task '{}' from '{}'", resource_name, task_name, url);
          return Ok(true);
        },
        AttemptOutcome::Failed(AttemptFailure::Connection(cause)) => {
          warn!("Could not retrieve '{}' for task '{}' from '{}': {}", resource_name, task_name, url, cause);
        },
        AttemptOutcome::Failed(AttemptFailure::HashMismatch(cause)) => {
          warn!("Resource from '{}' failed verification, trying the next mirror: {}", url, cause);
        },
      }
    }

    // Every mirror failed. If the output directory was created for nothing,
    // take it back out; pre-existing sibling files or concurrent use may
    // legitimately prevent that.
    let _ = std::fs::remove_dir(&output_dir);
    Ok(false)
  }

  async fn attempt(&self, client: &reqwest::Client, url: &str, dest: &Path, resource_name: &str, entry: &ResourceEntry, options: &FetchOptions) -> Result<AttemptOutcome, Error> {
    if options.check_cached && is_cached(dest, resource_name)? {
      return Ok(AttemptOutcome::CacheHit);
    }

    if let Err(error) = fetch_file(client, url, dest, options.check_cached, options.show_progress_bar).await {
      return Ok(AttemptOutcome::Failed(AttemptFailure::Connection(error)));
    }

    if options.check_resource_hash {
      let actual = file_sha256(dest).await?;
      if actual != entry.sha256 {
        remove_artifact(dest).await?;
        return Ok(AttemptOutcome::Failed(AttemptFailure::HashMismatch(Error::HashMismatch(entry.sha256.clone(), actual))));
      }
    }

    decompress(dest, options.clean_compressed_files).await?;
    Ok(AttemptOutcome::Complete)
  }
}

/// A resource counts as cached when its bare name exists as a file or
/// directory, or when a `{name}.<ext>` sibling exists that is not a leftover
/// archive. Unrelated files merely sharing the name as a prefix do not count.
fn is_cached(dest: &Path, resource_name: &str) -> Result<bool, Error> {
  let dir = match dest.parent() {
    Some(dir) => dir,
    None => return Ok(false),
  };
  let bare = dir.join(resource_name);
  if bare.is_dir() || bare.is_file() {
    return Ok(true);
  }
  let prefix = format!("{}.", resource_name);
  for entry in std::fs::read_dir(dir)? {
    let name = entry?.file_name().to_string_lossy().into_owned();
    if name.starts_with(&prefix) && !name.ends_with(".zip") && !name.ends_with(".tar") {
      return Ok(true);
    }
  }
  Ok(false)
}

/// A mismatched artifact must never stay on disk claiming to be valid. It is
/// normally a file, but a decompressed directory form is covered as well.
async fn remove_artifact(dest: &Path) -> Result<(), Error> {
  if dest.is_file() {
    tokio::fs::remove_file(dest).await?;
  } else if dest.is_dir() {
    tokio::fs::remove_dir_all(dest).await?;
  }
  Ok(())
}

/// Expands `~` and environment variables, then anchors relative paths to the
/// current directory.
fn normalize_output_dir(raw: &str) -> PathBuf {
  let expanded = expand_env_vars(raw.trim());
  let path = if expanded == "~" || expanded.starts_with("~/") {
    match dirs::home_dir() {
      Some(home) => home.join(expanded.trim_start_matches('~').trim_start_matches('/')),
      None => PathBuf::from(expanded),
    }
  } else {
    PathBuf::from(expanded)
  };
  if path.is_absolute() {
    path
  } else {
    std::env::current_dir().map(|cwd| cwd.join(&path)).unwrap_or(path)
  }
}

fn expand_env_vars(input: &str) -> String {
  let mut output = String::with_capacity(input.len());
  let mut chars = input.chars().peekable();
  while let Some(current) = chars.next() {
    if current != '$' {
      output.push(current);
      continue;
    }
    let braced = chars.peek() == Some(&'{');
    if braced {
      chars.next();
    }
    let mut name = String::new();
    while let Some(&next) = chars.peek() {
      if braced && next == '}' {
        break;
      }
      if !braced && !(next.is_ascii_alphanumeric() || next == '_') {
        break;
      }
      name.push(next);
      chars.next();
    }
    if braced {
      chars.next();
    }
    match std::env::var(&name) {
      Ok(value) if !name.is_empty() => output.push_str(&value),
      _ => {
        // Unknown references stay as written.
        output.push('$');
        if braced {
          output.push('{');
        }
        output.push_str(&name);
        if braced {
          output.push('}');
        }
      },
    }
  }
  output
}

#[cfg(test)]
mod tests {
  use super::{expand_env_vars, is_cached, normalize_output_dir};

  #[test]
  fn env_vars_expand_in_both_spellings() {
    std::env::set_var("MODEL_FETCHER_TEST_DIR", "resources");
    assert_eq!(expand_env_vars("/data/$MODEL_FETCHER_TEST_DIR/x"), "/data/resources/x");
    assert_eq!(expand_env_vars("/data/${MODEL_FETCHER_TEST_DIR}/x"), "/data/resources/x");
    assert_eq!(expand_env_vars("/data/$MODEL_FETCHER_UNSET/x"), "/data/$MODEL_FETCHER_UNSET/x");
  }

  #[test]
  fn relative_paths_become_absolute() {
    assert!(normalize_output_dir("somewhere/nested").is_absolute());
  }

  #[test]
  fn cache_marker_ignores_prefix_sharing_neighbours() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("crf-base.zip");

    std::fs::write(dir.path().join("crf-base-v2.bin"), b"unrelated").unwrap();
    assert!(!is_cached(&dest, "crf-base").unwrap());

    std::fs::write(dir.path().join("crf-base.bin"), b"the artifact").unwrap();
    assert!(is_cached(&dest, "crf-base").unwrap());
  }

  #[test]
  fn leftover_archives_are_not_cache_markers() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("crf-base.zip");

    std::fs::write(&dest, b"half a download").unwrap();
    assert!(!is_cached(&dest, "crf-base").unwrap());

    std::fs::create_dir(dir.path().join("crf-base")).unwrap();
    assert!(is_cached(&dest, "crf-base").unwrap());
  }
}
