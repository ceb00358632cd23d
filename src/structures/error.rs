#[derive(Debug)]
pub enum Error {
  /// Task name not present in the registry, second field lists the valid names
  UnknownTask(String, Vec<String>),
  /// Resource name not present under a known task: task, resource, valid names
  UnknownResource(String, String, Vec<String>),
  /// Digest of a downloaded artifact differed from the registry value: expected, actual
  HashMismatch(String, String),
  IoError(std::io::Error),
  JoinError(tokio::task::JoinError),
  JsonError(serde_json::Error),
  ZipError(zip::result::ZipError),

  // Download related errors:
  HttpError(reqwest::Error),
  /// Transport failure while fetching a mirror URL, first field is the URL
  ConnectionError(String, Box<dyn std::error::Error + Sync + std::marker::Send>),
}
