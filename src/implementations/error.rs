use crate::structures::Error;

impl std::error::Error for Error { }

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Self::UnknownTask(task, valid) => {
        write!(f, "Unknown task '{}'. Please provide one of the following: {}.", task, quote_join(valid))
      },
      Self::UnknownResource(task, resource, valid) => {
        write!(f, "Unknown resource '{}' for task '{}'. Please provide one of the following resources: {}.", resource, task, quote_join(valid))
      },
      Self::HashMismatch(expected, actual) => {
        write!(f, "Resource hash (SHA256) {} does not match the expected value {}", actual, expected)
      },
      Self::IoError(error) => write!(f, "{}", error),
      Self::JoinError(error) => write!(f, "{}", error),
      Self::JsonError(error) => write!(f, "{}", error),
      Self::ZipError(error) => write!(f, "{}", error),
      Self::HttpError(error) => write!(f, "{}", error),
      Self::ConnectionError(url, error) => {
        write!(f, "Could not download resource from '{}': {}", url, error)
      },
    }
  }
}

fn quote_join(values: &[String]) -> String {
  values.iter().map(|value| format!("'{}'", value)).collect::<Vec<String>>().join(", ")
}

impl From<std::io::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: std::io::Error) -> Self {
    log_error(&error);
    Self::IoError(error)
  }
}

impl From<tokio::task::JoinError> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: tokio::task::JoinError) -> Self {
    log_error(&error);
    Self::JoinError(error)
  }
}

impl From<serde_json::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: serde_json::Error) -> Self {
    log_error(&error);
    Self::JsonError(error)
  }
}

impl From<zip::result::ZipError> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: zip::result::ZipError) -> Self {
    log_error(&error);
    Self::ZipError(error)
  }
}

impl From<reqwest::Error> for Error {
  #[track_caller]
  #[inline(always)]
  fn from(error: reqwest::Error) -> Self {
    log_error(&error);
    Self::HttpError(error)
  }
}

#[track_caller]
fn log_error(error: &(impl std::error::Error + ?Sized)) {
  tracing::error!("{:?}", error);
}
