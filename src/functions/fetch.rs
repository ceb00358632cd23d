use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::structures::Error;

/// Removes a partially written download unless the transfer completed.
///
/// The fetch future being dropped mid-transfer (ctrl-c in the CLI, a caller
/// timeout) runs this as well, so no truncated artifact survives any exit
/// path.
struct PartialFileGuard {
  path: PathBuf,
  armed: bool,
}

impl PartialFileGuard {
  fn new(path: PathBuf) -> Self {
    Self { path, armed: true }
  }

  fn disarm(&mut self) {
    self.armed = false;
  }
}

impl Drop for PartialFileGuard {
  fn drop(&mut self) {
    if self.armed && self.path.is_file() {
      if let Err(error) = std::fs::remove_file(&self.path) {
        warn!("Could not remove partial download '{}': {}", self.path.display(), error);
      }
    }
  }
}

/// Downloads one URL to one destination path.
///
/// The connection-establishment timeout lives on `client`, so nothing
/// process-wide is overridden while the transfer runs. Every transport
/// failure (DNS, refused connection, timeout, HTTP error status, truncated
/// body) deletes the partial file and comes back as `Error::ConnectionError`
/// carrying the cause.
pub(crate) async fn fetch_file(client: &reqwest::Client, url: &str, dest: &Path, check_cached: bool, show_progress: bool) -> Result<(), Error> {
  if check_cached && dest.is_file() {
    return Ok(());
  }

  let mut guard = PartialFileGuard::new(dest.to_path_buf());
  match transfer(client, url, dest, show_progress).await {
    Ok(()) => {
      guard.disarm();
      Ok(())
    },
    Err(source) => Err(Error::ConnectionError(url.to_string(), source)),
  }
}

async fn transfer(client: &reqwest::Client, url: &str, dest: &Path, show_progress: bool) -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
  let response = client.get(url)
    .header("User-Agent", format!("model-fetcher ({})", env!("CARGO_PKG_VERSION")))
    .send()
    .await?
    .error_for_status()?;

  let total_size = response.content_length();
  let progress = if show_progress {
    Some(progress_bar(total_size, dest))
  } else {
    None
  };

  let mut file = tokio::fs::File::create(dest).await?;
  let mut downloaded: u64 = 0;
  let mut stream = response.bytes_stream();
  while let Some(chunk) = stream.next().await {
    let chunk = chunk?;
    file.write_all(&chunk).await?;
    downloaded += chunk.len() as u64;
    if let Some(bar) = &progress {
      bar.set_position(downloaded);
    }
  }
  file.flush().await?;

  if let Some(bar) = &progress {
    bar.finish();
  }
  Ok(())
}

fn progress_bar(total_size: Option<u64>, dest: &Path) -> ProgressBar {
  let filename = dest.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
  let bar = match total_size {
    Some(length) => {
      let bar = ProgressBar::new(length);
      bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
          .unwrap_or_else(|_| ProgressStyle::default_bar())
          .progress_chars("=>-"),
      );
      bar
    },
    None => {
      let bar = ProgressBar::new_spinner();
      bar.set_style(
        ProgressStyle::with_template("{msg} {spinner} {bytes} ({bytes_per_sec})")
          .unwrap_or_else(|_| ProgressStyle::default_spinner()),
      );
      bar
    },
  };
  bar.set_message(format!("Downloading {}", filename));
  bar
}
