use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::structures::Error;

/// Artifacts are routinely multiple gigabytes, so the file is fed to the
/// hasher in large fixed-size blocks: memory stays bounded without paying
/// per-call overhead on every few kilobytes.
const READ_BLOCK_SIZE: usize = 256 * 1024 * 1024;

/// Opens a file and calculates its SHA256 hash, returned as lowercase hex.
///
/// A missing or unreadable file propagates as an I/O error. After a claimed
/// successful download that is an invariant violation, not a condition to
/// recover from here.
pub(crate) async fn file_sha256(file_path: &Path) -> Result<String, Error> {
  let file_path = file_path.to_path_buf();
  tokio::task::spawn_blocking(move || {
    let mut file = std::fs::OpenOptions::new().read(true).open(&file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BLOCK_SIZE];
    loop {
      let read = file.read(&mut buffer)?;
      if read == 0 {
        break;
      }
      hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
  }).await?
}

#[cfg(test)]
mod tests {
  use sha2::{Digest, Sha256};

  use super::file_sha256;
  use crate::structures::Error;

  #[tokio::test]
  async fn digest_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    std::fs::write(&path, b"some model weights").unwrap();

    let expected = hex::encode(Sha256::digest(b"some model weights"));
    assert_eq!(file_sha256(&path).await.unwrap(), expected);
  }

  #[tokio::test]
  async fn single_byte_mutation_changes_the_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    std::fs::write(&path, b"some model weights").unwrap();
    let original = file_sha256(&path).await.unwrap();

    std::fs::write(&path, b"some model weightz").unwrap();
    assert_ne!(file_sha256(&path).await.unwrap(), original);
  }

  #[tokio::test]
  async fn missing_file_propagates_as_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = file_sha256(&dir.path().join("gone.bin")).await;
    assert!(matches!(result, Err(Error::IoError(_))));
  }
}
