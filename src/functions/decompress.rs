use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::structures::Error;

enum ArchiveKind {
  Zip,
  Tar,
}

/// Extracts `.zip` and `.tar` archives into their containing directory,
/// deleting the archive afterwards when `delete_after` is set. Any other
/// extension is a no-op: most artifacts are plain files.
///
/// Entry names inside registry-declared archives are trusted as-is.
pub(crate) async fn decompress(archive_path: &Path, delete_after: bool) -> Result<(), Error> {
  let kind = match archive_path.extension().and_then(|ext| ext.to_str()) {
    Some("zip") => ArchiveKind::Zip,
    Some("tar") => ArchiveKind::Tar,
    _ => return Ok(()),
  };

  let archive_path = archive_path.to_path_buf();
  tokio::task::spawn_blocking(move || {
    let target = archive_path.parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| PathBuf::from("."));
    info!("Extracting {} into {}", archive_path.display(), target.display());
    match kind {
      ArchiveKind::Zip => {
        let file = File::open(&archive_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        archive.extract(&target)?;
      },
      ArchiveKind::Tar => {
        let file = File::open(&archive_path)?;
        let mut archive = tar::Archive::new(file);
        archive.unpack(&target)?;
      },
    }
    if delete_after {
      std::fs::remove_file(&archive_path)?;
    }
    Ok(())
  }).await?
}
