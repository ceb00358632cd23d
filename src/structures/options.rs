/// Per-resolve behaviour switches, mirroring the CLI flags.
#[derive(Debug, Clone)]
pub struct FetchOptions {
  /// Render a progress bar while a transfer is running
  pub show_progress_bar: bool,
  /// Skip the network entirely when a matching local artifact already exists
  pub check_cached: bool,
  /// Delete archives after successful extraction
  pub clean_compressed_files: bool,
  /// Verify the SHA-256 digest of every downloaded artifact
  pub check_resource_hash: bool,
  /// Connection-establishment timeout, in seconds
  pub timeout_secs: u64,
}
