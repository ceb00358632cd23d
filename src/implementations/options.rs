use crate::structures::FetchOptions;

impl Default for FetchOptions {
  fn default() -> Self {
    Self {
      show_progress_bar: true,
      check_cached: true,
      clean_compressed_files: true,
      check_resource_hash: true,
      timeout_secs: 10,
    }
  }
}

impl FetchOptions {
  pub fn new() -> Self {
    Self::default()
  }
}
