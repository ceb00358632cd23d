use crate::structures::Error;

/// Outcome of a single mirror attempt. The retry loop matches on the tag to
/// decide whether to stop or move on to the next URL.
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
  /// Fetched, verified and decompressed from this mirror
  Complete,
  /// A matching local artifact already exists, nothing was downloaded
  CacheHit,
  Failed(AttemptFailure),
}

/// The two recoverable ways a mirror attempt can fail. Both get the same
/// try-the-next-mirror treatment, but a hash mismatch additionally means the
/// corrupted artifact was deleted before moving on.
#[derive(Debug)]
pub(crate) enum AttemptFailure {
  Connection(Error),
  /// Carries an [Error::HashMismatch] naming the expected and actual digests
  HashMismatch(Error),
}
