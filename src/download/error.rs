use thiserror::Error;

use super::crypto::CryptoError;
use super::ordinal::OrdinalError;
use crate::api::error::ApiError;

/// A page task's failure. Unlike the soft skips in [`super::PageOutcome`],
/// these count against the batch and fail the run; re-running the command
/// resumes safely because finished pages are skipped on disk.
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error(transparent)]
    Ordinal(#[from] OrdinalError),

    #[error(transparent)]
    Decrypt(#[from] CryptoError),

    #[error("disk error: {0}")]
    Disk(#[from] std::io::Error),
}

/// How a single page task ended. Skips are deliberate, logged, and never
/// fail the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Downloaded,
    /// Destination file already present and overwrite is off.
    AlreadyExists,
    /// The page descriptor carried no image URL.
    MissingUrl,
    /// The image URL did not match the expected encrypted-filename pattern.
    UnrecognizedUrl,
}
