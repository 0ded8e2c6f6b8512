//! Error types for mirror-remote

use std::path::PathBuf;

/// Result type for remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the remote repository.
///
/// Each variant corresponds to one remote primitive. Nonzero exits of the
/// underlying command carry the exit code and captured stderr.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path could not be entered on the remote side
    #[error("Remote path not found: {path}")]
    PathNotFound { path: String },

    /// Listing a collection failed
    #[error("Listing {path} failed (exit code {code}): {stderr}")]
    ListingFailure {
        path: String,
        code: i32,
        stderr: String,
    },

    /// Reading collection metadata failed
    #[error("Reading metadata of {collection} failed (exit code {code}): {stderr}")]
    MetadataReadFailure {
        collection: String,
        code: i32,
        stderr: String,
    },

    /// Copying a resource tree to the local mirror failed
    #[error("Copying {remote} to {} failed (exit code {code}): {stderr}", .dest.display())]
    CopyFailure {
        remote: String,
        dest: PathBuf,
        code: i32,
        stderr: String,
    },

    /// The command could not be started at all
    #[error("Failed to run {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether the error means the path simply does not exist remotely.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }
}
