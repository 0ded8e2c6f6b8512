//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing the mirror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required configuration is missing or malformed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A resource identifier that cannot name a single mirror directory
    #[error("Invalid resource id: {id:?}")]
    InvalidResourceId { id: String },

    /// The resource is absent from every configured source root
    #[error("Resource {resource_id} not found under any source root (tried {})", .tried.join(", "))]
    UnresolvedSource {
        resource_id: String,
        tried: Vec<String>,
    },

    /// The sidecar timestamp exists but could not be read
    #[error("Failed to read sidecar {}: {source}", .path.display())]
    SidecarRead {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// The sidecar timestamp could not be written
    #[error("Failed to write sidecar {}: {source}", .path.display())]
    SidecarWrite {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// A mirror entry could not be removed
    #[error("Failed to evict mirror entry {}: {source}", .path.display())]
    Eviction {
        path: PathBuf,
        #[source]
        source: mirror_fs::Error,
    },

    /// Error from the remote repository
    #[error(transparent)]
    Remote(#[from] mirror_remote::Error),

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}
