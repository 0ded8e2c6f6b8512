//! Local mirror state: entry directories and sidecar timestamps
//!
//! A mirrored resource lives at `<mirror_root>/<resource_id>`. Next to its
//! payload sits `<payload>.ts`, holding the remote modification token seen
//! at the last successful copy.

use std::path::Path;

use mirror_fs::{NormalizedPath, io};

use crate::resource::Payload;
use crate::{Error, Result};

/// Reads and writes mirror entries under one mirror root.
#[derive(Debug, Clone)]
pub struct SidecarStore {
    mirror_root: NormalizedPath,
}

impl SidecarStore {
    pub fn new(mirror_root: impl AsRef<Path>) -> Self {
        Self {
            mirror_root: NormalizedPath::new(mirror_root),
        }
    }

    pub fn mirror_root(&self) -> &NormalizedPath {
        &self.mirror_root
    }

    /// Directory of the mirror entry for a resource.
    pub fn entry_path(&self, resource_id: &str) -> NormalizedPath {
        self.mirror_root.join(resource_id)
    }

    pub fn entry_exists(&self, resource_id: &str) -> bool {
        self.entry_path(resource_id).is_dir()
    }

    /// Location of the sidecar for a payload.
    pub fn sidecar_path(&self, payload: &Payload) -> NormalizedPath {
        self.mirror_root
            .join(&payload.relative_path)
            .join(&payload.sidecar_name())
    }

    /// The recorded token, or `None` if no sidecar exists.
    pub fn read(&self, payload: &Payload) -> Result<Option<String>> {
        let path = self.sidecar_path(payload);
        io::read_text_if_exists(&path).map_err(|source| Error::SidecarRead {
            path: path.to_native(),
            source,
        })
    }

    /// Record the payload's current token, replacing any previous one.
    pub fn write(&self, payload: &Payload) -> Result<()> {
        let path = self.sidecar_path(payload);
        io::write_text(&path, &payload.timestamp).map_err(|source| Error::SidecarWrite {
            path: path.to_native(),
            source,
        })
    }

    /// Remove a mirror entry and everything under it.
    ///
    /// Returns `false` if there was no entry.
    pub fn evict(&self, resource_id: &str) -> Result<bool> {
        let path = self.entry_path(resource_id);
        io::remove_tree(&path).map_err(|source| Error::Eviction {
            path: path.to_native(),
            source,
        })
    }
}
