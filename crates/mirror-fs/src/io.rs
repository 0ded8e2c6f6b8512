//! Atomic I/O operations with file locking

use std::fs;
use std::io::Write;

use fs2::FileExt;
use tempfile::Builder;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file.
///
/// The content goes to a temporary file in the destination directory, which
/// is flushed and then renamed over the target. If anything fails before the
/// rename the temporary file is removed on drop and the target is untouched.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    let parent = match native_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| Error::io(&parent, e))?;

    // Same directory keeps the rename on one filesystem
    let prefix = format!(".{}.", path.file_name().unwrap_or("write"));
    let mut temp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(|e| Error::io(&parent, e))?;

    temp.as_file()
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: native_path.clone(),
        })?;

    temp.write_all(content)
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io(temp.path(), e))?;

    temp.persist(&native_path)
        .map_err(|e| Error::io(&native_path, e.error))?;

    tracing::trace!(path = %path, bytes = content.len(), "atomic write complete");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, returning `None` when the file does not exist.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Recursively remove a directory tree.
///
/// Returns `false` if there was nothing to remove.
pub fn remove_tree(path: &NormalizedPath) -> Result<bool> {
    let native_path = path.to_native();
    if !native_path.is_dir() {
        return Ok(false);
    }
    fs::remove_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(true)
}
