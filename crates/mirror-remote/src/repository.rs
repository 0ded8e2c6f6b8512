//! Capability interface over the remote store

use std::path::Path;

use crate::Result;

/// The remote primitives the mirror needs.
///
/// Every call blocks until the remote side answers. Implementations do not
/// retry; a failed call is reported once and the caller decides what to do.
/// Listing and metadata calls return raw output lines so that the parsing
/// heuristics live in one place (see [`crate::listing`] and
/// [`crate::metadata`]).
pub trait RemoteRepository {
    /// Enter a remote collection, or the session's home collection for `None`.
    fn navigate(&self, path: Option<&str>) -> Result<()>;

    /// List the direct children of a collection (current one for `None`).
    fn list_children(&self, path: Option<&str>) -> Result<Vec<String>>;

    /// Long-form recursive listing of a collection.
    fn list_recursive_long(&self, path: &str) -> Result<Vec<String>>;

    /// Attribute/value metadata lines attached to a collection.
    fn get_metadata(&self, collection: &str) -> Result<Vec<String>>;

    /// Copy the whole tree at `source` into `dest_root`, overwriting.
    ///
    /// The tree lands at `dest_root/<last segment of source>`.
    fn fetch_tree(&self, source: &str, dest_root: &Path) -> Result<()>;
}

impl<T: RemoteRepository + ?Sized> RemoteRepository for &T {
    fn navigate(&self, path: Option<&str>) -> Result<()> {
        (**self).navigate(path)
    }

    fn list_children(&self, path: Option<&str>) -> Result<Vec<String>> {
        (**self).list_children(path)
    }

    fn list_recursive_long(&self, path: &str) -> Result<Vec<String>> {
        (**self).list_recursive_long(path)
    }

    fn get_metadata(&self, collection: &str) -> Result<Vec<String>> {
        (**self).get_metadata(collection)
    }

    fn fetch_tree(&self, source: &str, dest_root: &Path) -> Result<()> {
        (**self).fetch_tree(source, dest_root)
    }
}

impl<T: RemoteRepository + ?Sized> RemoteRepository for Box<T> {
    fn navigate(&self, path: Option<&str>) -> Result<()> {
        (**self).navigate(path)
    }

    fn list_children(&self, path: Option<&str>) -> Result<Vec<String>> {
        (**self).list_children(path)
    }

    fn list_recursive_long(&self, path: &str) -> Result<Vec<String>> {
        (**self).list_recursive_long(path)
    }

    fn get_metadata(&self, collection: &str) -> Result<Vec<String>> {
        (**self).get_metadata(collection)
    }

    fn fetch_tree(&self, source: &str, dest_root: &Path) -> Result<()> {
        (**self).fetch_tree(source, dest_root)
    }
}
