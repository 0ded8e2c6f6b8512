//! Locating the remote root that holds a resource

use mirror_remote::RemoteRepository;
use tracing::debug;

use crate::resource::join_remote;
use crate::{Error, Result};

/// Finds which configured root contains a resource.
///
/// Roots are tried in the order given; a root contains the resource when
/// `<root>/<id>` can be navigated to.
pub struct PathResolver<'a, R: ?Sized> {
    remote: &'a R,
    roots: Vec<&'a str>,
}

impl<'a, R: RemoteRepository + ?Sized> PathResolver<'a, R> {
    pub fn new(remote: &'a R, roots: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            remote,
            roots: roots.into_iter().collect(),
        }
    }

    /// Resolve the full remote path of `resource_id`.
    ///
    /// # Errors
    ///
    /// `UnresolvedSource` if no root holds the resource. Remote failures
    /// other than a missing path are returned as they are.
    pub fn resolve(&self, resource_id: &str) -> Result<String> {
        let mut tried = Vec::with_capacity(self.roots.len());

        for root in &self.roots {
            let candidate = join_remote(root, resource_id);
            match self.remote.navigate(Some(candidate.as_str())) {
                Ok(()) => {
                    debug!(resource_id, source = %candidate, "resolved resource");
                    return Ok(candidate);
                }
                Err(e) if e.is_path_not_found() => {
                    debug!(resource_id, candidate = %candidate, "not under this root");
                    tried.push(candidate);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::UnresolvedSource {
            resource_id: resource_id.to_string(),
            tried,
        })
    }
}
