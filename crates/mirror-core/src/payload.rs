//! Locating the netCDF payload of a resource
//!
//! Only one payload is tracked per resource: the first primary replica with
//! a `.nc` name, in the order the remote listing reports it. Resources with
//! several netCDF files are therefore refreshed only when that first file
//! changes.

use mirror_remote::listing::{self, ListingEntry, last_segment};
use mirror_remote::RemoteRepository;

use crate::Result;
use crate::resource::{PAYLOAD_SUFFIX, Payload, join_remote};

/// Sub-collection of a resource that holds its user content.
pub const CONTENT_DIR: &str = "data/contents";

/// Remote path of the content area of a resource.
pub fn content_path(resource_path: &str) -> String {
    join_remote(resource_path, CONTENT_DIR)
}

/// Find the payload of the resource at `resource_path`.
///
/// Returns `None` when the resource has nothing worth mirroring.
pub fn locate_payload<R: RemoteRepository + ?Sized>(
    remote: &R,
    resource_path: &str,
) -> Result<Option<Payload>> {
    let entries = listing::list_entries(remote, &content_path(resource_path))?;
    let payload = select_payload(resource_path, &entries);
    match &payload {
        Some(p) => tracing::debug!(
            resource_path,
            file = %p.filename,
            timestamp = %p.timestamp,
            "located payload"
        ),
        None => tracing::debug!(resource_path, "no payload found"),
    }
    Ok(payload)
}

/// Pick the payload from listing records.
///
/// The relative path is the record's directory sliced from the first
/// segment equal to the resource id. If the first candidate's directory
/// has no such segment, no payload is reported.
pub fn select_payload(resource_path: &str, entries: &[ListingEntry]) -> Option<Payload> {
    let resource_id = last_segment(resource_path);
    if resource_id.is_empty() {
        return None;
    }

    let candidate = entries
        .iter()
        .find(|e| e.is_primary_replica() && e.name.ends_with(PAYLOAD_SUFFIX))?;
    let start = segment_offset(&candidate.directory, resource_id)?;

    Some(Payload {
        relative_path: candidate.directory[start..].to_string(),
        filename: candidate.name.clone(),
        timestamp: candidate.mod_time.clone(),
    })
}

/// Byte offset of the first `/`-delimited segment equal to `segment`.
fn segment_offset(path: &str, segment: &str) -> Option<usize> {
    let mut offset = 0;
    for part in path.split('/') {
        if part == segment {
            return Some(offset);
        }
        offset += part.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_offset_matches_whole_segments() {
        assert_eq!(segment_offset("/zone/home/abcproxy/abc/data", "abc"), Some(20));
        assert_eq!(segment_offset("abc/data/contents", "abc"), Some(0));
        assert_eq!(segment_offset("/zone/home/abcproxy/data", "abc"), None);
        assert_eq!(segment_offset("/zone/home/xabc", "abc"), None);
    }
}
