//! Parsers for `ils` output
//!
//! Two formats are understood.
//!
//! Short listings (`ils [path]`) print a header line for the listed
//! collection followed by one line per child. Sub-collections are prefixed
//! with `C-` and shown by absolute path, data objects by bare name:
//!
//! ```text
//! /zone/home/proxy:
//!   C- /zone/home/proxy/0a1b2c
//!   C- /zone/home/proxy/bags
//!   readme.txt
//! ```
//!
//! Long recursive listings (`ils -rl path`) print a bare `path:` header for
//! every collection visited, followed by one record per data-object replica:
//!
//! ```text
//! /zone/home/proxy/0a1b2c/data/contents:
//!   proxy  0 hsResc  10240 2017-03-01.10:00 & foo.nc
//!   C- /zone/home/proxy/0a1b2c/data/contents/sub
//! ```
//!
//! A record is a line of exactly seven whitespace separated fields: owner,
//! replica index, storage resource, size, modification time, status marker
//! and file name. Names containing whitespace therefore never parse as
//! records. Lines that are neither headers nor records are ignored.

use crate::{RemoteRepository, Result};

/// Replica index of the primary copy of a data object.
pub const PRIMARY_REPLICA: u32 = 0;

const RECORD_FIELDS: usize = 7;

/// A direct child of a listed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildEntry {
    /// A sub-collection, reported by absolute path
    Collection { path: String },
    /// A data object, reported by name
    DataObject { name: String },
}

impl ChildEntry {
    /// The last path segment of the entry.
    pub fn name(&self) -> &str {
        match self {
            Self::Collection { path } => last_segment(path),
            Self::DataObject { name } => name,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection { .. })
    }
}

/// One replica record from a long recursive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Collection the record was listed under (most recent header)
    pub directory: String,
    pub name: String,
    pub replica_index: u32,
    /// Byte size, when the listing reports a number
    pub size: Option<u64>,
    /// Modification time token, kept verbatim
    pub mod_time: String,
}

impl ListingEntry {
    pub fn is_primary_replica(&self) -> bool {
        self.replica_index == PRIMARY_REPLICA
    }
}

/// Parse a short listing into its children, dropping the header.
pub fn parse_children<S: AsRef<str>>(lines: &[S]) -> Vec<ChildEntry> {
    let mut children = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || header_path(line).is_some() {
            continue;
        }
        match line.strip_prefix("C-") {
            Some(path) => children.push(ChildEntry::Collection {
                path: path.trim().to_string(),
            }),
            None => children.push(ChildEntry::DataObject {
                name: line.to_string(),
            }),
        }
    }
    children
}

/// Parse a long recursive listing into replica records.
///
/// Records seen before the first header get an empty directory.
pub fn parse_long_listing<S: AsRef<str>>(lines: &[S]) -> Vec<ListingEntry> {
    let mut directory = String::new();
    let mut entries = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if let Some(path) = header_path(line) {
            directory = path.to_string();
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != RECORD_FIELDS {
            continue;
        }
        let Ok(replica_index) = fields[1].parse::<u32>() else {
            tracing::trace!(line, "skipping listing line with non-numeric replica");
            continue;
        };

        entries.push(ListingEntry {
            directory: directory.clone(),
            name: fields[6].to_string(),
            replica_index,
            size: fields[3].parse().ok(),
            mod_time: fields[4].to_string(),
        });
    }

    entries
}

/// Recursively list `path` and parse the records.
pub fn list_entries<R: RemoteRepository + ?Sized>(
    remote: &R,
    path: &str,
) -> Result<Vec<ListingEntry>> {
    let lines = remote.list_recursive_long(path)?;
    Ok(parse_long_listing(&lines))
}

/// Last `/`-separated segment, ignoring a trailing slash.
pub fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// A header is a single token ending in `:`.
fn header_path(line: &str) -> Option<&str> {
    if line.contains(char::is_whitespace) {
        return None;
    }
    line.strip_suffix(':')
}
