//! Resource-level value types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File name suffix of a payload worth mirroring.
pub const PAYLOAD_SUFFIX: &str = ".nc";

/// Suffix appended to a payload file name to form its sidecar.
pub const SIDECAR_SUFFIX: &str = ".ts";

/// Declared type of a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A resource whose content is a netCDF dataset
    NetcdfResource,
    /// A composite resource that may embed netCDF files
    CompositeResource,
    /// Anything else, kept verbatim
    Other(String),
}

impl ResourceType {
    /// Parse a metadata value; matching ignores case and surrounding space.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "netcdfresource" => Self::NetcdfResource,
            "compositeresource" => Self::CompositeResource,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    /// Only these types are ever mirrored.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::NetcdfResource | Self::CompositeResource)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetcdfResource => write!(f, "NetcdfResource"),
            Self::CompositeResource => write!(f, "CompositeResource"),
            Self::Other(name) if name.is_empty() => write!(f, "<none>"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Visibility and type of a resource, as read from its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_public: bool,
    pub resource_type: ResourceType,
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        self.resource_type.is_eligible()
    }
}

/// The payload file tracked for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// Directory of the payload relative to the mirror root, starting with
    /// the resource id (e.g. `abc123/data/contents`)
    pub relative_path: String,
    pub filename: String,
    /// Remote modification time token, compared verbatim
    pub timestamp: String,
}

impl Payload {
    /// File name of the sidecar recording this payload's timestamp.
    pub fn sidecar_name(&self) -> String {
        format!("{}{}", self.filename, SIDECAR_SUFFIX)
    }
}

/// Join a remote root and a child segment with exactly one `/`.
pub fn join_remote(root: &str, segment: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), segment.trim_start_matches('/'))
}

/// Reject ids that would not name exactly one directory under the mirror root.
pub fn validate_resource_id(id: &str) -> Result<()> {
    let invalid = id.is_empty()
        || id != id.trim()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if invalid {
        return Err(Error::InvalidResourceId { id: id.to_string() });
    }
    Ok(())
}
