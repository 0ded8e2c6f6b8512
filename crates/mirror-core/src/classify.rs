//! Visibility and type classification from collection metadata

use mirror_remote::{Avu, RemoteRepository, metadata};

use crate::Result;
use crate::resource::{Classification, ResourceType};

/// Metadata attribute holding the public flag.
pub const PUBLIC_ATTRIBUTE: &str = "isPublic";

/// Metadata attribute holding the resource type.
pub const TYPE_ATTRIBUTE: &str = "resourceType";

/// Read and classify the metadata of `collection`.
pub fn classify<R: RemoteRepository + ?Sized>(remote: &R, collection: &str) -> Result<Classification> {
    let avus = metadata::read_avus(remote, collection)?;
    let classification = classify_avus(&avus);
    tracing::debug!(
        collection,
        public = classification.is_public,
        resource_type = %classification.resource_type,
        "classified resource"
    );
    Ok(classification)
}

/// Classify already-parsed metadata.
///
/// Attribute names match case-insensitively. When an attribute repeats, the
/// last value wins. Missing attributes leave the resource private and
/// untyped.
pub fn classify_avus(avus: &[Avu]) -> Classification {
    let mut is_public = false;
    let mut resource_type = ResourceType::Other(String::new());

    for avu in avus {
        let attribute = avu.attribute.trim();
        if attribute.eq_ignore_ascii_case(PUBLIC_ATTRIBUTE) {
            is_public = avu.value.trim().eq_ignore_ascii_case("true");
        } else if attribute.eq_ignore_ascii_case(TYPE_ATTRIBUTE) {
            resource_type = ResourceType::parse(&avu.value);
        }
    }

    Classification {
        is_public,
        resource_type,
    }
}
