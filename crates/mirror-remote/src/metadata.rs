//! Parser for `imeta ls -C` output
//!
//! Metadata is printed as alternating labelled lines, separated by `----`
//! rulers and preceded by a banner:
//!
//! ```text
//! AVUs defined for collection /zone/home/proxy/0a1b2c:
//! attribute: isPublic
//! value: true
//! units:
//! ----
//! attribute: resourceType
//! value: NetcdfResource
//! units:
//! ```

use crate::{RemoteRepository, Result};

/// One attribute/value pair, trimmed but otherwise verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avu {
    pub attribute: String,
    pub value: String,
}

/// Pair up `attribute:` and `value:` lines.
///
/// Only the first `:` separates label from content, so values may contain
/// colons. A `value:` line with no pending attribute is dropped, as is an
/// attribute that is never followed by a value.
pub fn parse_avus<S: AsRef<str>>(lines: &[S]) -> Vec<Avu> {
    let mut avus = Vec::new();
    let mut pending: Option<String> = None;

    for line in lines {
        let Some((label, content)) = line.as_ref().trim().split_once(':') else {
            continue;
        };
        let content = content.trim();
        match label.trim().to_ascii_lowercase().as_str() {
            "attribute" => pending = Some(content.to_string()),
            "value" => {
                if let Some(attribute) = pending.take() {
                    avus.push(Avu {
                        attribute,
                        value: content.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    avus
}

/// Fetch and parse the metadata of a collection.
pub fn read_avus<R: RemoteRepository + ?Sized>(remote: &R, collection: &str) -> Result<Vec<Avu>> {
    let lines = remote.get_metadata(collection)?;
    Ok(parse_avus(&lines))
}
