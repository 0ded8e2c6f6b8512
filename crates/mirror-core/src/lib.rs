//! Selective synchronization engine for the public netCDF mirror
//!
//! Decides, per remote resource, whether its local mirror should be copied,
//! refreshed, left alone or evicted, and carries that decision out:
//!
//! - **Path resolution**: find which configured zone holds a resource
//! - **Classification**: read visibility and resource type from metadata
//! - **Payload location**: find the netCDF file and its modification token
//! - **Mirror state**: sidecar timestamp files next to mirrored payloads
//! - **SyncEngine**: the per-resource state machine and root walks
//!
//! # Architecture
//!
//! ```text
//!                  mirror-cli
//!                      |
//!                 mirror-core
//!                  /        \
//!          mirror-fs    mirror-remote
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod payload;
pub mod resolver;
pub mod resource;
pub mod state;
pub mod sync;

pub use classify::classify;
pub use config::{ConfigLayer, MirrorConfig};
pub use error::{Error, Result};
pub use payload::locate_payload;
pub use resolver::PathResolver;
pub use resource::{Classification, Payload, ResourceType, validate_resource_id};
pub use state::SidecarStore;
pub use sync::{
    FailurePolicy, ResourceFailure, ResourceOutcome, SkipReason, SyncAction, SyncEngine,
    SyncOptions, SyncReport,
};
