//! SyncEngine for mirroring eligible resources
//!
//! This module provides:
//! - **engine**: the per-resource state machine, root walks and single
//!   resource synchronization
//! - **report**: the actions taken and failures met during a run

mod engine;
mod report;

pub use engine::{BAGS_MARKER, FailurePolicy, SyncEngine, SyncOptions};
pub use report::{ResourceFailure, ResourceOutcome, SkipReason, SyncAction, SyncReport};
