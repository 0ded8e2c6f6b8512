//! Report types for sync runs
//!
//! Every resource visited during a run ends up either as a
//! [`ResourceOutcome`] describing what was done, or as a
//! [`ResourceFailure`] when its processing failed and the run went on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a resource has no mirror entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Declared type is not mirrored
    IneligibleType { resource_type: String },
    /// Resource is not public
    Private,
    /// No netCDF payload under the content area
    NoPayload,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IneligibleType { resource_type } => {
                write!(f, "type {} is not mirrored", resource_type)
            }
            Self::Private => write!(f, "resource is private"),
            Self::NoPayload => write!(f, "no netCDF payload"),
        }
    }
}

/// What the engine did for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    /// First copy into the mirror
    Copied { timestamp: String },
    /// Mirror was stale and has been copied again
    Refreshed {
        previous: Option<String>,
        timestamp: String,
    },
    /// Mirror matches the remote timestamp
    UpToDate { timestamp: String },
    /// Mirror entry removed because the resource stopped qualifying
    Evicted { reason: SkipReason },
    /// Resource does not qualify and had no mirror entry
    Skipped { reason: SkipReason },
}

impl SyncAction {
    /// Whether this action copies the resource tree.
    pub fn fetches(&self) -> bool {
        matches!(self, Self::Copied { .. } | Self::Refreshed { .. })
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Copied { .. } => "copied",
            Self::Refreshed { .. } => "refreshed",
            Self::UpToDate { .. } => "up-to-date",
            Self::Evicted { .. } => "evicted",
            Self::Skipped { .. } => "skipped",
        }
    }
}

/// Outcome of a successfully processed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOutcome {
    pub resource_id: String,
    /// Remote path the resource was read from
    pub source: String,
    pub action: SyncAction,
}

/// A resource whose processing failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFailure {
    pub resource_id: String,
    pub source: String,
    pub error: String,
}

/// Report from a sync run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Whether the run only simulated its actions
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub outcomes: Vec<ResourceOutcome>,
    pub failures: Vec<ResourceFailure>,
}

impl SyncReport {
    /// Start an empty report stamped with the current time.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// True when no resource failed.
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn push_outcome(&mut self, outcome: ResourceOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn push_failure(&mut self, failure: ResourceFailure) {
        self.failures.push(failure);
    }

    /// Append another report, keeping this report's start time.
    pub fn merge(&mut self, other: SyncReport) {
        self.outcomes.extend(other.outcomes);
        self.failures.extend(other.failures);
        self.finished_at = other.finished_at.or(self.finished_at);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Outcome recorded for a resource, if any.
    pub fn outcome(&self, resource_id: &str) -> Option<&ResourceOutcome> {
        self.outcomes.iter().find(|o| o.resource_id == resource_id)
    }

    /// Number of tree copies performed (or planned, in a dry run).
    pub fn fetch_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.action.fetches()).count()
    }

    /// Number of outcomes with the given action label.
    pub fn count(&self, label: &str) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action.label() == label)
            .count()
    }
}
