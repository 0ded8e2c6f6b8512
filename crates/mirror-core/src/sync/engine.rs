//! SyncEngine implementation
//!
//! The SyncEngine keeps the local mirror consistent with the remote
//! repository. Each resource is evaluated on its own:
//!
//! | Remote state                              | Mirror entry | Action    |
//! |-------------------------------------------|--------------|-----------|
//! | type not mirrored / private / no payload  | present      | evict     |
//! | type not mirrored / private / no payload  | absent       | skip      |
//! | public, mirrored type, payload            | absent       | copy      |
//! | public, mirrored type, payload            | stale        | refresh   |
//! | public, mirrored type, payload            | current      | up to date|
//!
//! An entry is stale when its sidecar is missing or holds a different token
//! than the payload's current remote timestamp. A refresh removes the stale
//! entry before fetching, so the new copy replaces it wholesale.

use mirror_remote::RemoteRepository;
use mirror_remote::listing::{self, ChildEntry};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::config::MirrorConfig;
use crate::payload::locate_payload;
use crate::resolver::PathResolver;
use crate::resource::{Payload, validate_resource_id};
use crate::state::SidecarStore;
use crate::Result;

use super::report::{ResourceFailure, ResourceOutcome, SkipReason, SyncAction, SyncReport};

/// Listing entries containing this marker are bag archives, not resources.
pub const BAGS_MARKER: &str = "bags";

/// What to do when one resource fails during a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and continue with the next resource
    #[default]
    Isolate,
    /// Stop the run and return the error
    Abort,
}

/// Options for sync runs
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, decide and report without copying, writing or deleting.
    pub dry_run: bool,
    pub failure_policy: FailurePolicy,
}

/// Engine for mirroring eligible resources
///
/// The SyncEngine provides three entry points:
/// - **sync_all**: walk the home root, then the user zone root
/// - **walk_all**: walk every resource under one root
/// - **sync_one**: synchronize a single resource by id
pub struct SyncEngine<R> {
    remote: R,
    config: MirrorConfig,
    store: SidecarStore,
    options: SyncOptions,
}

impl<R: RemoteRepository> SyncEngine<R> {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration is incomplete.
    pub fn new(remote: R, config: MirrorConfig) -> Result<Self> {
        config.validate()?;
        let store = SidecarStore::new(&config.mirror_root);
        Ok(Self {
            remote,
            config,
            store,
            options: SyncOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Scheduled sweep over every configured walk root.
    ///
    /// Failing to enter or list a root aborts the sweep regardless of the
    /// failure policy.
    pub fn sync_all(&self) -> Result<SyncReport> {
        let mut report = SyncReport::new(self.options.dry_run);
        for root in self.config.walk_roots() {
            report.merge(self.walk_all(root)?);
        }
        Ok(report.finish())
    }

    /// Synchronize every resource collection directly under `root`.
    ///
    /// `None` walks the session's home collection.
    pub fn walk_all(&self, root: Option<&str>) -> Result<SyncReport> {
        info!(root = root.unwrap_or("~"), "walking resources");
        self.remote.navigate(root)?;
        let lines = self.remote.list_children(None)?;

        let mut report = SyncReport::new(self.options.dry_run);
        for child in listing::parse_children(&lines) {
            let ChildEntry::Collection { path } = &child else {
                continue;
            };
            if path.contains(BAGS_MARKER) {
                debug!(path = %path, "skipping bags collection");
                continue;
            }

            let resource_id = child.name();
            if validate_resource_id(resource_id).is_err() {
                warn!(path = %path, "skipping collection with unusable name");
                continue;
            }
            match self.sync_resource(resource_id, path) {
                Ok(action) => report.push_outcome(ResourceOutcome {
                    resource_id: resource_id.to_string(),
                    source: path.clone(),
                    action,
                }),
                Err(e) if self.options.failure_policy == FailurePolicy::Isolate => {
                    warn!(resource_id, error = %e, "resource failed, continuing");
                    report.push_failure(ResourceFailure {
                        resource_id: resource_id.to_string(),
                        source: path.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report.finish())
    }

    /// Synchronize one resource, locating it among the source roots.
    ///
    /// # Errors
    ///
    /// `UnresolvedSource` if no source root holds the resource; any failure
    /// while processing it is returned directly.
    pub fn sync_one(&self, resource_id: &str) -> Result<SyncReport> {
        validate_resource_id(resource_id)?;
        let source = PathResolver::new(&self.remote, self.config.source_roots())
            .resolve(resource_id)?;
        let action = self.sync_resource(resource_id, &source)?;

        let mut report = SyncReport::new(self.options.dry_run);
        report.push_outcome(ResourceOutcome {
            resource_id: resource_id.to_string(),
            source,
            action,
        });
        Ok(report.finish())
    }

    /// Evaluate and apply the state machine for one resource.
    pub fn sync_resource(&self, resource_id: &str, source: &str) -> Result<SyncAction> {
        let classification = classify(&self.remote, source)?;

        if !classification.is_eligible() {
            let reason = SkipReason::IneligibleType {
                resource_type: classification.resource_type.to_string(),
            };
            return self.evict_or_skip(resource_id, reason);
        }
        if !classification.is_public {
            return self.evict_or_skip(resource_id, SkipReason::Private);
        }
        let Some(payload) = locate_payload(&self.remote, source)? else {
            return self.evict_or_skip(resource_id, SkipReason::NoPayload);
        };

        if !self.store.entry_exists(resource_id) {
            self.fetch(resource_id, source, &payload)?;
            return Ok(SyncAction::Copied {
                timestamp: payload.timestamp,
            });
        }

        let recorded = self.store.read(&payload)?;
        if recorded.as_deref() == Some(payload.timestamp.as_str()) {
            debug!(resource_id, timestamp = %payload.timestamp, "mirror is current");
            return Ok(SyncAction::UpToDate {
                timestamp: payload.timestamp,
            });
        }

        self.refresh(resource_id, source, &payload)?;
        Ok(SyncAction::Refreshed {
            previous: recorded,
            timestamp: payload.timestamp,
        })
    }

    fn evict_or_skip(&self, resource_id: &str, reason: SkipReason) -> Result<SyncAction> {
        if !self.store.entry_exists(resource_id) {
            debug!(resource_id, %reason, "not mirrored");
            return Ok(SyncAction::Skipped { reason });
        }

        if self.options.dry_run {
            info!(resource_id, %reason, "[dry-run] would evict mirror entry");
        } else {
            info!(resource_id, %reason, "evicting mirror entry");
            self.store.evict(resource_id)?;
        }
        Ok(SyncAction::Evicted { reason })
    }

    /// Replace a stale entry wholesale: evict it, then fetch.
    fn refresh(&self, resource_id: &str, source: &str, payload: &Payload) -> Result<()> {
        if !self.options.dry_run {
            debug!(resource_id, "clearing stale mirror entry");
            self.store.evict(resource_id)?;
        }
        self.fetch(resource_id, source, payload)
    }

    /// Copy the whole tree, then record the payload timestamp.
    fn fetch(&self, resource_id: &str, source: &str, payload: &Payload) -> Result<()> {
        if self.options.dry_run {
            info!(resource_id, source, "[dry-run] would fetch resource");
            return Ok(());
        }

        info!(resource_id, source, timestamp = %payload.timestamp, "fetching resource");
        self.remote
            .fetch_tree(source, &self.store.mirror_root().to_native())?;
        self.store.write(payload)
    }
}
