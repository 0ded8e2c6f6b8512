//! Shared test utilities for the netCDF mirror workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`remote`]: [`FakeRemote`], an in-memory remote repository that prints
//!   iCommands-shaped output
//! - [`mirror`]: [`TestMirror`], a temporary mirror root with assertions

pub mod mirror;
pub mod remote;

pub use mirror::TestMirror;
pub use remote::{FakeFile, FakeRemote, FakeResource, RemoteCall};

/// Home collection of the proxy user, which is also the data zone root.
pub const DATA_ZONE_ROOT: &str = "/hydroshareZone/home/proxy";

/// Root of the federated user zone.
pub const USER_ZONE_ROOT: &str = "/hydroshareuserZone/home/proxy";
