//! Remote repository client for the netCDF mirror
//!
//! The sync engine talks to the remote store only through the
//! [`RemoteRepository`] trait. [`IrodsClient`] implements it by shelling out
//! to the iRODS iCommands (`icd`, `ils`, `imeta`, `iget`) of an already
//! initialized session. The [`listing`] and [`metadata`] modules turn the raw
//! text those commands print into structured values.

pub mod error;
pub mod irods;
pub mod listing;
pub mod metadata;
pub mod repository;

pub use error::{Error, Result};
pub use irods::IrodsClient;
pub use listing::{ChildEntry, ListingEntry, PRIMARY_REPLICA};
pub use metadata::Avu;
pub use repository::RemoteRepository;
