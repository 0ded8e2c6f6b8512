//! Filesystem primitives for the netCDF mirror
//!
//! Provides normalized path handling, atomic text writes and
//! format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
