//! Mirror configuration and its layered resolution
//!
//! Configuration comes from, in increasing precedence:
//! 1. The global config file (`<config dir>/ncmirror/config.toml`), if present
//! 2. An explicit config file
//! 3. Command-line arguments and environment variables
//!
//! Each source is a [`ConfigLayer`] of optional values. Layers are overlaid
//! and then resolved into a validated, immutable [`MirrorConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use mirror_fs::{ConfigStore, NormalizedPath};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "ncmirror";

/// The effective, validated configuration of a mirror run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Local directory served to the data server
    pub mirror_root: PathBuf,

    /// Remote root of the data zone, searched first for single resources
    pub data_zone_root: String,

    /// Remote root of the federated user zone
    pub user_zone_root: String,

    /// Remote home collection to walk; the session home when unset
    #[serde(default)]
    pub home_root: Option<String>,
}

impl MirrorConfig {
    /// Fail fast on missing paths rather than walking nothing.
    pub fn validate(&self) -> Result<()> {
        if self.mirror_root.as_os_str().is_empty() {
            return Err(invalid("mirror_root must be set"));
        }
        if self.data_zone_root.trim().is_empty() {
            return Err(invalid("data_zone_root must be set"));
        }
        if self.user_zone_root.trim().is_empty() {
            return Err(invalid("user_zone_root must be set"));
        }
        if let Some(home) = &self.home_root
            && home.trim().is_empty()
        {
            return Err(invalid("home_root must not be empty when given"));
        }
        Ok(())
    }

    /// Roots searched for an explicitly named resource, in priority order.
    pub fn source_roots(&self) -> [&str; 2] {
        [self.data_zone_root.as_str(), self.user_zone_root.as_str()]
    }

    /// Roots walked by a full sweep, in order. `None` is the session home.
    pub fn walk_roots(&self) -> [Option<&str>; 2] {
        [self.home_root.as_deref(), Some(self.user_zone_root.as_str())]
    }
}

/// One source of partial configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub mirror_root: Option<PathBuf>,
    pub data_zone_root: Option<String>,
    pub user_zone_root: Option<String>,
    pub home_root: Option<String>,
}

impl ConfigLayer {
    /// Load a layer from a TOML, JSON or YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(&NormalizedPath::new(path))?)
    }

    /// Load the global layer if the file exists.
    pub fn load_global(config_dir: Option<&Path>) -> Result<Option<Self>> {
        let Some(path) = global_config_path(config_dir) else {
            return Ok(None);
        };
        if !path.is_file() {
            return Ok(None);
        }
        tracing::debug!(path = %path.display(), "loading global config");
        Self::load(&path).map(Some)
    }

    /// Values set in `higher` win over values in `self`.
    pub fn overlay(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            mirror_root: higher.mirror_root.or(self.mirror_root),
            data_zone_root: higher.data_zone_root.or(self.data_zone_root),
            user_zone_root: higher.user_zone_root.or(self.user_zone_root),
            home_root: higher.home_root.or(self.home_root),
        }
    }

    /// Resolve into a validated configuration.
    pub fn resolve(self) -> Result<MirrorConfig> {
        let config = MirrorConfig {
            mirror_root: self
                .mirror_root
                .ok_or_else(|| invalid("mirror_root must be set"))?,
            data_zone_root: self
                .data_zone_root
                .ok_or_else(|| invalid("data_zone_root must be set"))?,
            user_zone_root: self
                .user_zone_root
                .ok_or_else(|| invalid("user_zone_root must be set"))?,
            home_root: self.home_root,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Path of the global config file.
///
/// `config_dir` overrides the platform directory from `dirs::config_dir()`.
pub fn global_config_path(config_dir: Option<&Path>) -> Option<PathBuf> {
    let base = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::config_dir()?,
    };
    Some(base.join(CONFIG_DIR_NAME).join("config.toml"))
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfig {
        message: message.to_string(),
    }
}
