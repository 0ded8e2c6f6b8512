//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::{ConfigLayer, FailurePolicy, SyncOptions};

/// Mirror public netCDF and composite resources into a local directory
///
/// Without RESOURCE_ID, walks the home collection and then the user zone.
/// With RESOURCE_ID, synchronizes only that resource.
#[derive(Parser, Debug)]
#[command(name = "ncmirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (TOML, JSON or YAML)
    #[arg(short, long, env = "NCMIRROR_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Local mirror root
    #[arg(long, env = "NCMIRROR_MIRROR_ROOT", value_name = "DIR")]
    pub mirror_root: Option<PathBuf>,

    /// Remote root of the data zone
    #[arg(long, env = "NCMIRROR_DATA_ZONE_ROOT", value_name = "PATH")]
    pub data_zone_root: Option<String>,

    /// Remote root of the user zone
    #[arg(long, env = "NCMIRROR_USER_ZONE_ROOT", value_name = "PATH")]
    pub user_zone_root: Option<String>,

    /// Home collection to walk (default: the iRODS session home)
    #[arg(long, value_name = "PATH")]
    pub home_root: Option<String>,

    /// Directory containing icd, ils, imeta and iget
    #[arg(long, value_name = "DIR")]
    pub icommands_dir: Option<PathBuf>,

    /// Report decisions without copying, writing or deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Abort on the first resource that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Synchronize only this resource
    pub resource_id: Option<String>,
}

impl Cli {
    /// Values given on the command line or through the environment.
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            mirror_root: self.mirror_root.clone(),
            data_zone_root: self.data_zone_root.clone(),
            user_zone_root: self.user_zone_root.clone(),
            home_root: self.home_root.clone(),
        }
    }

    /// The requested resource id without surrounding whitespace.
    /// A blank id means no id was given.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            dry_run: self.dry_run,
            failure_policy: if self.fail_fast {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Isolate
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_resource_id() {
        let cli = Cli::try_parse_from(["ncmirror", "--mirror-root", "/srv/m", "a1b2c3"]).unwrap();

        assert_eq!(cli.resource_id.as_deref(), Some("a1b2c3"));
        assert_eq!(cli.config_layer().mirror_root, Some(PathBuf::from("/srv/m")));
    }

    #[test]
    fn test_resource_id_is_trimmed() {
        let cli = Cli::try_parse_from(["ncmirror", " a1b2c3\n"]).unwrap();

        assert_eq!(cli.resource_id(), Some("a1b2c3"));
    }

    #[test]
    fn test_blank_resource_id_means_full_walk() {
        let cli = Cli::try_parse_from(["ncmirror", "   "]).unwrap();

        assert_eq!(cli.resource_id(), None);
    }

    #[test]
    fn test_fail_fast_selects_abort() {
        let cli = Cli::try_parse_from(["ncmirror", "--fail-fast", "--dry-run"]).unwrap();
        let options = cli.sync_options();

        assert!(options.dry_run);
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_default_policy_isolates() {
        let cli = Cli::try_parse_from(["ncmirror"]).unwrap();

        assert_eq!(cli.sync_options().failure_policy, FailurePolicy::Isolate);
        assert!(cli.resource_id.is_none());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
