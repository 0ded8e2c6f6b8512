//! iCommands-backed remote repository
//!
//! Each primitive runs one iCommand as a child process and waits for it.
//! The iRODS session (`iinit`) must already be established for the user
//! running the mirror; the client never authenticates.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::{Error, RemoteRepository, Result};

/// Captured result of one iCommand invocation.
#[derive(Debug)]
struct CommandOutput {
    success: bool,
    code: i32,
    stdout: String,
    stderr: String,
}

impl CommandOutput {
    fn lines(&self) -> Vec<String> {
        self.stdout.lines().map(str::to_string).collect()
    }
}

/// Remote repository reached through the iRODS command line tools.
#[derive(Debug, Clone, Default)]
pub struct IrodsClient {
    icommands_dir: Option<PathBuf>,
}

impl IrodsClient {
    /// Use the iCommands found on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the iCommands installed in `dir`.
    pub fn with_icommands_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            icommands_dir: Some(dir.into()),
        }
    }

    fn program(&self, name: &str) -> PathBuf {
        match &self.icommands_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    fn run(&self, name: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(command = name, ?args, "running icommand");
        let output = Command::new(self.program(name))
            .args(args)
            .output()
            .map_err(|source| Error::Io {
                command: name.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn listing(&self, args: &[&str], path: &str) -> Result<Vec<String>> {
        let output = self.run("ils", args)?;
        if output.success {
            Ok(output.lines())
        } else {
            Err(Error::ListingFailure {
                path: path.to_string(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }
}

impl RemoteRepository for IrodsClient {
    fn navigate(&self, path: Option<&str>) -> Result<()> {
        let shown = path.unwrap_or("~").to_string();
        let args: Vec<&str> = path.into_iter().collect();

        let output = self.run("icd", &args)?;
        if !output.success {
            debug!(path = %shown, stderr = %output.stderr, "icd failed");
            return Err(Error::PathNotFound { path: shown });
        }

        // icd can succeed on a collection the session may not read
        let listing = self.run("ils", &[])?;
        if !listing.success {
            debug!(path = %shown, stderr = %listing.stderr, "ils after icd failed");
            return Err(Error::PathNotFound { path: shown });
        }
        Ok(())
    }

    fn list_children(&self, path: Option<&str>) -> Result<Vec<String>> {
        let args: Vec<&str> = path.into_iter().collect();
        self.listing(&args, path.unwrap_or("."))
    }

    fn list_recursive_long(&self, path: &str) -> Result<Vec<String>> {
        self.listing(&["-rl", path], path)
    }

    fn get_metadata(&self, collection: &str) -> Result<Vec<String>> {
        let output = self.run("imeta", &["ls", "-C", collection])?;
        if output.success {
            Ok(output.lines())
        } else {
            Err(Error::MetadataReadFailure {
                collection: collection.to_string(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }

    fn fetch_tree(&self, source: &str, dest_root: &Path) -> Result<()> {
        let dest = dest_root.to_string_lossy();
        let output = self.run("iget", &["-rf", source, &dest])?;
        if output.success {
            Ok(())
        } else {
            Err(Error::CopyFailure {
                remote: source.to_string(),
                dest: dest_root.to_path_buf(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    /// Install a shell script standing in for an iCommand.
    fn fake_icommand(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_list_recursive_long_returns_stdout_lines() {
        let bin = TempDir::new().unwrap();
        fake_icommand(
            bin.path(),
            "ils",
            "echo '/zone/home/proxy/abc/data/contents:'\necho '  proxy 0 resc 10 2017-03-01.10:00 & foo.nc'",
        );
        let client = IrodsClient::with_icommands_dir(bin.path());

        let lines = client
            .list_recursive_long("/zone/home/proxy/abc/data/contents")
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "/zone/home/proxy/abc/data/contents:");
    }

    #[test]
    fn test_listing_failure_carries_exit_code_and_stderr() {
        let bin = TempDir::new().unwrap();
        fake_icommand(bin.path(), "ils", "echo 'does not exist' >&2\nexit 3");
        let client = IrodsClient::with_icommands_dir(bin.path());

        let err = client.list_recursive_long("/zone/missing").unwrap_err();
        match err {
            Error::ListingFailure { path, code, stderr } => {
                assert_eq!(path, "/zone/missing");
                assert_eq!(code, 3);
                assert_eq!(stderr, "does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_navigate_failure_is_path_not_found() {
        let bin = TempDir::new().unwrap();
        fake_icommand(bin.path(), "icd", "exit 4");
        fake_icommand(bin.path(), "ils", "exit 0");
        let client = IrodsClient::with_icommands_dir(bin.path());

        let err = client.navigate(Some("/zone/home/proxy/missing")).unwrap_err();
        assert!(err.is_path_not_found());
        assert!(client.navigate(None).unwrap_err().to_string().contains('~'));
    }

    #[test]
    fn test_navigate_success_confirms_with_ils() {
        let bin = TempDir::new().unwrap();
        fake_icommand(bin.path(), "icd", "exit 0");
        fake_icommand(bin.path(), "ils", "exit 0");
        let client = IrodsClient::with_icommands_dir(bin.path());

        client.navigate(Some("/zone/home/proxy")).unwrap();
    }

    #[test]
    fn test_fetch_tree_passes_force_recursive_flags() {
        let bin = TempDir::new().unwrap();
        let log = bin.path().join("args.log");
        fake_icommand(
            bin.path(),
            "iget",
            &format!("echo \"$@\" > '{}'", log.display()),
        );
        let client = IrodsClient::with_icommands_dir(bin.path());

        client
            .fetch_tree("/zone/home/proxy/abc", Path::new("/opt/mirror"))
            .unwrap();
        let args = fs::read_to_string(&log).unwrap();
        assert_eq!(args.trim(), "-rf /zone/home/proxy/abc /opt/mirror");
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let bin = TempDir::new().unwrap();
        let client = IrodsClient::with_icommands_dir(bin.path());

        let err = client.get_metadata("/zone/home/proxy/abc").unwrap_err();
        assert!(matches!(err, Error::Io { ref command, .. } if command == "imeta"));
    }
}
