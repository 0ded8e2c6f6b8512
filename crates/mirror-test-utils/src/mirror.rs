//! [`TestMirror`] for mirror-root test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary mirror root with helpers for seeding entries and asserting on
/// their contents.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestMirror;
///
/// let mirror = TestMirror::new();
/// mirror.seed_entry("abc", "abc/data/contents", "foo.nc", "2017-03-01.10:00");
/// mirror.assert_entry_exists("abc");
/// mirror.assert_sidecar("abc/data/contents", "foo.nc", "2017-03-01.10:00");
/// ```
pub struct TestMirror {
    temp_dir: TempDir,
}

impl Default for TestMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMirror {
    /// Create an empty mirror root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn entry_path(&self, resource_id: &str) -> PathBuf {
        self.root().join(resource_id)
    }

    pub fn entry_exists(&self, resource_id: &str) -> bool {
        self.entry_path(resource_id).is_dir()
    }

    pub fn sidecar_path(&self, relative_path: &str, filename: &str) -> PathBuf {
        self.root()
            .join(relative_path)
            .join(format!("{}.ts", filename))
    }

    /// Contents of a sidecar, or `None` if it does not exist.
    pub fn sidecar(&self, relative_path: &str, filename: &str) -> Option<String> {
        fs::read_to_string(self.sidecar_path(relative_path, filename)).ok()
    }

    /// Create an entry as an earlier copy would have left it: the payload
    /// plus a sidecar holding `token`.
    pub fn seed_entry(&self, resource_id: &str, relative_path: &str, filename: &str, token: &str) {
        let dir = self.root().join(relative_path);
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir_all(self.entry_path(resource_id)).unwrap();
        fs::write(dir.join(filename), format!("netcdf@{}", token)).unwrap();
        fs::write(self.sidecar_path(relative_path, filename), token).unwrap();
    }

    /// Create an entry whose sidecar is missing.
    pub fn seed_entry_without_sidecar(&self, resource_id: &str, relative_path: &str, filename: &str) {
        let dir = self.root().join(relative_path);
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir_all(self.entry_path(resource_id)).unwrap();
        fs::write(dir.join(filename), "netcdf@unknown").unwrap();
    }

    /// Ids of all entries in the mirror root, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut ids: Vec<String> = fs::read_dir(self.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        ids.sort();
        ids
    }

    /// # Panics
    /// Panics if the entry directory does not exist.
    pub fn assert_entry_exists(&self, resource_id: &str) {
        assert!(
            self.entry_exists(resource_id),
            "Expected mirror entry to exist: {}",
            self.entry_path(resource_id).display()
        );
    }

    /// # Panics
    /// Panics if the entry directory exists.
    pub fn assert_entry_absent(&self, resource_id: &str) {
        assert!(
            !self.entry_exists(resource_id),
            "Expected mirror entry NOT to exist: {}",
            self.entry_path(resource_id).display()
        );
    }

    /// Assert the sidecar exists and holds exactly `token`.
    ///
    /// # Panics
    /// Panics if the sidecar is missing or holds something else.
    pub fn assert_sidecar(&self, relative_path: &str, filename: &str, token: &str) {
        let path = self.sidecar_path(relative_path, filename);
        let found = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read sidecar: {}", path.display()));
        assert_eq!(found, token, "Unexpected token in {}", path.display());
    }
}
