//! In-memory remote repository.
//!
//! [`FakeRemote`] keeps a set of roots and resources and answers the
//! [`RemoteRepository`] calls with text laid out like real `ils`, `ils -rl`
//! and `imeta ls -C` output, so the engine's parsers run unchanged. Every
//! call is recorded for later assertions.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use mirror_remote::{Error, RemoteRepository, Result};

use crate::{DATA_ZONE_ROOT, USER_ZONE_ROOT};

/// A data object under a resource's `data/contents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFile {
    /// Sub-directory relative to `data/contents`, empty for the top level
    pub directory: String,
    pub name: String,
    pub replica: u32,
    pub timestamp: String,
}

/// A resource collection held by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeResource {
    pub id: String,
    pub public: bool,
    /// Value of the `resourceType` attribute; empty means no attribute
    pub resource_type: String,
    pub files: Vec<FakeFile>,
    pub extra_avus: Vec<(String, String)>,
}

impl FakeResource {
    /// A private resource with no type and no files.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            public: false,
            resource_type: String::new(),
            files: Vec::new(),
            extra_avus: Vec::new(),
        }
    }

    pub fn netcdf(id: &str) -> Self {
        Self::new(id).with_type("NetcdfResource")
    }

    pub fn composite(id: &str) -> Self {
        Self::new(id).with_type("CompositeResource")
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn with_type(mut self, resource_type: &str) -> Self {
        self.resource_type = resource_type.to_string();
        self
    }

    /// Add a primary replica at the top of `data/contents`.
    pub fn with_file(self, name: &str, timestamp: &str) -> Self {
        self.with_replica("", name, 0, timestamp)
    }

    /// Add a primary replica in a sub-directory of `data/contents`.
    pub fn with_file_in(self, directory: &str, name: &str, timestamp: &str) -> Self {
        self.with_replica(directory, name, 0, timestamp)
    }

    pub fn with_replica(mut self, directory: &str, name: &str, replica: u32, timestamp: &str) -> Self {
        self.files.push(FakeFile {
            directory: directory.trim_matches('/').to_string(),
            name: name.to_string(),
            replica,
            timestamp: timestamp.to_string(),
        });
        self
    }

    pub fn with_avu(mut self, attribute: &str, value: &str) -> Self {
        self.extra_avus.push((attribute.to_string(), value.to_string()));
        self
    }
}

/// A call received by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Navigate(Option<String>),
    ListChildren(Option<String>),
    ListRecursiveLong(String),
    GetMetadata(String),
    FetchTree { source: String, dest: PathBuf },
}

#[derive(Debug)]
enum Child {
    Resource(FakeResource),
    Collection(String),
    DataObject(String),
}

#[derive(Debug)]
struct Root {
    path: String,
    children: Vec<Child>,
}

#[derive(Debug)]
struct State {
    home: String,
    cwd: String,
    roots: Vec<Root>,
    calls: Vec<RemoteCall>,
    failing_metadata: BTreeSet<String>,
    failing_fetch: BTreeSet<String>,
}

impl State {
    fn root(&self, path: &str) -> Option<&Root> {
        self.roots.iter().find(|r| r.path == path)
    }

    fn resources(&self) -> impl Iterator<Item = (&Root, &FakeResource)> {
        self.roots.iter().flat_map(|root| {
            root.children.iter().filter_map(move |child| match child {
                Child::Resource(resource) => Some((root, resource)),
                _ => None,
            })
        })
    }

    fn resource_at(&self, path: &str) -> Option<&FakeResource> {
        self.resources()
            .find(|(root, r)| resource_path(&root.path, &r.id) == path)
            .map(|(_, r)| r)
    }

    fn collection_at(&self, path: &str) -> bool {
        self.roots.iter().any(|root| {
            root.children.iter().any(|child| {
                matches!(child, Child::Collection(name) if resource_path(&root.path, name) == path)
            })
        })
    }

    fn resource_mut(&mut self, id: &str) -> Option<&mut FakeResource> {
        self.roots
            .iter_mut()
            .flat_map(|root| root.children.iter_mut())
            .find_map(|child| match child {
                Child::Resource(r) if r.id == id => Some(r),
                _ => None,
            })
    }
}

/// In-memory [`RemoteRepository`].
#[derive(Debug)]
pub struct FakeRemote {
    state: Mutex<State>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::hydroshare()
    }
}

impl FakeRemote {
    /// A remote whose session home is `home`, with no other roots.
    pub fn new(home: &str) -> Self {
        let home = normalize(home);
        Self {
            state: Mutex::new(State {
                cwd: home.clone(),
                roots: vec![Root {
                    path: home.clone(),
                    children: Vec::new(),
                }],
                home,
                calls: Vec::new(),
                failing_metadata: BTreeSet::new(),
                failing_fetch: BTreeSet::new(),
            }),
        }
    }

    /// Home in the data zone plus a federated user zone root.
    pub fn hydroshare() -> Self {
        let remote = Self::new(DATA_ZONE_ROOT);
        remote.add_root(USER_ZONE_ROOT);
        remote
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_root(&self, root: &str) {
        let mut state = self.lock();
        let path = normalize(root);
        if state.root(&path).is_none() {
            state.roots.push(Root {
                path,
                children: Vec::new(),
            });
        }
    }

    fn push_child(&self, root: &str, child: Child) {
        let mut state = self.lock();
        let path = normalize(root);
        match state.roots.iter_mut().find(|r| r.path == path) {
            Some(r) => r.children.push(child),
            None => state.roots.push(Root {
                path,
                children: vec![child],
            }),
        }
    }

    /// Add a resource under `root`; listing order is insertion order.
    pub fn add_resource(&self, root: &str, resource: FakeResource) {
        self.push_child(root, Child::Resource(resource));
    }

    /// Add a plain collection that carries no resource metadata.
    pub fn add_collection(&self, root: &str, name: &str) {
        self.push_child(root, Child::Collection(name.to_string()));
    }

    pub fn add_data_object(&self, root: &str, name: &str) {
        self.push_child(root, Child::DataObject(name.to_string()));
    }

    /// Change a resource in place.
    ///
    /// # Panics
    /// Panics if no resource has this id.
    pub fn update(&self, id: &str, change: impl FnOnce(&mut FakeResource)) {
        let mut state = self.lock();
        let resource = state
            .resource_mut(id)
            .unwrap_or_else(|| panic!("FakeRemote::update: no resource {id}"));
        change(resource);
    }

    pub fn remove_resource(&self, id: &str) {
        let mut state = self.lock();
        for root in &mut state.roots {
            root.children
                .retain(|c| !matches!(c, Child::Resource(r) if r.id == id));
        }
    }

    pub fn fail_metadata_for(&self, id: &str) {
        self.lock().failing_metadata.insert(id.to_string());
    }

    pub fn fail_fetch_for(&self, id: &str) {
        self.lock().failing_fetch.insert(id.to_string());
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Sources passed to `fetch_tree`, in call order.
    pub fn fetches(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                RemoteCall::FetchTree { source, .. } => Some(source.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches().len()
    }

    /// Number of fetches of the resource with this id.
    pub fn fetches_of(&self, id: &str) -> usize {
        self.fetches()
            .iter()
            .filter(|source| source.rsplit('/').next() == Some(id))
            .count()
    }

    pub fn cwd(&self) -> String {
        self.lock().cwd.clone()
    }
}

impl RemoteRepository for FakeRemote {
    fn navigate(&self, path: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Navigate(path.map(str::to_string)));

        let target = match path {
            None => state.home.clone(),
            Some(p) => normalize(p),
        };
        let exists = state.root(&target).is_some()
            || state.resource_at(&target).is_some()
            || state.collection_at(&target);
        if !exists {
            return Err(Error::PathNotFound { path: target });
        }
        state.cwd = target;
        Ok(())
    }

    fn list_children(&self, path: Option<&str>) -> Result<Vec<String>> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::ListChildren(path.map(str::to_string)));

        let target = match path {
            None => state.cwd.clone(),
            Some(p) => normalize(p),
        };
        if let Some(root) = state.root(&target) {
            let mut lines = vec![format!("{}:", root.path)];
            for child in &root.children {
                lines.push(match child {
                    Child::Resource(r) => format!("  C- {}", resource_path(&root.path, &r.id)),
                    Child::Collection(name) => format!("  C- {}", resource_path(&root.path, name)),
                    Child::DataObject(name) => format!("  {}", name),
                });
            }
            return Ok(lines);
        }
        if state.resource_at(&target).is_some() {
            return Ok(vec![format!("{}:", target), format!("  C- {}/data", target)]);
        }
        Err(listing_failure(&target))
    }

    fn list_recursive_long(&self, path: &str) -> Result<Vec<String>> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::ListRecursiveLong(path.to_string()));

        let target = normalize(path);
        let found = state.resources().find_map(|(root, r)| {
            let content = format!("{}/data/contents", resource_path(&root.path, &r.id));
            (content == target).then_some(r)
        });
        let Some(resource) = found else {
            return Err(listing_failure(&target));
        };

        let mut directories: Vec<&str> = Vec::new();
        for file in &resource.files {
            if !directories.contains(&file.directory.as_str()) {
                directories.push(&file.directory);
            }
        }
        if directories.is_empty() {
            directories.push("");
        }

        let mut lines = Vec::new();
        for directory in directories {
            let header = if directory.is_empty() {
                target.clone()
            } else {
                format!("{}/{}", target, directory)
            };
            lines.push(format!("{}:", header));
            for file in resource.files.iter().filter(|f| f.directory == directory) {
                lines.push(format!(
                    "  proxy             {} hydroshareResc       1024 {} & {}",
                    file.replica, file.timestamp, file.name
                ));
            }
        }
        Ok(lines)
    }

    fn get_metadata(&self, collection: &str) -> Result<Vec<String>> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::GetMetadata(collection.to_string()));

        let target = normalize(collection);
        let failure = || Error::MetadataReadFailure {
            collection: target.clone(),
            code: 4,
            stderr: "CAT_NO_ROWS_FOUND".to_string(),
        };
        if state.collection_at(&target) {
            return Ok(vec![
                format!("AVUs defined for collection {}:", target),
                "None".to_string(),
            ]);
        }
        let Some(resource) = state.resource_at(&target) else {
            return Err(failure());
        };
        if state.failing_metadata.contains(&resource.id) {
            return Err(failure());
        }

        let mut avus = vec![(
            "isPublic".to_string(),
            if resource.public { "true" } else { "false" }.to_string(),
        )];
        if !resource.resource_type.is_empty() {
            avus.push(("resourceType".to_string(), resource.resource_type.clone()));
        }
        avus.extend(resource.extra_avus.iter().cloned());

        let mut lines = vec![format!("AVUs defined for collection {}:", target)];
        for (attribute, value) in avus {
            lines.push(format!("attribute: {}", attribute));
            lines.push(format!("value: {}", value));
            lines.push("units:".to_string());
            lines.push("----".to_string());
        }
        Ok(lines)
    }

    fn fetch_tree(&self, source: &str, dest_root: &Path) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::FetchTree {
            source: source.to_string(),
            dest: dest_root.to_path_buf(),
        });

        let target = normalize(source);
        let copy_failure = |stderr: String| Error::CopyFailure {
            remote: target.clone(),
            dest: dest_root.to_path_buf(),
            code: 3,
            stderr,
        };
        let Some(resource) = state.resource_at(&target) else {
            return Err(copy_failure("does not exist".to_string()));
        };
        if state.failing_fetch.contains(&resource.id) {
            return Err(copy_failure("connection reset".to_string()));
        }

        let entry = dest_root.join(&resource.id);
        let contents = entry.join("data").join("contents");
        let io = |e: std::io::Error| copy_failure(e.to_string());
        fs::create_dir_all(&contents).map_err(io)?;
        for file in &resource.files {
            let dir = if file.directory.is_empty() {
                contents.clone()
            } else {
                contents.join(&file.directory)
            };
            fs::create_dir_all(&dir).map_err(io)?;
            fs::write(dir.join(&file.name), format!("netcdf@{}", file.timestamp)).map_err(io)?;
        }
        Ok(())
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() }
}

fn resource_path(root: &str, id: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), id)
}

fn listing_failure(path: &str) -> Error {
    Error::ListingFailure {
        path: path.to_string(),
        code: 4,
        stderr: format!("{} does not exist or user lacks access permission", path),
    }
}
