//! The in-memory namespace.
//!
//! A [`Namespace`] owns the whole tree: a permanent root directory plus every
//! node reachable from it. Operations take absolute paths and either succeed
//! or return a [`VfsError`] with the tree left exactly as it was.
//!
//! ## Depth rules
//!
//! Under [`DepthPolicy::Reference`] the creation operations keep their
//! historical restrictions:
//!
//! - `make_directory` only creates directly below the root
//!   (`PermissionDenied` otherwise);
//! - `create_file` creates below any existing directory;
//! - `write` addresses exactly `/<dir>/<file>` (`MalformedPath` otherwise).
//!
//! [`DepthPolicy::Uniform`] lifts all three to "any existing directory".
//!
//! ## Writes append
//!
//! `write` appends to the end of the file whatever offset it is given, and
//! creates the file if it is missing.

use tracing::debug;

use super::error::{VfsError, VfsResult};
use super::path;
use super::siblings::SiblingList;
use super::store::{Node, NodeId, NodeStore};
use super::types::{DirEntry, FileAttr};
use crate::config::{DepthPolicy, NamespaceConfig, RmdirPolicy};

/// In-memory hierarchical namespace.
///
/// Single-threaded: mutating operations take `&mut self`. Wrap it in a
/// [`SharedNamespace`](super::SharedNamespace) to share it between threads.
#[derive(Debug)]
pub struct Namespace {
    store: NodeStore,
    root: NodeId,
    config: NamespaceConfig,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// Create a namespace holding only the root directory.
    pub fn new() -> Self {
        Self::with_config(NamespaceConfig::default())
    }

    pub fn with_config(config: NamespaceConfig) -> Self {
        let (store, root) = NodeStore::with_root(Node::root());
        let store = match config.max_nodes {
            Some(limit) => store.with_limit(limit),
            None => store,
        };
        Self {
            store,
            root,
            config,
        }
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Id of the root directory.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Walk from the root through each component of `path`.
    ///
    /// Descending into a file is reported as not found, like a missing name.
    pub fn resolve(&self, path: &str) -> VfsResult<NodeId> {
        let mut current = self.root;
        for name in path::components(path)? {
            current = self
                .child(current, name)
                .ok_or_else(|| VfsError::not_found(path))?;
        }
        Ok(current)
    }

    /// Look up `name` directly below `dir`. `None` if `dir` is a file.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.store.get(dir)?.children()?.lookup(name)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.get(id)
    }

    /// Reconstruct the absolute path of `id` through its parent links.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.store.get(id)?;
        while let Some(parent) = current.parent() {
            names.push(current.name());
            current = self.store.get(parent)?;
        }
        if names.is_empty() {
            return Some(String::from("/"));
        }
        let mut path = String::new();
        for name in names.iter().rev() {
            path.push('/');
            path.push_str(name);
        }
        Some(path)
    }

    fn get(&self, id: NodeId, path: &str) -> VfsResult<&Node> {
        self.store.get(id).ok_or_else(|| VfsError::not_found(path))
    }

    fn children_of(&self, id: NodeId, path: &str) -> VfsResult<&SiblingList> {
        self.get(id, path)?
            .children()
            .ok_or_else(|| VfsError::not_a_directory(path))
    }

    /// Resolve `path` and require a directory.
    fn resolve_directory(&self, path: &str) -> VfsResult<NodeId> {
        let id = self.resolve(path)?;
        self.children_of(id, path)?;
        Ok(id)
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Attributes of the node at `path`.
    pub fn stat(&self, path: &str) -> VfsResult<FileAttr> {
        let id = self.resolve(path)?;
        self.attr(id, path)
    }

    fn attr(&self, id: NodeId, path: &str) -> VfsResult<FileAttr> {
        let node = self.get(id, path)?;
        Ok(match node.content() {
            Some(data) => FileAttr::file(id.ino(), data.len() as u64, self.config.file_perm),
            None => FileAttr::directory(id.ino(), self.config.dir_perm),
        })
    }

    /// Returns true if `path` resolves.
    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// Names of the children of the directory at `path`, ascending.
    pub fn list(&self, path: &str) -> VfsResult<Vec<String>> {
        let id = self.resolve(path)?;
        let children = self.children_of(id, path)?;
        Ok(children.names().map(String::from).collect())
    }

    /// Directory listing as a host adapter fills it: `.`, `..`, then the
    /// children in name order.
    pub fn list_entries(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let id = self.resolve(path)?;
        let children = self.children_of(id, path)?;

        let mut entries = Vec::with_capacity(children.len() + 2);
        entries.push(DirEntry::directory("."));
        entries.push(DirEntry::directory(".."));
        for (name, child) in children.iter() {
            let kind = self.get(child, path)?.kind();
            entries.push(DirEntry::new(name, kind));
        }
        Ok(entries)
    }

    /// Up to `size` bytes of the file at `path`, starting at `offset`.
    ///
    /// Reading at or past the end returns no bytes; a read running past the
    /// end is cut short.
    pub fn read(&self, path: &str, size: usize, offset: u64) -> VfsResult<Vec<u8>> {
        let id = self.resolve(path)?;
        let data = self
            .get(id, path)?
            .content()
            .ok_or_else(|| VfsError::is_a_directory(path))?;

        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(data.len());
        let end = start + size.min(data.len() - start);
        Ok(data[start..end].to_vec())
    }

    /// Whole content of the file at `path`.
    pub fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        self.read(path, usize::MAX, 0)
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Create an empty directory at `path`.
    pub fn make_directory(&mut self, path: &str) -> VfsResult<FileAttr> {
        let (parent_path, name) = path::split_parent(path)?;
        let parent = match self.config.depth_policy {
            DepthPolicy::Reference => match self.resolve(parent_path) {
                Ok(id) if id == self.root => id,
                Ok(_) | Err(VfsError::NotFound(_)) => {
                    return Err(VfsError::permission_denied(path));
                }
                Err(e) => return Err(e),
            },
            DepthPolicy::Uniform => self.resolve_directory(parent_path)?,
        };

        let id = self.attach(parent, Node::directory(name, parent), path)?;
        debug!(path, "created directory");
        self.attr(id, path)
    }

    /// Create an empty file at `path` below any existing directory.
    pub fn create_file(&mut self, path: &str) -> VfsResult<FileAttr> {
        let (parent_path, name) = path::split_parent(path)?;
        let parent = self.resolve_directory(parent_path)?;

        let id = self.attach(parent, Node::file(name, parent), path)?;
        debug!(path, "created file");
        self.attr(id, path)
    }

    /// Link a freshly allocated node into `parent`, or release it again.
    ///
    /// A name clash is reported before running out of nodes.
    fn attach(&mut self, parent: NodeId, node: Node, path: &str) -> VfsResult<NodeId> {
        if self.children_of(parent, path)?.contains(node.name()) {
            return Err(VfsError::already_exists(path));
        }
        let name = node.name().to_string();
        let id = self
            .store
            .alloc(node)
            .ok_or_else(|| VfsError::no_space(path))?;
        let inserted = match self.store.get_mut(parent).and_then(Node::children_mut) {
            Some(children) => children
                .insert(name, id)
                .map_err(|_| VfsError::already_exists(path)),
            None => Err(VfsError::not_a_directory(path)),
        };
        if let Err(e) = inserted {
            self.store.release(id);
            return Err(e);
        }
        Ok(id)
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Append `data` to the file at `path`, creating it if absent.
    ///
    /// `offset` is accepted for protocol compatibility and ignored: content
    /// only ever grows at the end. Returns the number of bytes written.
    pub fn write(&mut self, path: &str, data: &[u8], offset: u64) -> VfsResult<usize> {
        let (dir, name) = match self.config.depth_policy {
            DepthPolicy::Reference => {
                let (dir_name, file_name) = path::split_two_level(path)?;
                (self.top_level_directory(dir_name, path)?, file_name)
            }
            DepthPolicy::Uniform => {
                let (parent_path, file_name) = path::split_parent(path)?;
                (self.resolve_directory(parent_path)?, file_name)
            }
        };

        let written = self.append(dir, name, data, path)?;
        debug!(path, bytes = written, ignored_offset = offset, "appended");
        Ok(written)
    }

    /// Deliver `data` from one top-level directory to another.
    ///
    /// `/<sender>/<recipient>` appends to `/<recipient>/<sender>`, creating
    /// that file on demand. The recipient directory must exist; the sender
    /// directory doesn't have to. Always exactly two levels deep.
    pub fn post(&mut self, path: &str, data: &[u8]) -> VfsResult<usize> {
        let (sender, recipient) = path::split_two_level(path)?;
        let inbox = self.top_level_directory(recipient, path)?;

        let written = self.append(inbox, sender, data, path)?;
        debug!(path, sender, recipient, bytes = written, "posted");
        Ok(written)
    }

    /// Child `name` of the root, required to be a directory.
    fn top_level_directory(&self, name: &str, path: &str) -> VfsResult<NodeId> {
        let id = self
            .child(self.root, name)
            .ok_or_else(|| VfsError::not_found(path))?;
        self.children_of(id, path)?;
        Ok(id)
    }

    fn append(&mut self, dir: NodeId, name: &str, data: &[u8], path: &str) -> VfsResult<usize> {
        let file = match self.child(dir, name) {
            Some(id) => id,
            None => self.attach(dir, Node::file(name, dir), path)?,
        };
        self.store
            .get_mut(file)
            .ok_or_else(|| VfsError::not_found(path))?
            .append(data)
            .ok_or_else(|| VfsError::is_a_directory(path))
    }

    /// Accept a timestamp update. Times are not tracked, so this only checks
    /// that `path` resolves.
    pub fn set_times(&self, path: &str) -> VfsResult<()> {
        self.resolve(path).map(|_| ())
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove the file at `path`.
    pub fn unlink(&mut self, path: &str) -> VfsResult<()> {
        let id = self.resolve(path)?;
        if self.get(id, path)?.kind().is_dir() {
            return Err(VfsError::is_a_directory(path));
        }
        self.detach(id, path)?;
        debug!(path, "unlinked");
        Ok(())
    }

    /// Remove the directory at `path`.
    ///
    /// A non-empty directory is refused or released with everything below
    /// it, depending on [`RmdirPolicy`]. The root can't be removed.
    pub fn remove_directory(&mut self, path: &str) -> VfsResult<()> {
        let id = self.resolve(path)?;
        if id == self.root {
            return Err(VfsError::permission_denied(path));
        }
        let children = self
            .get(id, path)?
            .children()
            .ok_or_else(|| VfsError::is_a_file(path))?;
        if !children.is_empty() && self.config.rmdir_policy == RmdirPolicy::RequireEmpty {
            return Err(VfsError::directory_not_empty(path));
        }
        let released = self.detach(id, path)?;
        debug!(path, released, "removed directory");
        Ok(())
    }

    /// Unlink `id` from its parent and release its subtree.
    fn detach(&mut self, id: NodeId, path: &str) -> VfsResult<usize> {
        let node = self.get(id, path)?;
        let parent = node
            .parent()
            .ok_or_else(|| VfsError::permission_denied(path))?;
        let name = node.name().to_string();

        self.store
            .get_mut(parent)
            .and_then(Node::children_mut)
            .ok_or_else(|| VfsError::not_found(path))?
            .remove(&name)
            .map_err(|_| VfsError::not_found(path))?;
        Ok(self.store.release_subtree(id))
    }

    /// Release every node except the root.
    pub fn clear(&mut self) -> usize {
        let children = match self.store.get_mut(self.root).and_then(Node::children_mut) {
            Some(children) => children.drain(),
            None => return 0,
        };
        let released = children
            .into_iter()
            .map(|child| self.store.release_subtree(child))
            .sum::<usize>();
        debug!(released, "cleared namespace");
        released
    }
}
