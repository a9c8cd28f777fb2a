//! Node storage.
//!
//! Nodes live in an arena owned by the namespace. Directories own their
//! children through a [`SiblingList`] of ids; the parent link is a plain id
//! resolved through the same arena, never a second owner. Freed slots are
//! reused with a bumped generation so a stale [`NodeId`] can't reach the
//! node that took its place.

use super::siblings::SiblingList;
use super::types::NodeKind;

/// Handle to a node in a [`NodeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Inode-style number for adapters. Slot 0 (the root) is inode 1.
    pub fn ino(&self) -> u64 {
        u64::from(self.index) + 1
    }
}

/// Payload of a node. A file never owns children, a directory never owns content.
#[derive(Debug, Clone)]
pub enum NodeBody {
    File(Vec<u8>),
    Directory(SiblingList),
}

/// A single namespace entry.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    body: NodeBody,
}

impl Node {
    /// The root directory: no parent, name never addressed.
    pub fn root() -> Self {
        Self {
            name: String::from("/"),
            parent: None,
            body: NodeBody::Directory(SiblingList::new()),
        }
    }

    /// An empty file.
    pub fn file(name: impl Into<String>, parent: NodeId) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
            body: NodeBody::File(Vec::new()),
        }
    }

    /// An empty directory.
    pub fn directory(name: impl Into<String>, parent: NodeId) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
            body: NodeBody::Directory(SiblingList::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File(_) => NodeKind::File,
            NodeBody::Directory(_) => NodeKind::Directory,
        }
    }

    /// Children, if this is a directory.
    pub fn children(&self) -> Option<&SiblingList> {
        match &self.body {
            NodeBody::Directory(children) => Some(children),
            NodeBody::File(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut SiblingList> {
        match &mut self.body {
            NodeBody::Directory(children) => Some(children),
            NodeBody::File(_) => None,
        }
    }

    /// Content, if this is a file.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.body {
            NodeBody::File(data) => Some(data.as_slice()),
            NodeBody::Directory(_) => None,
        }
    }

    /// Append to a file's content. Returns `None` for directories.
    pub fn append(&mut self, data: &[u8]) -> Option<usize> {
        match &mut self.body {
            NodeBody::File(content) => {
                content.extend_from_slice(data);
                Some(data.len())
            }
            NodeBody::Directory(_) => None,
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of nodes.
///
/// Holds at most `limit` nodes at once; ids are 32-bit, so never more than
/// `u32::MAX`.
#[derive(Debug)]
pub struct NodeStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    limit: usize,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            limit: u32::MAX as usize,
        }
    }
}

impl NodeStore {
    /// A store holding only `root`, which gets the first slot.
    pub fn with_root(root: Node) -> (Self, NodeId) {
        let store = Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            live: 1,
            ..Self::default()
        };
        (store, NodeId::from_raw(0, 0))
    }

    /// Cap the number of live nodes. Clamped to the id space.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(u32::MAX as usize);
        self
    }

    /// Store `node`, reusing a freed slot when one is available.
    ///
    /// Returns `None` once the store holds `limit` nodes.
    pub fn alloc(&mut self, node: Node) -> Option<NodeId> {
        if let Some(index) = self.free.pop() {
            let slot = self.slots.get_mut(index as usize)?;
            slot.node = Some(node);
            self.live += 1;
            return Some(NodeId::from_raw(index, slot.generation));
        }
        if self.slots.len() >= self.limit {
            return None;
        }
        let index = u32::try_from(self.slots.len()).ok()?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.live += 1;
        Some(NodeId::from_raw(index, 0))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Free one slot. Children of a released directory are not touched.
    pub fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(node)
    }

    /// Free `id` and everything below it. Returns the number of nodes released.
    pub fn release_subtree(&mut self, id: NodeId) -> usize {
        let mut pending = vec![id];
        let mut released = 0;
        while let Some(next) = pending.pop() {
            if let Some(node) = self.release(next) {
                released += 1;
                if let NodeBody::Directory(mut children) = node.body {
                    pending.extend(children.drain());
                }
            }
        }
        released
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
