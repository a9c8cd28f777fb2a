//! Name-ordered children of one directory.

use super::error::{VfsError, VfsResult};
use super::store::NodeId;

#[derive(Debug, Clone)]
struct Sibling {
    name: String,
    id: NodeId,
}

/// Children of a directory, kept in strictly ascending byte-wise name order.
///
/// Names are unique within a list. All searches stop as soon as the sort
/// order proves the name absent.
#[derive(Debug, Clone, Default)]
pub struct SiblingList {
    entries: Vec<Sibling>,
}

impl SiblingList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ok(i)` if `name` is at `i`, `Err(i)` with the slot it would sort into.
    fn position(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
    }

    /// Insert `id` under `name` before the first greater sibling.
    ///
    /// Fails with `AlreadyExists` without touching the list if the name is taken.
    pub fn insert(&mut self, name: impl Into<String>, id: NodeId) -> VfsResult<()> {
        let name = name.into();
        match self.position(&name) {
            Ok(_) => Err(VfsError::already_exists(name)),
            Err(slot) => {
                self.entries.insert(slot, Sibling { name, id });
                Ok(())
            }
        }
    }

    /// Unlink the sibling called `name` and return its id.
    pub fn remove(&mut self, name: &str) -> VfsResult<NodeId> {
        match self.position(name) {
            Ok(slot) => Ok(self.entries.remove(slot).id),
            Err(_) => Err(VfsError::not_found(name)),
        }
    }

    /// Find the sibling called `name`.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.position(name).ok().map(|slot| self.entries[slot].id)
    }

    /// Returns true if a sibling called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    /// Names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// `(name, id)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.id))
    }

    /// Remove every sibling, returning their ids in name order.
    pub fn drain(&mut self) -> Vec<NodeId> {
        self.entries.drain(..).map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
