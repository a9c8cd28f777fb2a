//! In-memory hierarchical namespace.
//!
//! Key components, leaves first:
//!
//! - [`NodeStore`] - arena owning every node and its content
//! - [`SiblingList`] - name-ordered children of one directory
//! - [`path`] - absolute path tokenizing
//! - [`Namespace`] - the operation set (stat, list, mkdir, create, write,
//!   read, unlink, rmdir)
//! - [`VfsOps`] / [`SharedNamespace`] - the seam a host adapter binds to
//!
//! ## Design Decisions
//!
//! - **Explicit context**: the tree lives in a [`Namespace`] value, not a
//!   global. Instances are independent and dropping one releases every node.
//! - **Ids, not pointers**: directories own their children by id through the
//!   store; the parent link is a non-owning id used for removal and path
//!   reconstruction.
//! - **Append-only content**: writes always land at the end of a file.

mod error;
mod namespace;
mod ops;
pub mod path;
mod shared;
mod siblings;
mod store;
mod types;

pub use error::{errno, VfsError, VfsResult};
pub use namespace::Namespace;
pub use ops::VfsOps;
pub use shared::SharedNamespace;
pub use siblings::SiblingList;
pub use store::{Node, NodeBody, NodeId, NodeStore};
pub use types::{DirEntry, FileAttr, NodeKind, StatFs};
