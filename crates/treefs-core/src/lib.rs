//! # treefs-core
//!
//! An in-memory virtual filesystem: a tree of directories and append-only
//! files that lives entirely in process memory, exposed as a small set of
//! path-based operations for a host filesystem adapter to call.
//!
//! ```
//! use treefs_core::Namespace;
//!
//! let mut ns = Namespace::new();
//! ns.make_directory("/inbox").unwrap();
//! ns.write("/inbox/notes", b"hello ", 0).unwrap();
//! ns.write("/inbox/notes", b"world", 0).unwrap();
//! assert_eq!(ns.read("/inbox/notes", 64, 0).unwrap(), b"hello world");
//! ```

pub mod config;
pub mod vfs;

pub use config::{ConfigError, DepthPolicy, NamespaceConfig, RmdirPolicy};
pub use vfs::{
    DirEntry, FileAttr, Namespace, NodeId, NodeKind, SharedNamespace, StatFs, VfsError, VfsOps,
    VfsResult,
};
