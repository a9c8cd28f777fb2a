//! Attribute and listing types handed to adapters.

use serde::{Deserialize, Serialize};

/// Kind of a namespace node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Regular file with append-only content.
    File,
    /// Directory holding name-ordered children.
    Directory,
}

impl NodeKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Directory => "directory",
        }
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File attributes (metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttr {
    /// Inode-style number, stable for the node's lifetime. The root is 1.
    pub ino: u64,
    /// Node kind.
    pub kind: NodeKind,
    /// Content length in bytes (0 for directories).
    pub size: u64,
    /// Unix permission bits.
    pub perm: u32,
    /// Number of hard links.
    pub nlink: u32,
}

impl FileAttr {
    /// Attributes for a file with `size` bytes of content.
    pub fn file(ino: u64, size: u64, perm: u32) -> Self {
        Self {
            ino,
            kind: NodeKind::File,
            size,
            perm,
            nlink: 1,
        }
    }

    /// Attributes for a directory.
    pub fn directory(ino: u64, perm: u32) -> Self {
        Self {
            ino,
            kind: NodeKind::Directory,
            size: 0,
            perm,
            nlink: 2, // . and ..
        }
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// `st_mode` value: type bits combined with the permission bits.
    pub fn mode(&self) -> u32 {
        const S_IFREG: u32 = 0o100000;
        const S_IFDIR: u32 = 0o040000;
        let type_bits = match self.kind {
            NodeKind::File => S_IFREG,
            NodeKind::Directory => S_IFDIR,
        };
        type_bits | self.perm
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub kind: NodeKind,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a file entry.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::File)
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Directory)
    }
}

/// Filesystem statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatFs {
    /// Total blocks.
    pub blocks: u64,
    /// Free blocks.
    pub bfree: u64,
    /// Available blocks (to non-root).
    pub bavail: u64,
    /// Total inodes.
    pub files: u64,
    /// Free inodes.
    pub ffree: u64,
    /// Block size.
    pub bsize: u32,
    /// Maximum name length.
    pub namelen: u32,
    /// Fragment size.
    pub frsize: u32,
}

impl StatFs {
    /// Statistics reporting `files` live nodes.
    pub fn with_files(files: u64) -> Self {
        let base = Self::default();
        Self {
            files,
            ffree: base.ffree.saturating_sub(files),
            ..base
        }
    }
}

impl Default for StatFs {
    fn default() -> Self {
        Self {
            blocks: 1024 * 1024,
            bfree: 512 * 1024,
            bavail: 512 * 1024,
            files: 0,
            ffree: 1024 * 1024,
            bsize: 4096,
            namelen: 255,
            frsize: 4096,
        }
    }
}
