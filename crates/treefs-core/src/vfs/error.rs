//! Namespace error types.

use std::io;
use thiserror::Error;

/// Failure of a namespace operation.
///
/// Every variant carries the path (or name) the operation was addressing.
/// A failed operation never leaves the tree partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VfsError {
    /// File or directory not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A sibling with the same name already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Expected a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Expected a file, found a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// Expected a directory, found a file (directory removal).
    #[error("is a file: {0}")]
    IsAFile(String),

    /// Operation refused (e.g. mkdir below a non-root parent).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Path cannot address a creation target.
    #[error("malformed path: {0:?}")]
    MalformedPath(String),

    /// Directory not empty.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// The namespace holds as many nodes as it may.
    #[error("no space left: {0}")]
    NoSpace(String),
}

impl VfsError {
    /// Create a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: impl Into<String>) -> Self {
        Self::NotADirectory(path.into())
    }

    /// Create an IsADirectory error.
    pub fn is_a_directory(path: impl Into<String>) -> Self {
        Self::IsADirectory(path.into())
    }

    /// Create an IsAFile error.
    pub fn is_a_file(path: impl Into<String>) -> Self {
        Self::IsAFile(path.into())
    }

    /// Create a PermissionDenied error.
    pub fn permission_denied(path: impl Into<String>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Create a MalformedPath error.
    pub fn malformed_path(path: impl Into<String>) -> Self {
        Self::MalformedPath(path.into())
    }

    /// Create a DirectoryNotEmpty error.
    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty(path.into())
    }

    /// Create a NoSpace error.
    pub fn no_space(path: impl Into<String>) -> Self {
        Self::NoSpace(path.into())
    }

    /// POSIX error number a host adapter reports (negated) for this failure.
    pub fn errno(&self) -> i32 {
        match self {
            VfsError::NotFound(_) => errno::ENOENT,
            VfsError::AlreadyExists(_) => errno::EEXIST,
            VfsError::NotADirectory(_) | VfsError::IsAFile(_) => errno::ENOTDIR,
            VfsError::IsADirectory(_) => errno::EISDIR,
            VfsError::PermissionDenied(_) => errno::EPERM,
            VfsError::MalformedPath(_) => errno::EINVAL,
            VfsError::DirectoryNotEmpty(_) => errno::ENOTEMPTY,
            VfsError::NoSpace(_) => errno::ENOSPC,
        }
    }
}

/// Linux error numbers.
pub mod errno {
    pub const EPERM: i32 = 1;
    pub const ENOENT: i32 = 2;
    pub const EEXIST: i32 = 17;
    pub const ENOTDIR: i32 = 20;
    pub const EISDIR: i32 = 21;
    pub const EINVAL: i32 = 22;
    pub const ENOSPC: i32 = 28;
    pub const ENOTEMPTY: i32 = 39;
}

/// Convert VfsError to std::io::Error for compatibility.
impl From<VfsError> for io::Error {
    fn from(e: VfsError) -> Self {
        match e {
            VfsError::NotFound(msg) => io::Error::new(io::ErrorKind::NotFound, msg),
            VfsError::AlreadyExists(msg) => io::Error::new(io::ErrorKind::AlreadyExists, msg),
            VfsError::NotADirectory(msg) | VfsError::IsAFile(msg) => {
                io::Error::new(io::ErrorKind::NotADirectory, msg)
            }
            VfsError::IsADirectory(msg) => io::Error::new(io::ErrorKind::IsADirectory, msg),
            VfsError::PermissionDenied(msg) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            VfsError::MalformedPath(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            VfsError::DirectoryNotEmpty(msg) => {
                io::Error::new(io::ErrorKind::DirectoryNotEmpty, msg)
            }
            VfsError::NoSpace(msg) => io::Error::new(io::ErrorKind::StorageFull, msg),
        }
    }
}

/// VFS result type.
pub type VfsResult<T> = Result<T, VfsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(VfsError::not_found("/a").errno(), errno::ENOENT);
        assert_eq!(VfsError::already_exists("/a").errno(), errno::EEXIST);
        assert_eq!(VfsError::permission_denied("/a/b").errno(), errno::EPERM);
        assert_eq!(VfsError::is_a_file("/f").errno(), errno::ENOTDIR);
        assert_eq!(VfsError::is_a_directory("/d").errno(), errno::EISDIR);
        assert_eq!(VfsError::no_space("/d/f").errno(), errno::ENOSPC);
    }

    #[test]
    fn test_io_error_kind() {
        let err: io::Error = VfsError::directory_not_empty("/d").into();
        assert_eq!(err.kind(), io::ErrorKind::DirectoryNotEmpty);

        let err: io::Error = VfsError::malformed_path("x").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_display_carries_path() {
        let err = VfsError::not_found("/missing");
        assert_eq!(err.to_string(), "not found: /missing");
    }
}
