//! Adapter-facing operations trait.
//!
//! Host filesystem adapters (FUSE-style callback tables) call through this
//! trait. It is path-based with explicit offset/size, and every method takes
//! `&self` so one handle can serve every callback.

use super::types::{DirEntry, FileAttr, StatFs};
use super::VfsResult;

/// Callback surface of the namespace.
pub trait VfsOps: Send + Sync {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get file attributes.
    fn getattr(&self, path: &str) -> VfsResult<FileAttr>;

    /// Read directory entries, `.` and `..` first.
    fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>>;

    /// Read up to `size` bytes starting at `offset`.
    ///
    /// Returns fewer bytes if EOF is reached.
    fn read(&self, path: &str, size: usize, offset: u64) -> VfsResult<Vec<u8>>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Append `data` to a file, creating it if needed. `offset` is ignored.
    ///
    /// Returns the number of bytes written.
    fn write(&self, path: &str, data: &[u8], offset: u64) -> VfsResult<usize>;

    /// Create a new empty file.
    fn create(&self, path: &str) -> VfsResult<FileAttr>;

    /// Create a new empty directory.
    fn mkdir(&self, path: &str) -> VfsResult<FileAttr>;

    /// Remove a file.
    fn unlink(&self, path: &str) -> VfsResult<()>;

    /// Remove a directory.
    fn rmdir(&self, path: &str) -> VfsResult<()>;

    /// Timestamp update; accepted without effect.
    fn utimens(&self, path: &str) -> VfsResult<()>;

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Get filesystem statistics.
    fn statfs(&self) -> VfsResult<StatFs>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    fn exists(&self, path: &str) -> bool {
        self.getattr(path).is_ok()
    }

    /// Read entire file contents.
    fn read_all(&self, path: &str) -> VfsResult<Vec<u8>> {
        let attr = self.getattr(path)?;
        self.read(path, attr.size as usize, 0)
    }
}
