//! Thread-shareable namespace handle.
//!
//! The namespace itself is single-threaded. [`SharedNamespace`] puts it behind
//! one mutex and holds the lock for exactly one operation, so callbacks from a
//! multi-threaded host are serialized.

use parking_lot::Mutex;
use std::sync::Arc;

use super::error::VfsResult;
use super::namespace::Namespace;
use super::ops::VfsOps;
use super::types::{DirEntry, FileAttr, StatFs};
use crate::config::NamespaceConfig;

/// Cloneable handle to a namespace shared between threads.
#[derive(Debug, Clone, Default)]
pub struct SharedNamespace {
    inner: Arc<Mutex<Namespace>>,
}

impl SharedNamespace {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            inner: Arc::new(Mutex::new(namespace)),
        }
    }

    pub fn with_config(config: NamespaceConfig) -> Self {
        Self::new(Namespace::with_config(config))
    }

    /// Run `f` with exclusive access to the namespace.
    pub fn with<R>(&self, f: impl FnOnce(&mut Namespace) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Chat-style delivery, see [`Namespace::post`].
    pub fn post(&self, path: &str, data: &[u8]) -> VfsResult<usize> {
        self.inner.lock().post(path, data)
    }
}

impl From<Namespace> for SharedNamespace {
    fn from(namespace: Namespace) -> Self {
        Self::new(namespace)
    }
}

impl VfsOps for SharedNamespace {
    fn getattr(&self, path: &str) -> VfsResult<FileAttr> {
        self.inner.lock().stat(path)
    }

    fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        self.inner.lock().list_entries(path)
    }

    fn read(&self, path: &str, size: usize, offset: u64) -> VfsResult<Vec<u8>> {
        self.inner.lock().read(path, size, offset)
    }

    fn write(&self, path: &str, data: &[u8], offset: u64) -> VfsResult<usize> {
        self.inner.lock().write(path, data, offset)
    }

    fn create(&self, path: &str) -> VfsResult<FileAttr> {
        self.inner.lock().create_file(path)
    }

    fn mkdir(&self, path: &str) -> VfsResult<FileAttr> {
        self.inner.lock().make_directory(path)
    }

    fn unlink(&self, path: &str) -> VfsResult<()> {
        self.inner.lock().unlink(path)
    }

    fn rmdir(&self, path: &str) -> VfsResult<()> {
        self.inner.lock().remove_directory(path)
    }

    fn utimens(&self, path: &str) -> VfsResult<()> {
        self.inner.lock().set_times(path)
    }

    fn statfs(&self) -> VfsResult<StatFs> {
        let nodes = self.inner.lock().node_count();
        Ok(StatFs::with_files(nodes as u64))
    }
}
