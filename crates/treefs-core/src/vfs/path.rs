//! Path tokenizing.
//!
//! Paths are absolute and slash-separated. `""` and `"/"` name the root and a
//! single trailing slash is ignored. Nothing is normalized: `.` and `..` are
//! ordinary names, and an empty component (`"/a//b"`) is yielded as `""`,
//! which never matches a node, so resolution reports it as not found.
//! `.` and `..` can't be created, since listings already report them for
//! every directory.

use std::str::Split;

use super::error::{VfsError, VfsResult};

/// Iterator over the components of an absolute path.
#[derive(Debug, Clone)]
pub struct Components<'a> {
    inner: Option<Split<'a, char>>,
}

impl<'a> Iterator for Components<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.as_mut()?.next()
    }
}

/// Split `path` into its components, root first.
///
/// A non-empty path that doesn't start with `/` is malformed.
pub fn components(path: &str) -> VfsResult<Components<'_>> {
    let rest = if path.is_empty() {
        ""
    } else {
        path.strip_prefix('/')
            .ok_or_else(|| VfsError::malformed_path(path))?
    };
    // A lone "/" after the root slash is an empty component, not a trailing slash.
    let rest = if rest.len() > 1 {
        rest.strip_suffix('/').unwrap_or(rest)
    } else {
        rest
    };
    Ok(Components {
        inner: (!rest.is_empty()).then(|| rest.split('/')),
    })
}

/// Split a creation target into `(parent path, new name)`.
///
/// The split happens at the last separator, ignoring one trailing slash:
/// `"/a/b/"` gives `("/a/", "b")`. A path without a separator, or whose
/// final name is empty, `.` or `..`, addresses nothing that can be created.
pub fn split_parent(path: &str) -> VfsResult<(&str, &str)> {
    let trimmed = if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    };
    let slash = trimmed
        .rfind('/')
        .ok_or_else(|| VfsError::malformed_path(path))?;
    let (parent, name) = (&trimmed[..=slash], &trimmed[slash + 1..]);
    if !is_creatable(name) {
        return Err(VfsError::malformed_path(path));
    }
    Ok((parent, name))
}

/// Returns true if `name` may be given to a new entry.
pub fn is_creatable(name: &str) -> bool {
    !matches!(name, "" | "." | "..")
}

/// Split a path that must be exactly `/<first>/<second>`.
pub fn split_two_level(path: &str) -> VfsResult<(&str, &str)> {
    let mut parts = components(path)?;
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) if is_creatable(first) && is_creatable(second) => {
            Ok((first, second))
        }
        _ => Err(VfsError::malformed_path(path)),
    }
}
