//! Namespace configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! depth_policy = "reference"   # or "uniform"
//! rmdir_policy = "require-empty"   # or "cascade"
//! dir_perm = 0o755
//! file_perm = 0o444
//! max_nodes = 65536   # unlimited when absent
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

/// Where creation operations may place new entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum DepthPolicy {
    /// mkdir only directly below the root, write/post only at `/<dir>/<file>`,
    /// create at any depth.
    #[default]
    Reference,
    /// mkdir, create and write below any existing directory.
    Uniform,
}

/// What removing a non-empty directory does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum RmdirPolicy {
    /// Refuse with `DirectoryNotEmpty`.
    #[default]
    RequireEmpty,
    /// Release the whole subtree.
    Cascade,
}

impl DepthPolicy {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }
}

impl RmdirPolicy {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }
}

/// Configuration for a [`Namespace`](crate::Namespace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Depth rules for mkdir/create/write.
    pub depth_policy: DepthPolicy,
    /// Behaviour of rmdir on a non-empty directory.
    pub rmdir_policy: RmdirPolicy,
    /// Permission bits reported for directories.
    pub dir_perm: u32,
    /// Permission bits reported for files.
    pub file_perm: u32,
    /// Most live nodes, root included. Unlimited when `None`.
    pub max_nodes: Option<usize>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            depth_policy: DepthPolicy::default(),
            rmdir_policy: RmdirPolicy::default(),
            dir_perm: 0o755,
            file_perm: 0o444,
            max_nodes: None,
        }
    }
}

impl NamespaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the depth policy.
    pub fn with_depth_policy(mut self, policy: DepthPolicy) -> Self {
        self.depth_policy = policy;
        self
    }

    /// Set the rmdir policy.
    pub fn with_rmdir_policy(mut self, policy: RmdirPolicy) -> Self {
        self.rmdir_policy = policy;
        self
    }

    /// Set the reported permission bits.
    pub fn with_perms(mut self, dir_perm: u32, file_perm: u32) -> Self {
        self.dir_perm = dir_perm;
        self.file_perm = file_perm;
        self
    }

    /// Cap the number of live nodes.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "loaded namespace config");
        Ok(config)
    }
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
