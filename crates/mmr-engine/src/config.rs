//! # Accumulator Configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document (or no
//! file at all) gives a Keccak accumulator over an in-memory store that only
//! proves leaves:
//!
//! ```yaml
//! hasher: keccak          # or sha256
//! proof_policy: leaves-only   # or any-element
//! store:
//!   kind: sqlite          # or memory
//!   path: ./mmr.db
//! mmr_id: default
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mmr_core::StoreError;
use mmr_hash::HashAlgorithm;
use mmr_store::{MemoryStore, NodeStore, SqliteStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which element positions [`crate::Mmr::proof`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProofPolicy {
    /// Only leaves can be proven; internal positions fail with
    /// [`mmr_core::MmrError::NotALeaf`].
    #[default]
    LeavesOnly,
    /// Any element, leaf or internal, can be proven.
    AnyElement,
}

/// Node store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local store; contents are lost on exit.
    #[default]
    Memory,
    /// SQLite database file, created if missing.
    Sqlite {
        /// Path of the database file.
        path: PathBuf,
    },
}

impl StoreConfig {
    /// Open the configured backend for accumulator `mmr_id`.
    pub async fn open(&self, mmr_id: &str) -> Result<Arc<dyn NodeStore>, StoreError> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryStore::new())),
            Self::Sqlite { path } => Ok(Arc::new(SqliteStore::open(path, mmr_id).await?)),
        }
    }
}

/// Top-level accumulator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MmrConfig {
    /// Hash primitive for leaves, nodes and the root.
    pub hasher: HashAlgorithm,
    /// Which positions may be proven.
    pub proof_policy: ProofPolicy,
    /// Where nodes are kept.
    pub store: StoreConfig,
    /// Key separating accumulators that share one database.
    pub mmr_id: String,
}

impl Default for MmrConfig {
    fn default() -> Self {
        Self {
            hasher: HashAlgorithm::default(),
            proof_policy: ProofPolicy::default(),
            store: StoreConfig::default(),
            mmr_id: "default".to_string(),
        }
    }
}

/// Errors while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid configuration YAML.
    #[error("failed to parse config {path}: {source}")]
    YamlParse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A YAML string (not tied to a file) is invalid.
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MmrConfig {
    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })
    }
}
