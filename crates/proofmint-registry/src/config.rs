//! Host configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RegistryError, Result};
use crate::registry::CollectionInfo;

/// Default tracing directive when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "proofmint=info,proofmint_registry=info";

/// Registry host configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding the registry snapshot
    pub data_dir: PathBuf,

    /// Collection name and symbol used when a new registry is created
    pub collection: CollectionInfo,

    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./proofmint_data"),
            collection: CollectionInfo::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the registry cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.collection.name.trim().is_empty() {
            return Err(RegistryError::Config("collection name is empty".into()));
        }
        if self.collection.symbol.trim().is_empty() {
            return Err(RegistryError::Config("collection symbol is empty".into()));
        }
        Ok(())
    }

    /// Create directories if they don't exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}
