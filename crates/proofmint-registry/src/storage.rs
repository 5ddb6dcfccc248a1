//! Registry snapshot storage
//!
//! Stands in for the host's persistent store: the whole registry is kept
//! as one JSON snapshot under the data directory.

use std::path::PathBuf;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::registry::{CollectionInfo, Registry};

const SNAPSHOT_FILE: &str = "registry.json";

/// File-backed registry storage
pub struct RegistryStorage {
    /// Base path for storage
    base_path: PathBuf,
}

impl RegistryStorage {
    /// Create a new storage instance
    pub fn new(base_path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Check if a snapshot has been written
    pub fn has_registry(&self) -> bool {
        self.registry_path().exists()
    }

    /// Load the registry, or a fresh uninitialized one if none is stored
    pub fn load_registry(&self, collection: &CollectionInfo) -> Result<Registry> {
        let path = self.registry_path();
        if !path.exists() {
            debug!("No snapshot at {:?}, starting uninitialized", path);
            return Ok(Registry::new(collection.clone()));
        }

        let content = std::fs::read_to_string(&path)?;
        let registry: Registry = serde_json::from_str(&content)?;
        registry.check_consistency()?;
        Ok(registry)
    }

    /// Load, apply one call, and save only if the call succeeded
    ///
    /// A rejected call leaves the stored snapshot untouched.
    pub fn update<T, E, F>(
        &self,
        collection: &CollectionInfo,
        apply: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Registry) -> std::result::Result<T, E>,
        E: From<RegistryError>,
    {
        let mut registry = self.load_registry(collection)?;
        let output = apply(&mut registry)?;
        self.save_registry(&registry)?;
        Ok(output)
    }

    /// Save the registry
    pub fn save_registry(&self, registry: &Registry) -> Result<()> {
        let path = self.registry_path();
        let content = serde_json::to_string_pretty(registry)?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, &path)?;

        debug!("Saved registry snapshot to {:?}", path);
        Ok(())
    }

    fn registry_path(&self) -> PathBuf {
        self.base_path.join(SNAPSHOT_FILE)
    }
}
