use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use log::{info, debug};

use crate::utils::file_utils;
use super::types::TypeIndex;

/// Reads and writes the index file
#[derive(Debug)]
pub struct IndexStorage {
    index_path: PathBuf,
}

impl IndexStorage {
    pub fn new(index_path: impl AsRef<Path>) -> Self {
        Self {
            index_path: index_path.as_ref().to_path_buf(),
        }
    }

    /// Load the index, or start an empty one if the file does not exist yet
    pub fn load(&self) -> Result<TypeIndex> {
        let path = &self.index_path;
        debug!("Loading type index from {}", path.display());

        if !path.exists() {
            info!("Type index does not exist, creating new index");
            return Ok(TypeIndex::default());
        }

        let content = file_utils::read_file_to_string(path)?;
        let index: TypeIndex = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse type index {}", path.display()))?;

        info!("Loaded type index with {} types", index.entries.len());
        Ok(index)
    }

    pub fn save(&self, index: &TypeIndex) -> Result<()> {
        let path = &self.index_path;
        debug!("Saving type index to {}", path.display());

        let content = serde_json::to_string_pretty(index)
            .context("Failed to serialize type index")?;
        file_utils::write_string_to_file(path, &content)?;

        info!("Saved type index with {} types", index.entries.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.index_path
    }
}
