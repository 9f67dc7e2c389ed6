use std::path::{Path, PathBuf};
use anyhow::Result;
use log::{debug, trace, warn};
use walkdir::WalkDir;

use crate::utils::file_utils;

/// Collects type manifest files below a classpath root
#[derive(Debug)]
pub struct FileCollector {
    /// File name suffixes recognised as manifests
    suffixes: Vec<String>,
}

impl FileCollector {
    /// Create a collector for custom manifest suffixes
    pub fn with_suffixes(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }

    /// Collect all manifests under the root, sorted by path
    pub fn collect_files(&self, root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        debug!("Collecting manifests from: {}", root.display());

        if !root.exists() {
            warn!("Classpath root does not exist: {}", root.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if file_utils::has_any_suffix(entry.path(), &self.suffixes) {
                trace!("Found manifest: {}", entry.path().display());
                files.push(entry.path().to_owned());
            }
        }

        files.sort();
        debug!("Collected {} manifests from {}", files.len(), root.display());
        Ok(files)
    }
}
