use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;

use crate::class::types::ScanOptions;
use crate::utils::file_utils;

impl ScanOptions {
    /// Load options from a `.toml`, `.yaml` or `.yml` file
    ///
    /// Keys missing from the file keep their default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading scan options from {}", path.display());

        let content = file_utils::read_file_to_string(path)?;
        let extension = path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML options {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML options {}", path.display())),
            _ => bail!("Unsupported options file format: {}", path.display()),
        }
    }
}
