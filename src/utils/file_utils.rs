use std::path::Path;
use std::fs;
use anyhow::{Result, Context};
use log::debug;

/// Create a directory if it doesn't exist
pub fn ensure_dir_exists(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        debug!("Creating directory: {}", dir.display());
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Check if a file name ends with a suffix such as `types.json`, ignoring case
pub fn has_suffix(path: impl AsRef<Path>, suffix: &str) -> bool {
    let Some(file_name) = path.as_ref().file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let suffix = format!(".{}", suffix.trim_start_matches('.'));
    file_name.len() > suffix.len()
        && file_name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase())
}

/// Check if a file name ends with one of the given suffixes
pub fn has_any_suffix(path: impl AsRef<Path>, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| has_suffix(path.as_ref(), suffix))
}

/// Read a file to string with better error handling
pub fn read_file_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}

/// Write a string to a file, creating the parent directory when needed
pub fn write_string_to_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write file {}", path.display()))
}
