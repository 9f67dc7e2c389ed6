use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::class::types::{DeclaredType, StaticField, TypeKind};
use crate::utils::{file_utils, hash_utils, names};

/// On-disk description of the types declared in one package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeManifest {
    /// Package every listed type belongs to, empty for the root package
    #[serde(default)]
    pub package: String,

    #[serde(default)]
    pub types: Vec<ManifestType>,
}

/// A type entry inside a manifest, named relative to the manifest package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestType {
    pub name: String,

    #[serde(default)]
    pub kind: TypeKind,

    #[serde(default)]
    pub supertypes: Vec<String>,

    #[serde(default)]
    pub synthetic: bool,

    #[serde(default)]
    pub fields: Vec<StaticField>,
}

/// A manifest after parsing, with its types fully qualified
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,

    /// SHA-256 of the manifest text
    pub hash: String,

    pub package: String,

    pub types: Vec<DeclaredType>,
}

/// Parser turning manifest text into declared types
#[derive(Debug, Default)]
pub struct ManifestParser {
    /// Whether to log every parsed type
    pub verbose: bool,
}

impl ManifestParser {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Read and parse a manifest file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<LoadedManifest> {
        let path = path.as_ref();
        debug!("Parsing manifest: {}", path.display());

        let content = file_utils::read_file_to_string(path)?;
        self.parse_content(&content, path)
    }

    /// Parse manifest text; `path` is only used for reporting
    pub fn parse_content(&self, content: &str, path: &Path) -> Result<LoadedManifest> {
        let manifest: TypeManifest = serde_json::from_str(content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

        let package = manifest.package.trim().to_string();
        if !package.is_empty() {
            names::validate_qualified_name(&package, "package")
                .with_context(|| format!("Invalid package in manifest {}", path.display()))?;
        }

        let local: HashSet<&str> = manifest.types.iter().map(|t| t.name.as_str()).collect();
        let mut types = Vec::with_capacity(manifest.types.len());

        for entry in &manifest.types {
            if entry.name.contains('.') {
                bail!(
                    "Type '{}' in manifest {} must be named relative to its package",
                    entry.name,
                    path.display()
                );
            }
            names::validate_qualified_name(&entry.name, "type name")
                .with_context(|| format!("Invalid type in manifest {}", path.display()))?;

            let qualified_name = names::qualify(&package, &entry.name);
            let supertypes = entry.supertypes.iter()
                .map(|parent| {
                    // Undotted names refer to siblings declared in the same manifest
                    if !parent.contains('.') && local.contains(parent.as_str()) {
                        names::qualify(&package, parent)
                    } else {
                        parent.clone()
                    }
                })
                .collect();

            if self.verbose {
                trace!("Found type {} ({:?}) extending {:?}", qualified_name, entry.kind, entry.supertypes);
            }

            types.push(DeclaredType {
                qualified_name,
                kind: entry.kind,
                supertypes,
                synthetic: entry.synthetic,
                fields: entry.fields.clone(),
            });
        }

        debug!("Found {} types in {}", types.len(), path.display());
        Ok(LoadedManifest {
            path: path.to_path_buf(),
            hash: hash_utils::hash_string(content),
            package,
            types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn qualifies_names_and_sibling_supertypes() {
        let content = r#"{
            "package": "com.acme.tasks",
            "types": [
                { "name": "BaseTask", "kind": "abstract_class", "supertypes": ["java.lang.Runnable"] },
                { "name": "Ping", "supertypes": ["BaseTask", "Serializable"] }
            ]
        }"#;

        let manifest = ManifestParser::new(true)
            .parse_content(content, Path::new("tasks.types.json"))
            .unwrap();

        assert_eq!(manifest.package, "com.acme.tasks");
        assert_eq!(manifest.types[0].qualified_name, "com.acme.tasks.BaseTask");
        assert_eq!(manifest.types[0].kind, TypeKind::AbstractClass);
        assert_eq!(manifest.types[1].supertypes, vec!["com.acme.tasks.BaseTask", "Serializable"]);
        assert_eq!(manifest.hash, hash_utils::hash_string(content));
    }

    #[test]
    fn rejects_dotted_type_names() {
        let content = r#"{ "package": "a", "types": [ { "name": "b.C" } ] }"#;
        assert!(ManifestParser::default().parse_content(content, Path::new("x.types.json")).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ManifestParser::default().parse_content("{ not json", Path::new("x.types.json")).is_err());
    }
}
