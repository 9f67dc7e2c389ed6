use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};

use crate::class::registry::TypeRegistry;
use crate::class::scanner::ClasspathLoadResult;
use crate::class::types::{DeclaredType, TypeDescriptor, TypeKind};
use crate::utils::hash_utils;
use super::storage::IndexStorage;
use super::types::{IndexEntry, IndexStats, TypeIndex};

/// Field to order query results by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    AddedAt,
    UpdatedAt,
}

/// Options for querying the index
#[derive(Debug, Clone, Default)]
pub struct IndexQuery {
    /// Only types directly inside this package
    pub package: Option<String>,

    /// Only types listing this name among their direct supertypes
    pub supertype: Option<String>,

    pub kind: Option<TypeKind>,

    /// Maximum number of results to return
    pub limit: Option<usize>,

    pub sort_by: Option<SortField>,

    pub descending: bool,
}

enum Upsert {
    Added,
    Updated,
    Unchanged,
}

/// Loads, updates, queries and saves the type index
#[derive(Debug)]
pub struct IndexOperations {
    storage: IndexStorage,
    index: TypeIndex,
}

impl IndexOperations {
    /// Open the index at `index_path`, creating an empty one if missing
    pub fn new(index_path: impl AsRef<Path>) -> Result<Self> {
        let storage = IndexStorage::new(index_path);
        let index = storage.load()?;
        Ok(Self { storage, index })
    }

    pub fn index(&self) -> &TypeIndex {
        &self.index
    }

    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.index)
    }

    /// Merge the types of a classpath load into the index
    ///
    /// Types that disappeared from a reloaded manifest are removed, as are all
    /// types of manifests no longer on the classpath.
    pub fn update_with_load_result(&mut self, result: &ClasspathLoadResult) -> IndexStats {
        info!("Updating type index from {} manifests", result.manifests.len());

        let mut stats = IndexStats::default();
        let mut seen = HashSet::new();

        for manifest in &result.manifests {
            let source = manifest.path.to_string_lossy().to_string();
            let mut declared = Vec::with_capacity(manifest.types.len());

            for ty in &manifest.types {
                // The registry keeps the first registration of a name
                if !seen.insert(ty.qualified_name.clone()) {
                    continue;
                }
                declared.push(ty.qualified_name.clone());
                let outcome = self.upsert(ty.clone(), Some(source.clone()), manifest.hash.clone());
                Self::count(&mut stats, outcome);
            }

            let previous = self.index.manifest_types.insert(source.clone(), declared.clone());
            for stale in previous.unwrap_or_default() {
                if declared.contains(&stale) {
                    continue;
                }
                let owned_here = self.index.entries.get(&stale)
                    .is_some_and(|entry| entry.source.as_deref() == Some(source.as_str()));
                if owned_here {
                    debug!("Removing {} no longer declared in {}", stale, source);
                    self.index.entries.remove(&stale);
                    stats.removed_types += 1;
                }
            }
        }

        // Manifests that vanished from the classpath take their types with them;
        // ones that merely failed to parse keep their last good state
        let kept: HashSet<String> = result.manifests.iter()
            .map(|m| m.path.to_string_lossy().to_string())
            .chain(result.stats.error_file_paths.iter().map(|p| p.to_string_lossy().to_string()))
            .collect();
        let vanished: Vec<String> = self.index.manifest_types.keys()
            .filter(|source| !kept.contains(*source))
            .cloned()
            .collect();

        for source in vanished {
            debug!("Manifest {} is gone, dropping its types", source);
            self.index.manifest_types.remove(&source);
            let before = self.index.entries.len();
            self.index.entries
                .retain(|_, entry| entry.source.as_deref() != Some(source.as_str()));
            stats.removed_types += before - self.index.entries.len();
        }

        self.finish_update(stats)
    }

    /// Merge the types of an in-memory registry into the index
    pub fn update_with_registry(&mut self, registry: &TypeRegistry) -> Result<IndexStats> {
        info!("Updating type index from a registry of {} types", registry.len());

        let mut stats = IndexStats::default();
        for ty in registry.iter() {
            let frozen = DeclaredType {
                fields: ty.fields.iter().map(|f| f.snapshot()).collect(),
                ..ty.as_ref().clone()
            };
            let json = serde_json::to_string(&frozen)
                .with_context(|| format!("Failed to serialize type {}", frozen.qualified_name))?;
            let outcome = self.upsert(frozen, None, hash_utils::hash_string(&json));
            Self::count(&mut stats, outcome);
        }

        // Registry-sourced entries the registry no longer holds
        let before = self.index.entries.len();
        self.index.entries
            .retain(|name, entry| entry.source.is_some() || registry.get(name).is_some());
        stats.removed_types += before - self.index.entries.len();

        Ok(self.finish_update(stats))
    }

    fn upsert(&mut self, descriptor: DeclaredType, source: Option<String>, source_hash: String) -> Upsert {
        let now = Utc::now();
        let name = descriptor.qualified_name.clone();

        match self.index.entries.get_mut(&name) {
            Some(existing) if existing.source_hash == source_hash => Upsert::Unchanged,
            Some(existing) => {
                existing.descriptor = descriptor;
                existing.source = source;
                existing.source_hash = source_hash;
                existing.updated_at = now;
                Upsert::Updated
            }
            None => {
                self.index.entries.insert(name, IndexEntry {
                    descriptor,
                    source,
                    added_at: now,
                    updated_at: now,
                    source_hash,
                });
                Upsert::Added
            }
        }
    }

    fn count(stats: &mut IndexStats, outcome: Upsert) {
        match outcome {
            Upsert::Added => stats.added_types += 1,
            Upsert::Updated => stats.updated_types += 1,
            Upsert::Unchanged => {}
        }
    }

    fn finish_update(&mut self, mut stats: IndexStats) -> IndexStats {
        self.index.updated_at = Utc::now();
        stats.total_types = self.index.entries.len();
        stats.total_manifests = self.index.manifest_types.len();

        info!(
            "Type index update complete: {} types, {} added, {} updated, {} removed",
            stats.total_types, stats.added_types, stats.updated_types, stats.removed_types
        );
        stats
    }

    /// Query the index for entries matching the given options
    pub fn query(&self, options: &IndexQuery) -> Vec<&IndexEntry> {
        let mut results: Vec<&IndexEntry> = self.index.entries.values()
            .filter(|entry| {
                let ty = &entry.descriptor;
                if let Some(package) = &options.package {
                    if !ty.package().eq_ignore_ascii_case(package) {
                        return false;
                    }
                }
                if let Some(supertype) = &options.supertype {
                    if !ty.supertypes.contains(supertype) {
                        return false;
                    }
                }
                if let Some(kind) = options.kind {
                    if ty.kind != kind {
                        return false;
                    }
                }
                true
            })
            .collect();

        // Entries are already in name order
        match options.sort_by {
            Some(SortField::Name) | None => {}
            Some(SortField::AddedAt) => results.sort_by(|a, b| a.added_at.cmp(&b.added_at)),
            Some(SortField::UpdatedAt) => results.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
        }
        if options.descending {
            results.reverse();
        }

        if let Some(limit) = options.limit {
            results.truncate(limit);
        }

        results
    }

    pub fn get_type(&self, qualified_name: &str) -> Option<&IndexEntry> {
        self.index.entries.get(qualified_name)
    }

    /// All indexed types declared by a manifest
    pub fn get_types_in_manifest(&self, manifest_path: impl AsRef<Path>) -> Vec<&IndexEntry> {
        let path_str = manifest_path.as_ref().to_string_lossy().to_string();

        self.index.manifest_types.get(&path_str)
            .map(|names| names.iter().filter_map(|name| self.index.entries.get(name)).collect())
            .unwrap_or_default()
    }

    /// Rebuild a registry from the indexed descriptors
    pub fn to_registry(&self) -> TypeRegistry {
        self.index.entries.values()
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn get_stats(&self) -> IndexStats {
        IndexStats {
            total_types: self.index.entries.len(),
            total_manifests: self.index.manifest_types.len(),
            ..IndexStats::default()
        }
    }
}
