use std::collections::{BTreeMap, HashMap};
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};

use crate::class::types::DeclaredType;

/// Entry in the type index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The registered type, with computed fields frozen to their values
    pub descriptor: DeclaredType,

    /// Manifest the type was loaded from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// When this type was first added to the index
    pub added_at: DateTime<Utc>,

    /// When this type was last updated in the index
    pub updated_at: DateTime<Utc>,

    /// Hash of the source manifest (or of the descriptor itself) when indexed
    pub source_hash: String,
}

/// Persisted snapshot of a type registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeIndex {
    /// Qualified type name to entry
    pub entries: BTreeMap<String, IndexEntry>,

    /// Manifest path to the types it declares
    pub manifest_types: HashMap<String, Vec<String>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Crate version that wrote the index
    pub version: String,
}

/// Statistics about an index update
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_types: usize,
    pub total_manifests: usize,
    pub added_types: usize,
    pub updated_types: usize,
    pub removed_types: usize,
}

impl Default for TypeIndex {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            manifest_types: HashMap::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
