pub mod class;
pub mod config;
pub mod error;
pub mod index;
pub mod utils;

// Re-export main types and functions for easier access
pub use class::types::{
    DeclaredType, FieldReader, FieldValue, LoadStats, ScanOptions, StaticField,
    StaticFieldAccessor, Subtype, TypeDescriptor, TypeKind, Visibility,
};
pub use class::registry::TypeRegistry;
pub use class::scanner::{ClasspathLoadResult, ClasspathLoader, ClasspathScanner, PackageExclusions};
pub use class::processor::{
    extract_static_fields, find, read_static_fields, DiscardReason, FieldRead, FilterStats,
    FindQuery, PackageFilter, StaticFieldExtractor,
};

pub use error::{ReflectError, Result};

pub use index::{IndexOperations, IndexQuery, IndexStats, TypeIndex};
