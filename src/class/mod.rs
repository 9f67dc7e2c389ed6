pub mod types;
pub mod registry;
pub mod scanner;
pub mod processor;

// Re-export the main API for easier access
pub use types::{DeclaredType, FieldValue, StaticField, Subtype, TypeDescriptor, TypeKind, Visibility};
pub use registry::TypeRegistry;
pub use scanner::{ClasspathLoader, ClasspathScanner, PackageExclusions};
pub use processor::{PackageFilter, StaticFieldExtractor};
