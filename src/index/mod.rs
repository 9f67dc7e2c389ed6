pub mod types;
pub mod storage;
pub mod operations;

pub use types::{IndexEntry, IndexStats, TypeIndex};
pub use operations::{IndexOperations, IndexQuery, SortField};
pub use storage::IndexStorage;
