mod field_extractor;
mod package_filter;
mod stats;

pub use field_extractor::{extract_static_fields, read_static_fields, FieldRead, StaticFieldExtractor};
pub use package_filter::{find, FindQuery, PackageFilter};
pub use stats::{DiscardReason, FilterStats};
