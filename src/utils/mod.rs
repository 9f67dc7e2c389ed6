pub mod file_utils;
pub mod hash_utils;
pub mod names;
