//! Storage module: the store folder and its record files.

pub mod fs;

pub use fs::{DirectoryManager, STORE_FOLDER};
