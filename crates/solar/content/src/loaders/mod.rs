//! Content loaders for reading kit data from files.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{AbilityTable, CatalogLoader};
pub use config::{ConfigLoader, KitSettings};
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
