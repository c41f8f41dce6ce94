//! Content factory for loading kit data from a directory.

use std::path::{Path, PathBuf};

use solar_core::AbilityCatalog;

use crate::loaders::{CatalogLoader, ConfigLoader, KitSettings, LoadResult};

/// Loads kit content from an optional override directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── abilities.ron
/// ```
///
/// A file absent from the directory falls back to the built-in copy.
pub struct ContentFactory {
    data_dir: Option<PathBuf>,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Built-in content only.
    pub fn embedded() -> Self {
        Self { data_dir: None }
    }

    pub fn load_settings(&self) -> LoadResult<KitSettings> {
        match self.override_path("config.toml") {
            Some(path) => {
                tracing::info!(target: "content", path = %path.display(), "loading kit config");
                ConfigLoader::load(&path)
            }
            None => ConfigLoader::embedded(),
        }
    }

    pub fn load_catalog(&self) -> LoadResult<AbilityCatalog> {
        match self.override_path("abilities.ron") {
            Some(path) => {
                tracing::info!(target: "content", path = %path.display(), "loading ability table");
                CatalogLoader::load(&path)
            }
            None => CatalogLoader::embedded(),
        }
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn override_path(&self, file: &str) -> Option<PathBuf> {
        let path = self.data_dir.as_ref()?.join(file);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_files_fall_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.data_dir(), Some(dir.path()));
        assert_eq!(factory.load_catalog().unwrap(), AbilityCatalog::standard());
        assert_eq!(
            factory.load_settings().unwrap(),
            ContentFactory::embedded().load_settings().unwrap()
        );
    }

    #[test]
    fn present_files_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[kit]\nabsorb_cap = 4.0\n").unwrap();
        let settings = ContentFactory::new(dir.path()).load_settings().unwrap();
        assert_eq!(settings.kit.absorb_cap, 4.0);
    }
}
