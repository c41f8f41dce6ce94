//! Kit configuration loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use solar_core::{KitConfig, StatMultipliers};

use crate::loaders::{LoadResult, read_file};

/// Everything `config.toml` holds. Missing tables and keys keep their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitSettings {
    pub kit: KitConfig,
    pub stats: StatMultipliers,
}

/// Loader for kit configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    const EMBEDDED: &'static str = include_str!("../../data/config.toml");

    pub fn load(path: &Path) -> LoadResult<KitSettings> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| e.context(format!("in {}", path.display())))
    }

    /// The built-in configuration.
    pub fn embedded() -> LoadResult<KitSettings> {
        Self::parse(Self::EMBEDDED)
    }

    pub fn parse(content: &str) -> LoadResult<KitSettings> {
        let settings: KitSettings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse kit config TOML: {}", e))?;
        if !(settings.kit.max_charge > 0.0) {
            anyhow::bail!("max_charge must be positive, got {}", settings.kit.max_charge);
        }
        if settings.kit.ticks_per_second == 0 {
            anyhow::bail!("ticks_per_second must be at least 1");
        }
        if settings.kit.nova_min_radius > settings.kit.nova_max_radius {
            anyhow::bail!(
                "nova radius bounds are inverted: {} > {}",
                settings.kit.nova_min_radius,
                settings.kit.nova_max_radius
            );
        }
        Ok(settings)
    }
}
