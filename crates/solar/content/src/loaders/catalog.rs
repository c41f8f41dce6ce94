//! Ability table loader.
//!
//! A table may leave entries out or carry values that fail validation. Either
//! way the load succeeds: the entry is disabled in the resulting catalog and a
//! warning is logged, so a broken definition costs one ability instead of the
//! whole kit.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solar_core::{
    AbilityCatalog, AbilityTier, AreaStunDescriptor, BeamDescriptor, BeamTier, CatalogError,
    ConeFreezeDescriptor, KitError, NovaDescriptor, OneShotKind, RevealDescriptor,
};

use crate::loaders::{LoadResult, read_file};

/// Ability table structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTable {
    pub beams: BTreeMap<BeamTier, BeamDescriptor>,
    pub cone_freeze: Option<ConeFreezeDescriptor>,
    pub area_stun: Option<AreaStunDescriptor>,
    pub reveal: Option<RevealDescriptor>,
    pub nova: Option<NovaDescriptor>,
}

impl AbilityTable {
    /// Builds a catalog, disabling every missing or invalid entry.
    pub fn into_catalog(self) -> (AbilityCatalog, Vec<CatalogError>) {
        let mut catalog = AbilityCatalog::standard();
        let mut faults = Vec::new();

        for tier in AbilityTier::all() {
            if !self.defines(tier) {
                faults.push(CatalogError::Missing(tier));
                catalog = catalog.disable(tier);
            }
        }

        for (tier, descriptor) in self.beams {
            catalog = catalog.with_beam(tier, descriptor);
        }
        if let Some(descriptor) = self.cone_freeze {
            catalog = catalog.with_cone_freeze(descriptor);
        }
        if let Some(descriptor) = self.area_stun {
            catalog = catalog.with_area_stun(descriptor);
        }
        if let Some(descriptor) = self.reveal {
            catalog = catalog.with_reveal(descriptor);
        }
        if let Some(descriptor) = self.nova {
            catalog = catalog.with_nova(descriptor);
        }

        let (catalog, invalid) = catalog.sanitized();
        faults.extend(invalid);
        (catalog, faults)
    }

    fn defines(&self, tier: AbilityTier) -> bool {
        match tier {
            AbilityTier::Beam(beam) => self.beams.contains_key(&beam),
            AbilityTier::OneShot(OneShotKind::ConeFreeze) => self.cone_freeze.is_some(),
            AbilityTier::OneShot(OneShotKind::AreaStun) => self.area_stun.is_some(),
            AbilityTier::OneShot(OneShotKind::Reveal) => self.reveal.is_some(),
            AbilityTier::OneShot(OneShotKind::Nova) => self.nova.is_some(),
        }
    }
}

/// Loader for the ability catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    const EMBEDDED: &'static str = include_str!("../../data/abilities.ron");

    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| e.context(format!("in {}", path.display())))
    }

    /// The built-in ability table.
    pub fn embedded() -> LoadResult<AbilityCatalog> {
        Self::parse(Self::EMBEDDED)
    }

    /// Parses a table. Only malformed RON is an error.
    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let table: AbilityTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability table RON: {}", e))?;
        let (catalog, faults) = table.into_catalog();
        for fault in &faults {
            tracing::warn!(
                target: "content::catalog",
                ability = %fault.tier(),
                code = fault.error_code(),
                "{fault}; ability disabled"
            );
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_matches_standard_catalog() {
        let catalog = CatalogLoader::embedded().unwrap();
        assert_eq!(catalog, AbilityCatalog::standard());
    }

    #[test]
    fn missing_entries_are_disabled() {
        let catalog = CatalogLoader::parse(
            r#"#![enable(implicit_some)]
            (
                beams: {
                    Low: (
                        charge_cost_per_second: 0.2,
                        damage_per_second: 10.0,
                        ignite_chance_per_second: 0.1,
                        armor_penetration: 0.0,
                        visual_scale: 0.5,
                        effect_size: 0.1,
                    ),
                },
                reveal: (charge_cost: 3.0, radius: 12.0),
            )"#,
        )
        .unwrap();

        assert_eq!(catalog.beam(BeamTier::Low).unwrap().charge_cost_per_second, 0.2);
        assert_eq!(catalog.reveal().unwrap().radius, 12.0);
        assert_eq!(
            catalog.beam(BeamTier::Lethal),
            Err(CatalogError::Disabled(AbilityTier::Beam(BeamTier::Lethal)))
        );
        assert!(catalog.nova().is_err());
        assert!(catalog.cone_freeze().is_err());
        assert!(catalog.area_stun().is_err());
    }

    #[test]
    fn invalid_entry_is_disabled_alone() {
        let mut table: AbilityTable = ron::from_str(CatalogLoader::EMBEDDED).unwrap();
        if let Some(beam) = table.beams.get_mut(&BeamTier::High) {
            beam.ignite_chance_per_second = 1.5;
        }
        let (catalog, faults) = table.into_catalog();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].tier(), AbilityTier::Beam(BeamTier::High));
        assert!(!catalog.is_enabled(AbilityTier::Beam(BeamTier::High)));
        assert!(catalog.is_enabled(AbilityTier::Beam(BeamTier::Medium)));
        assert!(catalog.nova().is_ok());
    }

    #[test]
    fn malformed_table_is_an_error() {
        assert!(CatalogLoader::parse("(beams: {Low: (").is_err());
        assert!(CatalogLoader::parse("(beams: {Blinding: ()})").is_err());
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abilities.ron");
        std::fs::write(&path, "(reveal: Some((charge_cost: 1.0, radius: 5.0)))").unwrap();
        let catalog = CatalogLoader::load(&path).unwrap();
        assert_eq!(catalog.reveal().unwrap().radius, 5.0);
        assert!(catalog.beam(BeamTier::Low).is_err());
    }
}
