//! Which entities hold the solar capability.
//!
//! Replaces a global "does this entity have the gene" lookup: every query goes
//! through the registry the runtime owns.

use std::collections::BTreeMap;
use std::sync::Arc;

use solar_core::{
    AbilityCatalog, Env, EntityId, EntityKind, KitConfig, KitEvent, KitSave, SolarKit,
    StatMultipliers,
};

use crate::api::{Result, RuntimeError};

/// Kits keyed by owner, iterated in owner order so ticks are deterministic.
#[derive(Debug)]
pub struct CapabilityRegistry {
    kits: BTreeMap<EntityId, SolarKit>,
    catalog: Arc<AbilityCatalog>,
    config: KitConfig,
    stats: StatMultipliers,
}

impl CapabilityRegistry {
    pub fn new(catalog: AbilityCatalog, config: KitConfig) -> Self {
        Self {
            kits: BTreeMap::new(),
            catalog: Arc::new(catalog),
            config,
            stats: StatMultipliers::new(),
        }
    }

    pub fn with_stat_multipliers(mut self, stats: StatMultipliers) -> Self {
        self.stats = stats;
        self
    }

    /// Gives `owner` a fresh kit with a full gauge.
    pub fn grant(&mut self, owner: EntityId) -> Result<&mut SolarKit> {
        if self.kits.contains_key(&owner) {
            return Err(RuntimeError::AlreadyGranted(owner));
        }
        let kit = self.build(owner, None);
        Ok(self.kits.entry(owner).or_insert(kit))
    }

    /// Removes the kit, silently ending its beam and clearing the exhaustion
    /// marker. Returns the kit's last events, or `None` if `owner` had none.
    pub fn revoke(&mut self, owner: EntityId, env: &mut Env<'_>) -> Option<Vec<KitEvent>> {
        self.kits.remove(&owner).map(|kit| kit.dismantle(env))
    }

    pub fn has_capability(&self, entity: EntityId) -> bool {
        self.kits.contains_key(&entity)
    }

    /// Whether the entity is a holder or the corpse of one.
    pub fn covers(&self, entity: EntityId, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Corpse { inner } => self.has_capability(inner),
            _ => self.has_capability(entity),
        }
    }

    pub fn kit(&self, owner: EntityId) -> Option<&SolarKit> {
        self.kits.get(&owner)
    }

    pub fn kit_mut(&mut self, owner: EntityId) -> Option<&mut SolarKit> {
        self.kits.get_mut(&owner)
    }

    pub fn owners(&self) -> Vec<EntityId> {
        self.kits.keys().copied().collect()
    }

    pub fn kits(&self) -> impl Iterator<Item = &SolarKit> {
        self.kits.values()
    }

    pub fn len(&self) -> usize {
        self.kits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kits.is_empty()
    }

    /// Replaces every kit with the saved ones. Restored beams are idle.
    pub fn restore_all(&mut self, saves: impl IntoIterator<Item = (EntityId, KitSave)>) {
        self.kits = saves
            .into_iter()
            .map(|(owner, save)| (owner, self.build(owner, Some(&save))))
            .collect();
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    fn build(&self, owner: EntityId, save: Option<&KitSave>) -> SolarKit {
        let kit = match save {
            Some(save) => SolarKit::restore(owner, save, Arc::clone(&self.catalog), self.config),
            None => SolarKit::new(owner, Arc::clone(&self.catalog), self.config),
        };
        kit.with_stat_multipliers(self.stats)
    }
}
