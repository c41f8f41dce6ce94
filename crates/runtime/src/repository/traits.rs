//! Repository contract for saving and loading kits.

use serde::{Deserialize, Serialize};
use solar_core::{EntityId, KitSave, Tick};

use super::Result;

/// One holder's persisted kit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KitRecord {
    pub owner: EntityId,
    pub save: KitSave,
}

/// Every kit in a session at one tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSnapshot {
    pub tick: Tick,
    pub kits: Vec<KitRecord>,
}

/// Save slots keyed by name.
pub trait KitRepository: Send + Sync {
    fn save(&self, slot: &str, snapshot: &RuntimeSnapshot) -> Result<()>;

    fn load(&self, slot: &str) -> Result<Option<RuntimeSnapshot>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;

    /// Slot names in sorted order.
    fn list_slots(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
