//! In-memory KitRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KitRepository, RepositoryError, Result, RuntimeSnapshot};

#[derive(Default)]
pub struct InMemoryKitRepository {
    slots: RwLock<HashMap<String, RuntimeSnapshot>>,
}

impl InMemoryKitRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KitRepository for InMemoryKitRepository {
    fn save(&self, slot: &str, snapshot: &RuntimeSnapshot) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_owned(), snapshot.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<RuntimeSnapshot>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut names: Vec<String> = slots.keys().cloned().collect();
        names.sort_unstable();
        Ok(names)
    }
}
