//! File-based KitRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{KitRepository, RepositoryError, Result, RuntimeSnapshot};

/// Stores each slot as `kits_{slot}.bin` in bincode format.
///
/// Writes go to a temp file first and are renamed into place, so a crash
/// mid-save leaves the previous save intact.
pub struct FileKitRepository {
    base_dir: PathBuf,
}

impl FileKitRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf> {
        let valid = !slot.is_empty()
            && slot
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidSlot(slot.to_owned()));
        }
        Ok(self.base_dir.join(format!("kits_{}.bin", slot)))
    }
}

impl KitRepository for FileKitRepository {
    fn save(&self, slot: &str, snapshot: &RuntimeSnapshot) -> Result<()> {
        let path = self.slot_path(slot)?;
        let temp_path = path.with_extension("bin.tmp");

        let bytes = bincode::serialize(snapshot)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(
            target: "runtime::repository",
            slot,
            kits = snapshot.kits.len(),
            path = %path.display(),
            "saved kits"
        );
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<RuntimeSnapshot>> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let snapshot: RuntimeSnapshot = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        tracing::debug!(
            target: "runtime::repository",
            slot,
            kits = snapshot.kits.len(),
            "loaded kits"
        );
        Ok(Some(snapshot))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).is_ok_and(|path| path.exists())
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<String>> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(slot) = filename
                    .strip_prefix("kits_")
                    .and_then(|s| s.strip_suffix(".bin"))
            {
                slots.push(slot.to_owned());
            }
        }
        slots.sort_unstable();
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::KitRecord;
    use solar_core::{EntityId, KitSave, Tick};

    fn snapshot(charge: f32) -> RuntimeSnapshot {
        RuntimeSnapshot {
            tick: Tick(42),
            kits: vec![KitRecord {
                owner: EntityId(3),
                save: KitSave {
                    charge,
                    cooldown_ticks: 12,
                    exhausted: false,
                    powers_menu: true,
                    misc_menu: false,
                },
            }],
        }
    }

    #[test]
    fn save_overwrites_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileKitRepository::new(dir.path()).unwrap();

        repo.save("main", &snapshot(40.0)).unwrap();
        repo.save("main", &snapshot(55.5)).unwrap();

        assert_eq!(repo.load("main").unwrap(), Some(snapshot(55.5)));
        assert!(!dir.path().join("kits_main.bin.tmp").exists());
        assert_eq!(repo.list_slots().unwrap(), vec!["main".to_owned()]);
    }

    #[test]
    fn missing_and_deleted_slots_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileKitRepository::new(dir.path()).unwrap();
        assert_eq!(repo.load("nothing").unwrap(), None);

        repo.save("gone", &snapshot(1.0)).unwrap();
        repo.delete("gone").unwrap();
        assert!(!repo.exists("gone"));
        repo.delete("gone").unwrap();
    }

    #[test]
    fn slot_names_cannot_escape_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileKitRepository::new(dir.path()).unwrap();
        assert!(matches!(
            repo.save("../outside", &snapshot(1.0)),
            Err(RepositoryError::InvalidSlot(_))
        ));
        assert!(!repo.exists(""));
    }

    #[test]
    fn corrupted_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileKitRepository::new(dir.path()).unwrap();
        fs::write(dir.path().join("kits_bad.bin"), [0xff, 0x01]).unwrap();
        assert!(matches!(
            repo.load("bad"),
            Err(RepositoryError::Serialization(_))
        ));
    }
}
