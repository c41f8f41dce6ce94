//! Persistence for kit state.
//!
//! Only what [`KitSave`](solar_core::KitSave) holds is persisted. Beams and
//! flight are transient and come back idle after a load.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileKitRepository;
pub use memory::InMemoryKitRepository;
pub use traits::{KitRecord, KitRepository, RuntimeSnapshot};
