//! Data-driven balance content for the solar kit.
//!
//! Loaders read two files:
//! - kit configuration (`config.toml`): balance constants and stat multipliers
//! - ability table (`abilities.ron`): one entry per beam tier and one-shot
//!
//! Both have built-in copies under `data/` that hosts fall back to when no
//! override directory is configured. Faulty ability entries never abort a
//! load; they come back disabled in the catalog.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityTable, CatalogLoader, ConfigLoader, ContentFactory, KitSettings};
