//! Value types shared between the kit and its host.
//!
//! The kit owns no world state. These types identify host entities and cells
//! and describe the damage flowing between the two.
mod common;
mod damage;

pub use common::{EntityId, Position, Tick};
pub use damage::{DamageInfo, DamageKind, DamageTraits, IncomingDamage};
