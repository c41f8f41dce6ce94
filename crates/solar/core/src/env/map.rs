use crate::state::{EntityId, Position};

/// Read-only view of the map the owner stands on.
pub trait MapOracle {
    fn dimensions(&self) -> MapDimensions;

    /// Whether the cell has a roof over it (blocks sunlight).
    fn is_roofed(&self, position: Position) -> bool;

    /// Whether the cell blocks line of sight (walls, rock).
    fn blocks_sight(&self, position: Position) -> bool;

    /// Current celestial sun glow for the map, in `[0, 1]`.
    fn sun_glow(&self) -> f32;

    /// Looks up a spawned entity. `None` once it is destroyed or despawned.
    fn entity(&self, id: EntityId) -> Option<EntityView>;

    /// Every entity occupying the cell.
    fn occupants(&self, position: Position) -> Vec<EntityView>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Snapshot of a spawned entity as the kit needs to see it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityView {
    pub id: EntityId,
    pub position: Position,
    pub kind: EntityKind,
    pub dead: bool,
    pub downed: bool,
}

impl EntityView {
    pub fn is_character(&self) -> bool {
        matches!(self.kind, EntityKind::Character)
    }

    /// Alive and standing: can act, channel, and be targeted as a character.
    pub fn is_capable(&self) -> bool {
        !self.dead && !self.downed
    }
}

/// Coarse classification of occupants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Character,
    /// Buildings, items, plants.
    Object {
        destructible: bool,
        /// Volatile material that can detonate when superheated.
        volatile: bool,
    },
    /// Corpse of the given character.
    Corpse { inner: EntityId },
}
