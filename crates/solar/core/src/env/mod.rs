//! Collaborator contracts between the kit and its host.
//!
//! The kit owns no world state. Everything it reads (map, entities, sunlight)
//! and everything it changes (damage, fire, heat, fog) goes through the traits
//! here. [`Env`] bundles them for a single call into the kit.
mod error;
mod grid;
mod map;
mod presenter;
mod rng;
mod world;

pub use error::OracleError;
pub use grid::{GridEntity, GridWorld, Presented, RecordingPresenter, WorldOp};
pub use map::{EntityKind, EntityView, MapDimensions, MapOracle};
pub use presenter::{
    Cue, Message, MessageKey, MessageTone, NullPresenter, Presenter, SustainerHandle,
    SustainerKind, Visual,
};
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
pub use world::{Condition, Explosion, Residue, World};

use crate::state::{EntityId, Tick};

static DEFAULT_RNG: PcgRng = PcgRng;

/// Host collaborators for one call into the kit.
pub struct Env<'a> {
    pub world: &'a mut dyn World,
    pub presenter: &'a mut dyn Presenter,
    pub rng: &'a dyn RngOracle,
    /// Current simulation tick.
    pub now: Tick,
    pub game_seed: u64,
}

impl<'a> Env<'a> {
    /// Bundles a world and presenter with the default PCG generator and seed 0.
    pub fn new(world: &'a mut dyn World, presenter: &'a mut dyn Presenter, now: Tick) -> Self {
        Self {
            world,
            presenter,
            rng: &DEFAULT_RNG,
            now,
            game_seed: 0,
        }
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }

    /// Rolls a chance on a stream unique to this tick, owner and context.
    pub fn roll(&self, owner: EntityId, context: RollContext, index: u32, p: f32) -> bool {
        let context = ((context as u32) << 24) ^ index;
        let seed = compute_seed(self.game_seed, self.now.0, owner.0, context);
        self.rng.chance(seed, p)
    }
}
