//! Host extension points.
//!
//! The host calls into the runtime at a handful of points in its own
//! pipelines (damage, death, pathing, fire, stats). Each point is answered by
//! the registered hooks in priority order.
//!
//! # Execution Order
//!
//! Hooks are sorted by priority (lower values execute first). Value-rewriting
//! points (damage, move cost, stats) thread the value through every hook;
//! verdict points (lethal damage, ignition) stop at the first hook that
//! objects.

mod context;
mod damage;
mod fire;
mod movement;
mod registry;
mod stats;

pub use context::HookContext;
pub use damage::{LethalGuardHook, MitigationHook};
pub use fire::FireImmunityHook;
pub use movement::FlightMoveCostHook;
pub use registry::HookRegistry;
pub use stats::StatMultiplierHook;

use solar_core::{EntityId, IncomingDamage, Position, StatKind};

/// Outcome of the host asking whether a killing blow may land.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LethalVerdict {
    Allowed,
    /// The kit paid for survival; the host should keep the entity alive.
    Prevented,
}

/// A hook answers any subset of the extension points. Every default leaves
/// the host's value untouched.
pub trait HostHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    /// Lower values execute first.
    fn priority(&self) -> i32 {
        0
    }

    fn before_damage(
        &self,
        _ctx: &mut HookContext<'_, '_>,
        _target: EntityId,
        incoming: IncomingDamage,
    ) -> IncomingDamage {
        incoming
    }

    fn on_lethal_damage(&self, _ctx: &mut HookContext<'_, '_>, _target: EntityId) -> LethalVerdict {
        LethalVerdict::Allowed
    }

    fn move_cost(
        &self,
        _ctx: &HookContext<'_, '_>,
        _entity: EntityId,
        _cell: Position,
        cost: f32,
    ) -> f32 {
        cost
    }

    fn allow_ignite(&self, _ctx: &HookContext<'_, '_>, _cell: Position) -> bool {
        true
    }

    fn stat_value(
        &self,
        _ctx: &HookContext<'_, '_>,
        _entity: EntityId,
        _stat: StatKind,
        value: f32,
    ) -> f32 {
        value
    }
}
