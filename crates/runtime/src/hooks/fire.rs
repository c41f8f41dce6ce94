//! Fire never starts on a holder's cell.

use solar_core::Position;

use super::{HookContext, HostHook};

/// Covers living holders and their corpses, so a dormant holder is not
/// burned while sun-bathing.
#[derive(Debug, Clone, Copy)]
pub struct FireImmunityHook;

impl HostHook for FireImmunityHook {
    fn name(&self) -> &'static str {
        "fire_immunity"
    }

    fn allow_ignite(&self, ctx: &HookContext<'_, '_>, cell: Position) -> bool {
        !ctx.env
            .world
            .occupants(cell)
            .iter()
            .any(|occupant| ctx.registry.covers(occupant.id, occupant.kind))
    }
}
