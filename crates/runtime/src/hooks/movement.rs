//! Path cost override while flying.

use solar_core::{EntityId, Position};

use super::{HookContext, HostHook};

#[derive(Debug, Clone, Copy)]
pub struct FlightMoveCostHook;

impl HostHook for FlightMoveCostHook {
    fn name(&self) -> &'static str {
        "flight_move_cost"
    }

    fn move_cost(
        &self,
        ctx: &HookContext<'_, '_>,
        entity: EntityId,
        _cell: Position,
        cost: f32,
    ) -> f32 {
        ctx.registry
            .kit(entity)
            .map_or(cost, |kit| kit.move_cost(cost))
    }
}
