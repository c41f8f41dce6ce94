//! Stat multipliers granted by the gauge.

use solar_core::{EntityId, StatKind};

use super::{HookContext, HostHook};

#[derive(Debug, Clone, Copy)]
pub struct StatMultiplierHook;

impl HostHook for StatMultiplierHook {
    fn name(&self) -> &'static str {
        "stat_multiplier"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn stat_value(
        &self,
        ctx: &HookContext<'_, '_>,
        entity: EntityId,
        stat: StatKind,
        value: f32,
    ) -> f32 {
        ctx.registry
            .kit(entity)
            .map_or(value, |kit| value * kit.stat_multiplier(stat))
    }
}
