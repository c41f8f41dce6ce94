//! Hook registry for answering host extension points.

use std::sync::Arc;

use solar_core::{EntityId, IncomingDamage, Position, StatKind};
use tracing::debug;

use super::{HookContext, HostHook, LethalVerdict};

/// Registered hooks, sorted by priority once at construction.
#[derive(Clone)]
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn HostHook>]>,
}

impl HookRegistry {
    pub fn new(mut hooks: Vec<Arc<dyn HostHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Creates a registry with the default set of hooks.
    ///
    /// Default hooks include:
    /// - MitigationHook: filters damage to holders (-10)
    /// - LethalGuardHook: trades the gauge for a killing blow (-10)
    /// - FlightMoveCostHook: discounts path cost while flying (0)
    /// - FireImmunityHook: no fire on a holder's cell (0)
    /// - StatMultiplierHook: gauge-driven stat scaling (10)
    pub fn default_hooks() -> Self {
        use super::{
            FireImmunityHook, FlightMoveCostHook, LethalGuardHook, MitigationHook,
            StatMultiplierHook,
        };

        Self::new(vec![
            Arc::new(MitigationHook) as Arc<dyn HostHook>,
            Arc::new(LethalGuardHook),
            Arc::new(FlightMoveCostHook),
            Arc::new(FireImmunityHook),
            Arc::new(StatMultiplierHook),
        ])
    }

    pub fn before_damage(
        &self,
        ctx: &mut HookContext<'_, '_>,
        target: EntityId,
        incoming: IncomingDamage,
    ) -> IncomingDamage {
        self.hooks.iter().fold(incoming, |damage, hook| {
            let next = hook.before_damage(ctx, target, damage);
            if next != damage {
                debug!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    %target,
                    before = damage.amount,
                    after = next.amount,
                    "damage rewritten"
                );
            }
            next
        })
    }

    pub fn on_lethal_damage(
        &self,
        ctx: &mut HookContext<'_, '_>,
        target: EntityId,
    ) -> LethalVerdict {
        for hook in self.hooks.iter() {
            if hook.on_lethal_damage(ctx, target) == LethalVerdict::Prevented {
                debug!(target: "runtime::hooks", hook = hook.name(), %target, "lethal damage prevented");
                return LethalVerdict::Prevented;
            }
        }
        LethalVerdict::Allowed
    }

    pub fn move_cost(
        &self,
        ctx: &HookContext<'_, '_>,
        entity: EntityId,
        cell: Position,
        base: f32,
    ) -> f32 {
        self.hooks
            .iter()
            .fold(base, |cost, hook| hook.move_cost(ctx, entity, cell, cost))
    }

    pub fn allow_ignite(&self, ctx: &HookContext<'_, '_>, cell: Position) -> bool {
        self.hooks.iter().all(|hook| hook.allow_ignite(ctx, cell))
    }

    pub fn stat_value(
        &self,
        ctx: &HookContext<'_, '_>,
        entity: EntityId,
        stat: StatKind,
        base: f32,
    ) -> f32 {
        self.hooks
            .iter()
            .fold(base, |value, hook| hook.stat_value(ctx, entity, stat, value))
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passive;

    impl HostHook for Passive {
        fn name(&self) -> &'static str {
            "passive"
        }

        fn priority(&self) -> i32 {
            50
        }
    }

    #[test]
    fn hooks_are_sorted_by_priority() {
        let registry = HookRegistry::new(vec![
            Arc::new(Passive) as Arc<dyn HostHook>,
            Arc::new(super::super::StatMultiplierHook),
            Arc::new(super::super::MitigationHook),
        ]);
        let order: Vec<_> = registry.hooks().collect();
        assert_eq!(
            order,
            vec![("mitigation", -10), ("stat_multiplier", 10), ("passive", 50)]
        );
    }

    #[test]
    fn default_registry_has_every_extension_point() {
        let registry = HookRegistry::default();
        assert_eq!(registry.len(), 5);
        assert!(!registry.is_empty());
    }
}
