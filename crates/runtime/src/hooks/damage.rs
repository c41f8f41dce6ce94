//! Damage pipeline hooks for capability holders.

use solar_core::{EntityId, IncomingDamage};

use super::{HookContext, HostHook, LethalVerdict};

/// Filters incoming damage through the holder's mitigation policy.
#[derive(Debug, Clone, Copy)]
pub struct MitigationHook;

impl HostHook for MitigationHook {
    fn name(&self) -> &'static str {
        "mitigation"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn before_damage(
        &self,
        ctx: &mut HookContext<'_, '_>,
        target: EntityId,
        incoming: IncomingDamage,
    ) -> IncomingDamage {
        let Some(kit) = ctx.registry.kit_mut(target) else {
            return incoming;
        };
        let mitigation = kit.mitigate(incoming, ctx.env);
        IncomingDamage {
            amount: mitigation.amount,
            ..incoming
        }
    }
}

/// Trades the whole gauge for surviving a killing blow.
#[derive(Debug, Clone, Copy)]
pub struct LethalGuardHook;

impl HostHook for LethalGuardHook {
    fn name(&self) -> &'static str {
        "lethal_guard"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn on_lethal_damage(&self, ctx: &mut HookContext<'_, '_>, target: EntityId) -> LethalVerdict {
        match ctx.registry.kit_mut(target) {
            Some(kit) if !kit.gauge().is_empty() => {
                kit.notify_lethal_prevented(ctx.env);
                LethalVerdict::Prevented
            }
            _ => LethalVerdict::Allowed,
        }
    }
}
