//! Shared context passed to hooks.

use solar_core::Env;

use crate::capability::CapabilityRegistry;

/// Everything a hook may read or change while answering the host.
pub struct HookContext<'a, 'e> {
    pub registry: &'a mut CapabilityRegistry,
    pub env: &'a mut Env<'e>,
}

impl<'a, 'e> HookContext<'a, 'e> {
    pub fn new(registry: &'a mut CapabilityRegistry, env: &'a mut Env<'e>) -> Self {
        Self { registry, env }
    }
}
