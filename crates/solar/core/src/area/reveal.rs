use super::{Caster, ChargeCost, OneShotAbility, cells_in_radius};
use crate::catalog::{OneShotKind, RevealDescriptor};
use crate::env::{Env, OracleError};
use crate::state::Position;

/// Lifts fog of war around the owner. Pure information; no damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reveal {
    descriptor: RevealDescriptor,
}

impl Reveal {
    pub fn new(descriptor: RevealDescriptor) -> Self {
        Self { descriptor }
    }
}

impl OneShotAbility for Reveal {
    fn kind(&self) -> OneShotKind {
        OneShotKind::Reveal
    }

    fn cost(&self) -> ChargeCost {
        ChargeCost::Fixed(self.descriptor.charge_cost)
    }

    fn affected_cells(&self, caster: Caster, env: &Env<'_>) -> Vec<Position> {
        cells_in_radius(caster.position, self.descriptor.radius, env)
    }

    fn apply(
        &self,
        _caster: Caster,
        cells: &[Position],
        env: &mut Env<'_>,
    ) -> Result<(), OracleError> {
        for cell in cells {
            env.world.unfog(*cell)?;
        }
        Ok(())
    }
}
