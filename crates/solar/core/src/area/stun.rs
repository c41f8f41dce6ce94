use super::{Caster, ChargeCost, OneShotAbility};
use crate::catalog::{AreaStunDescriptor, OneShotKind};
use crate::env::{Env, OracleError};
use crate::kit::AbilityError;
use crate::state::{EntityId, Position};

/// Long stun on one targeted character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaStun {
    descriptor: AreaStunDescriptor,
    target: EntityId,
}

impl AreaStun {
    pub fn new(descriptor: AreaStunDescriptor, target: EntityId) -> Self {
        Self { descriptor, target }
    }
}

impl OneShotAbility for AreaStun {
    fn kind(&self) -> OneShotKind {
        OneShotKind::AreaStun
    }

    fn cost(&self) -> ChargeCost {
        ChargeCost::Fixed(self.descriptor.charge_cost)
    }

    fn validate(&self, _caster: Caster, env: &Env<'_>) -> Result<(), AbilityError> {
        match env.world.entity(self.target) {
            Some(view) if view.is_character() => Ok(()),
            _ => Err(AbilityError::TargetNotCharacter(self.target)),
        }
    }

    fn affected_cells(&self, _caster: Caster, env: &Env<'_>) -> Vec<Position> {
        env.world
            .entity(self.target)
            .map(|view| vec![view.position])
            .unwrap_or_default()
    }

    fn apply(
        &self,
        caster: Caster,
        _cells: &[Position],
        env: &mut Env<'_>,
    ) -> Result<(), OracleError> {
        env.world
            .stun(self.target, self.descriptor.stun_ticks, Some(caster.id))
    }
}
