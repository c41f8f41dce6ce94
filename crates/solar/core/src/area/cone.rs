use super::{Caster, ChargeCost, OneShotAbility, cells_in_radius};
use crate::catalog::{ConeFreezeDescriptor, OneShotKind};
use crate::env::{Condition, Env, OracleError, Visual};
use crate::geometry::{line_of_sight, within_cone};
use crate::kit::AbilityError;
use crate::state::Position;

/// Frost breathed in a cone toward `aim`.
///
/// A cell is hit when it lies within the radius, within the half-angle of the
/// aim direction, and in unobstructed sight of the owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeFreeze {
    descriptor: ConeFreezeDescriptor,
    aim: Position,
}

impl ConeFreeze {
    pub fn new(descriptor: ConeFreezeDescriptor, aim: Position) -> Self {
        Self { descriptor, aim }
    }

    fn chill(
        &self,
        caster: Caster,
        cell: Position,
        env: &mut Env<'_>,
    ) -> Result<(), OracleError> {
        env.world.push_heat(cell, self.descriptor.heat_delta)?;
        env.world.extinguish(cell)?;

        for occupant in env.world.occupants(cell) {
            if occupant.id == caster.id || !occupant.is_character() {
                continue;
            }
            env.world
                .stun(occupant.id, self.descriptor.stun_ticks, Some(caster.id))?;
            let severity = match env
                .world
                .condition_severity(occupant.id, Condition::Hypothermia)
            {
                Some(current) => (current + self.descriptor.severity_step).clamp(0.0, 1.0),
                None => self.descriptor.severity_step,
            };
            env.world
                .set_condition_severity(occupant.id, Condition::Hypothermia, severity)?;
        }
        Ok(())
    }
}

impl OneShotAbility for ConeFreeze {
    fn kind(&self) -> OneShotKind {
        OneShotKind::ConeFreeze
    }

    fn cost(&self) -> ChargeCost {
        ChargeCost::Fixed(self.descriptor.charge_cost)
    }

    /// The aim must be on the map and define a direction.
    fn validate(&self, caster: Caster, env: &Env<'_>) -> Result<(), AbilityError> {
        if !env.world.contains(self.aim) || self.aim == caster.position {
            return Err(AbilityError::InvalidTarget(self.aim));
        }
        Ok(())
    }

    fn affected_cells(&self, caster: Caster, env: &Env<'_>) -> Vec<Position> {
        cells_in_radius(caster.position, self.descriptor.radius, env)
            .into_iter()
            .filter(|cell| {
                within_cone(
                    caster.position,
                    self.aim,
                    *cell,
                    self.descriptor.half_angle_degrees,
                ) && line_of_sight(&*env.world, caster.position, *cell)
            })
            .collect()
    }

    fn apply(
        &self,
        caster: Caster,
        cells: &[Position],
        env: &mut Env<'_>,
    ) -> Result<(), OracleError> {
        for cell in cells {
            self.chill(caster, *cell, env)?;
        }
        env.presenter.spawn_visual(Visual::Frost, self.aim, 1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{CastError, resolve};
    use crate::catalog::AbilityCatalog;
    use crate::config::KitConfig;
    use crate::env::{GridWorld, RecordingPresenter, World};
    use crate::gauge::SolarGauge;
    use crate::state::Tick;

    fn freeze(aim: Position) -> ConeFreeze {
        ConeFreeze::new(*AbilityCatalog::standard().cone_freeze().unwrap(), aim)
    }

    #[test]
    fn only_cells_inside_cone_with_sight_are_hit() {
        let mut world = GridWorld::new(30, 30);
        let owner = world.spawn_character(Position::new(10, 10));
        let in_cone = world.spawn_character(Position::new(14, 11));
        let outside_cone = world.spawn_character(Position::new(13, 14));
        let behind_wall = world.spawn_character(Position::new(16, 10));
        world.add_wall(Position::new(15, 10));

        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);
        let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);

        let outcome = resolve(&freeze(Position::new(17, 10)), owner, &mut gauge, &mut env).unwrap();
        assert!(outcome.cells_affected > 0);
        assert!((gauge.charge() - 99.5).abs() < 1e-5);

        assert_eq!(world.stun_ticks(in_cone), 180);
        assert_eq!(
            world.condition_severity(in_cone, Condition::Hypothermia),
            Some(0.1)
        );
        assert_eq!(world.stun_ticks(outside_cone), 0);
        assert_eq!(world.stun_ticks(behind_wall), 0);
        assert_eq!(world.heat_at(Position::new(15, 10)), 0.0);
        assert_eq!(world.heat_at(Position::new(16, 10)), 0.0);
        assert_eq!(world.heat_at(Position::new(14, 10)), -30.0);
        assert_eq!(world.stun_ticks(owner), 0);
    }

    #[test]
    fn repeated_breath_intensifies_and_clamps() {
        let mut world = GridWorld::new(20, 20);
        let owner = world.spawn_character(Position::new(5, 5));
        let victim = world.spawn_character(Position::new(7, 5));
        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);

        for _ in 0..12 {
            let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);
            resolve(&freeze(Position::new(9, 5)), owner, &mut gauge, &mut env).unwrap();
        }
        let severity = world
            .condition_severity(victim, Condition::Hypothermia)
            .unwrap();
        assert!((severity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn breath_extinguishes_fire() {
        let mut world = GridWorld::new(20, 20);
        let owner = world.spawn_character(Position::new(5, 5));
        world.try_ignite(Position::new(6, 5), 0.5, None).unwrap();
        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);
        let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);

        resolve(&freeze(Position::new(8, 5)), owner, &mut gauge, &mut env).unwrap();
        assert_eq!(world.fire_at(Position::new(6, 5)), None);
    }

    #[test]
    fn rejected_without_charge_or_direction() {
        let mut world = GridWorld::new(20, 20);
        let owner = world.spawn_character(Position::new(5, 5));
        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::restore(&config, 0.4, 0, false);
        let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);

        let err = resolve(&freeze(Position::new(8, 5)), owner, &mut gauge, &mut env).unwrap_err();
        assert!(matches!(
            err,
            CastError::Rejected(AbilityError::NotEnoughCharge { .. })
        ));

        let err = resolve(&freeze(Position::new(5, 5)), owner, &mut gauge, &mut env).unwrap_err();
        assert_eq!(
            err,
            CastError::Rejected(AbilityError::InvalidTarget(Position::new(5, 5)))
        );
        assert_eq!(gauge.charge(), 0.4);
        assert_eq!(world.heat_at(Position::new(6, 5)), 0.0);
    }
}
